use catalog::{Catalog, Country};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown country id: {0}")]
    UnknownCountry(String),
}

/// The single currently selected country, held by id.
///
/// Every mutator reports whether the selection actually changed so callers can skip
/// redundant panel refreshes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, country: &Country) -> bool {
        if self.selected.as_deref() == Some(country.id.as_str()) {
            return false;
        }
        self.selected = Some(country.id.clone());
        true
    }

    /// Selects by id, rejecting ids the catalog does not know.
    pub fn select_id(&mut self, catalog: &Catalog, id: &str) -> Result<bool, SelectionError> {
        let country = catalog
            .get(id)
            .ok_or_else(|| SelectionError::UnknownCountry(id.to_string()))?;
        Ok(self.select(country))
    }

    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected<'c>(&self, catalog: &'c Catalog) -> Option<&'c Country> {
        self.selected.as_deref().and_then(|id| catalog.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectionError, SelectionState};
    use catalog::Catalog;

    #[test]
    fn select_replaces_and_reports_changes() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionState::new();
        assert!(sel.is_empty());

        assert_eq!(sel.select_id(catalog, "japan"), Ok(true));
        assert_eq!(sel.select_id(catalog, "japan"), Ok(false));
        assert_eq!(sel.select_id(catalog, "egypt"), Ok(true));
        assert_eq!(sel.selected_id(), Some("egypt"));
        assert_eq!(sel.selected(catalog).map(|c| c.name.as_str()), Some("Mısır"));
    }

    #[test]
    fn unknown_id_leaves_selection_untouched() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionState::new();
        sel.select_id(catalog, "france").unwrap();

        let err = sel.select_id(catalog, "atlantis").unwrap_err();
        assert_eq!(err, SelectionError::UnknownCountry("atlantis".to_string()));
        assert_eq!(sel.selected_id(), Some("france"));
    }

    #[test]
    fn clear_reports_whether_anything_was_selected() {
        let catalog = Catalog::builtin();
        let mut sel = SelectionState::new();
        assert!(!sel.clear());
        sel.select_id(catalog, "india").unwrap();
        assert!(sel.clear());
        assert!(sel.selected(catalog).is_none());
    }
}
