use serde::{Deserialize, Serialize};
use thiserror::Error;

const TEXTURE_BASE: &str =
    "https://raw.githubusercontent.com/mrdoob/three.js/dev/examples/textures/planets";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureSlot {
    Color,
    Specular,
    Normal,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [TextureSlot::Color, TextureSlot::Specular, TextureSlot::Normal];

    pub fn url(self) -> String {
        let file = match self {
            TextureSlot::Color => "earth_atmos_2048.jpg",
            TextureSlot::Specular => "earth_specular_2048.jpg",
            TextureSlot::Normal => "earth_normal_2048.jpg",
        };
        format!("{TEXTURE_BASE}/{file}")
    }

    fn index(self) -> usize {
        match self {
            TextureSlot::Color => 0,
            TextureSlot::Specular => 1,
            TextureSlot::Normal => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TextureState {
    Loading,
    Ready,
    Failed { reason: String },
}

impl TextureState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, TextureState::Loading)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture {slot:?} already settled")]
    AlreadySettled { slot: TextureSlot },
}

/// Load state of the globe's surface maps.
///
/// Transitions only ever leave `Loading`; `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobeTextures {
    states: [TextureState; 3],
}

impl Default for GlobeTextures {
    fn default() -> Self {
        Self {
            states: [TextureState::Loading, TextureState::Loading, TextureState::Loading],
        }
    }
}

impl GlobeTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, slot: TextureSlot) -> &TextureState {
        &self.states[slot.index()]
    }

    pub fn mark_loaded(&mut self, slot: TextureSlot) -> Result<(), TextureError> {
        self.settle(slot, TextureState::Ready)
    }

    pub fn mark_failed(&mut self, slot: TextureSlot, reason: impl Into<String>) -> Result<(), TextureError> {
        self.settle(slot, TextureState::Failed {
            reason: reason.into(),
        })
    }

    /// The indicator follows the colour map only; the other maps load silently.
    pub fn loading_indicator_visible(&self) -> bool {
        matches!(self.state(TextureSlot::Color), TextureState::Loading)
    }

    fn settle(&mut self, slot: TextureSlot, next: TextureState) -> Result<(), TextureError> {
        let current = &mut self.states[slot.index()];
        if current.is_settled() {
            return Err(TextureError::AlreadySettled { slot });
        }
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobeTextures, TextureError, TextureSlot, TextureState};

    #[test]
    fn indicator_tracks_color_map_only() {
        let mut tex = GlobeTextures::new();
        assert!(tex.loading_indicator_visible());

        tex.mark_loaded(TextureSlot::Normal).unwrap();
        assert!(tex.loading_indicator_visible());

        tex.mark_loaded(TextureSlot::Color).unwrap();
        assert!(!tex.loading_indicator_visible());
        assert_eq!(tex.state(TextureSlot::Specular), &TextureState::Loading);
    }

    #[test]
    fn failure_is_terminal_and_hides_indicator() {
        let mut tex = GlobeTextures::new();
        tex.mark_failed(TextureSlot::Color, "404").unwrap();
        assert!(!tex.loading_indicator_visible());

        assert_eq!(
            tex.mark_loaded(TextureSlot::Color),
            Err(TextureError::AlreadySettled {
                slot: TextureSlot::Color
            })
        );
        assert_eq!(
            tex.state(TextureSlot::Color),
            &TextureState::Failed {
                reason: "404".to_string()
            }
        );
    }

    #[test]
    fn urls_point_at_planet_textures() {
        assert!(TextureSlot::Color.url().ends_with("/earth_atmos_2048.jpg"));
        assert!(TextureSlot::Specular.url().ends_with("/earth_specular_2048.jpg"));
        assert!(TextureSlot::Normal.url().ends_with("/earth_normal_2048.jpg"));
    }
}
