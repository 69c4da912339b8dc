use catalog::{Catalog, Country};
use foundation::math::{Vec3, lat_lng_to_sphere};

/// Radius at which markers float above the unit globe.
pub const MARKER_ALTITUDE: f64 = 1.02;

/// Radius of a marker's pick sphere at scale 1.
pub const MARKER_RADIUS: f64 = 0.02;

/// Scale applied while a marker pulses after a click.
pub const PULSE_SCALE: f64 = 1.5;

/// One clickable point per country.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Looks up the country in the catalog; the marker does not own it.
    pub country_id: String,
    pub position: Vec3,
    pub radius: f64,
    pub scale: f64,
}

impl Marker {
    pub fn for_country(country: &Country) -> Self {
        Self {
            country_id: country.id.clone(),
            position: lat_lng_to_sphere(country.coordinates.lat_lng(), MARKER_ALTITUDE),
            radius: MARKER_RADIUS,
            scale: 1.0,
        }
    }

    pub fn pick_radius(&self) -> f64 {
        self.radius * self.scale
    }
}

pub fn markers_for(catalog: &Catalog) -> Vec<Marker> {
    catalog.iter().map(Marker::for_country).collect()
}

#[cfg(test)]
mod tests {
    use super::{MARKER_ALTITUDE, markers_for};
    use catalog::Catalog;
    use foundation::math::sphere_to_lat_lng;

    #[test]
    fn one_marker_per_country_at_altitude() {
        let catalog = Catalog::builtin();
        let markers = markers_for(catalog);
        assert_eq!(markers.len(), catalog.len());
        for (marker, country) in markers.iter().zip(catalog.iter()) {
            assert_eq!(marker.country_id, country.id);
            assert!((marker.position.length() - MARKER_ALTITUDE).abs() < 1e-12);

            let back = sphere_to_lat_lng(marker.position).expect("direction");
            assert!((back.lat_deg - country.coordinates.lat).abs() < 1e-9);
            assert!((back.lng_deg - country.coordinates.lng).abs() < 1e-9);
        }
    }
}
