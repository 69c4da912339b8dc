use catalog::Catalog;

use crate::marker::{Marker, markers_for};

/// Radius of the textured Earth sphere.
pub const GLOBE_RADIUS: f64 = 1.0;

/// The pickable contents of the globe: the Earth sphere and its country markers.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeScene {
    pub globe_radius: f64,
    pub markers: Vec<Marker>,
}

impl GlobeScene {
    pub fn build(catalog: &Catalog) -> Self {
        Self {
            globe_radius: GLOBE_RADIUS,
            markers: markers_for(catalog),
        }
    }

    pub fn marker(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn marker_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.markers.get_mut(index)
    }
}
