use super::Vec3;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat_deg: f64,
    pub lng_deg: f64,
}

impl LatLng {
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }

    /// Euclidean distance in degree space.
    ///
    /// This is not a great-circle distance; it distorts toward the poles and does not
    /// wrap at the antimeridian.
    pub fn degree_distance(self, other: LatLng) -> f64 {
        let dlat = self.lat_deg - other.lat_deg;
        let dlng = self.lng_deg - other.lng_deg;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

/// Projects geographic coordinates onto a sphere of `radius` centred at the origin.
///
/// Polar angle comes from latitude (`phi = 90 - lat`), azimuth from longitude
/// (`theta = lng + 180`). The north pole sits on +Y.
pub fn lat_lng_to_sphere(coord: LatLng, radius: f64) -> Vec3 {
    let phi = (90.0 - coord.lat_deg).to_radians();
    let theta = (coord.lng_deg + 180.0).to_radians();

    Vec3::new(
        -(phi.sin() * theta.cos()) * radius,
        phi.cos() * radius,
        (phi.sin() * theta.sin()) * radius,
    )
}

/// Inverse of [`lat_lng_to_sphere`]. The radius of `point` is ignored.
///
/// Returns `None` for the origin, which has no direction.
pub fn sphere_to_lat_lng(point: Vec3) -> Option<LatLng> {
    let unit = point.normalized()?;
    let lat = 90.0 - unit.y.clamp(-1.0, 1.0).acos().to_degrees();
    let lng = normalize_lng(-unit.z.atan2(unit.x).to_degrees());
    Some(LatLng::new(lat, lng))
}

/// Wraps a longitude into `(-180, 180]`.
pub fn normalize_lng(lng_deg: f64) -> f64 {
    let wrapped = (lng_deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}
