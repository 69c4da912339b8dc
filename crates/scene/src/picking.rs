use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::prefabs::GlobeScene;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickTarget {
    Marker(usize),
    Globe,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub target: PickTarget,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

/// Deterministic ray picking against markers and the globe surface.
///
/// Ordering contract:
/// - Markers take priority over the globe, but only when they are not hidden behind it.
/// - Among markers, the closest hit along the (normalized) ray wins; equal distances go
///   to the lower marker index.
pub fn pick_ray(scene: &GlobeScene, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;
    let ray = Ray::new(ray.origin, dir);

    let globe_t = ray_sphere_hit_t(ray, Vec3::ZERO, scene.globe_radius, opts.max_distance);

    let mut best: Option<(f64, usize)> = None;
    for (idx, marker) in scene.markers.iter().enumerate() {
        let Some(t) = ray_sphere_hit_t(ray, marker.position, marker.pick_radius(), opts.max_distance)
        else {
            continue;
        };

        best = match best {
            None => Some((t, idx)),
            Some((bt, bi)) => {
                let ord = stable_total_cmp_f64(t, bt).then_with(|| idx.cmp(&bi));
                if ord.is_lt() { Some((t, idx)) } else { Some((bt, bi)) }
            }
        };
    }

    if let Some((t, idx)) = best {
        let occluded = globe_t.is_some_and(|gt| gt < t);
        if !occluded {
            return Some(PickHit {
                target: PickTarget::Marker(idx),
                distance: t,
                point: ray.at(t),
            });
        }
    }

    let t = globe_t?;
    Some(PickHit {
        target: PickTarget::Globe,
        distance: t,
        point: ray.at(t),
    })
}

/// Entry distance of a unit-direction ray into a sphere. A ray starting inside the
/// sphere reports its exit distance.
fn ray_sphere_hit_t(ray: Ray, center: Vec3, radius: f64, t_max: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;
    let t = if t0 >= 0.0 {
        t0
    } else if t1 >= 0.0 {
        t1
    } else {
        return None;
    };

    (t <= t_max).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, PickTarget, Ray, pick_ray};
    use crate::marker::Marker;
    use crate::prefabs::GlobeScene;
    use foundation::math::Vec3;

    fn marker(id: &str, position: Vec3) -> Marker {
        Marker {
            country_id: id.to_string(),
            position,
            radius: 0.02,
            scale: 1.0,
        }
    }

    fn scene(markers: Vec<Marker>) -> GlobeScene {
        GlobeScene {
            globe_radius: 1.0,
            markers,
        }
    }

    #[test]
    fn marker_in_front_of_globe_wins() {
        let s = scene(vec![marker("a", Vec3::new(0.0, 0.0, 1.02))]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = pick_ray(&s, ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.target, PickTarget::Marker(0));
        assert!((hit.distance - 1.96).abs() < 1e-9);
    }

    #[test]
    fn marker_behind_globe_is_occluded() {
        let s = scene(vec![marker("back", Vec3::new(0.0, 0.0, -1.02))]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = pick_ray(&s, ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.target, PickTarget::Globe);
        assert!((hit.point.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tie_breaks_by_marker_index() {
        let p = Vec3::new(0.0, 0.0, 1.02);
        let s = scene(vec![marker("first", p), marker("second", p)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -2.0));
        let hit = pick_ray(&s, ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.target, PickTarget::Marker(0));
    }

    #[test]
    fn pulse_scale_widens_pick_radius() {
        let mut m = marker("a", Vec3::new(0.0, 0.0, 1.02));
        let ray = Ray::new(Vec3::new(0.025, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let s = scene(vec![m.clone()]);
        assert_eq!(
            pick_ray(&s, ray, PickOptions::default()).map(|h| h.target),
            Some(PickTarget::Globe)
        );

        m.scale = 1.5;
        let s = scene(vec![m]);
        assert_eq!(
            pick_ray(&s, ray, PickOptions::default()).map(|h| h.target),
            Some(PickTarget::Marker(0))
        );
    }

    #[test]
    fn missing_everything_is_none() {
        let s = scene(vec![]);
        let ray = Ray::new(Vec3::new(0.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(pick_ray(&s, ray, PickOptions::default()).is_none());
        let zero = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
        assert!(pick_ray(&s, zero, PickOptions::default()).is_none());
    }

    #[test]
    fn max_distance_limits_hits() {
        let s = scene(vec![]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let opts = PickOptions { max_distance: 1.5 };
        assert!(pick_ray(&s, ray, opts).is_none());
    }
}
