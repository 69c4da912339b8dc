use catalog::{Catalog, Country};
use foundation::math::{LatLng, Vec3, sphere_to_lat_lng};
use runtime::{Frame, Notice, NoticeBus, NoticeLevel};
use serde::Serialize;
use tracing::{debug, warn};

use crate::assets::{GlobeTextures, TextureError, TextureSlot};
use crate::camera::{Camera, CameraPose, Viewport};
use crate::controller::OrbitController;
use crate::marker::PULSE_SCALE;
use crate::picking::{PickOptions, PickTarget, pick_ray};
use crate::prefabs::GlobeScene;

/// A surface click selects the nearest country only within this many degrees.
pub const NEAREST_COUNTRY_THRESHOLD_DEG: f64 = 20.0;

/// Seconds a clicked marker stays enlarged.
pub const PULSE_DURATION_S: f64 = 0.3;

pub const LOADING_TEXT: &str = "Dünya Yükleniyor...";
pub const HINT_TEXT: &str = "Dünyayı çevirmek için sürükleyin. Ülke bilgisi için tıklayın.";
pub const TEXTURE_FAILED_TEXT: &str = "Dünya görüntüsü yüklenemedi.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// A marker was hit directly.
    Marker { country_id: String },
    /// The globe surface was hit close enough to a country.
    Surface {
        country_id: String,
        at: [f64; 2],
        distance_deg: f64,
    },
    /// The globe surface was hit but no country is within the threshold.
    SurfaceMiss { at: [f64; 2] },
    Nothing,
}

impl ClickOutcome {
    pub fn country_id(&self) -> Option<&str> {
        match self {
            ClickOutcome::Marker { country_id } | ClickOutcome::Surface { country_id, .. } => {
                Some(country_id)
            }
            ClickOutcome::SurfaceMiss { .. } | ClickOutcome::Nothing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSnapshot {
    pub country_id: String,
    pub position: [f64; 3],
    pub scale: f64,
    /// Pixel position, when the marker lies inside the view depth range.
    pub screen: Option<[f64; 2]>,
    /// On the camera-facing hemisphere.
    pub facing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobeSnapshot {
    pub loading: bool,
    pub loading_text: Option<&'static str>,
    pub hint: &'static str,
    pub viewport: [f64; 2],
    pub eye: [f64; 3],
    pub distance: f64,
    pub auto_rotate: bool,
    pub frame_index: u64,
    pub markers: Vec<MarkerSnapshot>,
}

#[derive(Debug, Clone, Copy)]
struct Pulse {
    marker: usize,
    until: foundation::Time,
}

/// Interaction model of the rendered globe.
///
/// Owns everything the render loop touches: scene contents, orbit controls, camera,
/// viewport, texture progress and marker pulses. The catalog is borrowed; markers refer
/// to countries by id only.
pub struct GlobeView<'c> {
    catalog: &'c Catalog,
    scene: GlobeScene,
    controller: OrbitController,
    camera: Camera,
    viewport: Viewport,
    textures: GlobeTextures,
    pulses: Vec<Pulse>,
    frame: Frame,
    notices: NoticeBus,
}

impl<'c> GlobeView<'c> {
    pub fn new(catalog: &'c Catalog, viewport: Viewport) -> Self {
        let mut view = Self {
            catalog,
            scene: GlobeScene::build(catalog),
            controller: OrbitController::new(),
            camera: Camera::default(),
            viewport,
            textures: GlobeTextures::new(),
            pulses: Vec::new(),
            frame: Frame::first(),
            notices: NoticeBus::new(),
        };
        view.resize(viewport.width, viewport.height);
        view
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn scene(&self) -> &GlobeScene {
        &self.scene
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut OrbitController {
        &mut self.controller
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn textures(&self) -> &GlobeTextures {
        &self.textures
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport);
        self.controller
            .set_canvas_size(self.viewport.width, self.viewport.height);
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.controller.eye_position(),
            target: Vec3::ZERO,
            up: self.controller.up_direction(),
        }
    }

    /// Advances controls and expires marker pulses.
    pub fn tick(&mut self, frame: Frame) {
        self.frame = frame;
        self.controller.update(frame.dt_s);

        let now = frame.time;
        let scene = &mut self.scene;
        self.pulses.retain(|pulse| {
            if now < pulse.until {
                return true;
            }
            if let Some(marker) = scene.marker_mut(pulse.marker) {
                marker.scale = 1.0;
            }
            false
        });
    }

    pub fn on_pointer_down(&mut self, x_px: f64, y_px: f64, button: i32) {
        self.controller.on_pointer_down([x_px, y_px], button);
    }

    pub fn on_pointer_move(&mut self, x_px: f64, y_px: f64, dt: f64) {
        self.controller.on_pointer_move([x_px, y_px], dt);
    }

    pub fn on_pointer_up(&mut self) {
        self.controller.on_pointer_up();
    }

    pub fn on_wheel(&mut self, delta: f64) {
        self.controller.on_wheel(delta);
    }

    pub fn texture_loaded(&mut self, slot: TextureSlot) -> Result<(), TextureError> {
        self.textures.mark_loaded(slot)?;
        debug!(?slot, "texture ready");
        Ok(())
    }

    /// Records a failed load. The globe stays interactive without the map.
    pub fn texture_failed(&mut self, slot: TextureSlot, reason: &str) -> Result<(), TextureError> {
        self.textures.mark_failed(slot, reason)?;
        warn!(?slot, url = %slot.url(), %reason, "texture failed to load");
        if slot == TextureSlot::Color {
            self.notices
                .emit_at(self.frame, NoticeLevel::Error, TEXTURE_FAILED_TEXT);
        }
        Ok(())
    }

    /// Resolves a click at a pixel position.
    ///
    /// `on_select` runs at most once, with the chosen country.
    pub fn click(&mut self, x_px: f64, y_px: f64, mut on_select: impl FnMut(&Country)) -> ClickOutcome {
        let ndc = self.viewport.to_ndc(x_px, y_px);
        let Some(ray) = self.camera.ray_from_ndc(self.pose(), ndc) else {
            return ClickOutcome::Nothing;
        };
        let Some(hit) = pick_ray(&self.scene, ray, PickOptions::default()) else {
            return ClickOutcome::Nothing;
        };

        match hit.target {
            PickTarget::Marker(index) => {
                let catalog = self.catalog;
                let Some(country) = self
                    .scene
                    .marker(index)
                    .and_then(|m| catalog.get(&m.country_id))
                else {
                    return ClickOutcome::Nothing;
                };

                on_select(country);
                self.pulse(index);
                self.announce(country);
                debug!(country = %country.id, "marker clicked");
                ClickOutcome::Marker {
                    country_id: country.id.clone(),
                }
            }
            PickTarget::Globe => {
                let Some(at) = sphere_to_lat_lng(hit.point) else {
                    return ClickOutcome::Nothing;
                };
                let at_arr = [at.lat_deg, at.lng_deg];
                match nearest_country(self.catalog, at) {
                    Some((country, distance_deg)) if distance_deg < NEAREST_COUNTRY_THRESHOLD_DEG => {
                        on_select(country);
                        self.announce(country);
                        debug!(country = %country.id, distance_deg, "surface clicked");
                        ClickOutcome::Surface {
                            country_id: country.id.clone(),
                            at: at_arr,
                            distance_deg,
                        }
                    }
                    _ => ClickOutcome::SurfaceMiss { at: at_arr },
                }
            }
        }
    }

    /// Pixel position of a country's marker.
    pub fn screen_position_of(&self, country_id: &str) -> Option<[f64; 2]> {
        let marker = self.scene.markers.iter().find(|m| m.country_id == country_id)?;
        let ndc = self.camera.project(self.pose(), marker.position)?;
        Some(self.viewport.from_ndc(ndc))
    }

    pub fn snapshot(&self) -> GlobeSnapshot {
        let pose = self.pose();
        let horizon = self.scene.globe_radius * self.scene.globe_radius;
        let markers = self
            .scene
            .markers
            .iter()
            .map(|m| MarkerSnapshot {
                country_id: m.country_id.clone(),
                position: m.position.as_array(),
                scale: m.scale,
                screen: self
                    .camera
                    .project(pose, m.position)
                    .map(|ndc| self.viewport.from_ndc(ndc)),
                facing: m.position.dot(pose.eye) > horizon,
            })
            .collect();

        let loading = self.textures.loading_indicator_visible();
        GlobeSnapshot {
            loading,
            loading_text: loading.then_some(LOADING_TEXT),
            hint: HINT_TEXT,
            viewport: [self.viewport.width, self.viewport.height],
            eye: pose.eye.as_array(),
            distance: self.controller.distance(),
            auto_rotate: self.controller.auto_rotate,
            frame_index: self.frame.index,
            markers,
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    fn pulse(&mut self, index: usize) {
        let Some(marker) = self.scene.marker_mut(index) else {
            return;
        };
        marker.scale = PULSE_SCALE;

        let until = self.frame.time.after(PULSE_DURATION_S);
        self.pulses.retain(|p| p.marker != index);
        self.pulses.push(Pulse { marker: index, until });
    }

    fn announce(&mut self, country: &Country) {
        self.notices
            .emit_at(self.frame, NoticeLevel::Info, format!("{} seçildi", country.name));
    }
}

/// Catalog country closest to `at` in degree space; the first one wins ties.
pub fn nearest_country(catalog: &Catalog, at: LatLng) -> Option<(&Country, f64)> {
    let mut best: Option<(&Country, f64)> = None;
    for country in catalog.iter() {
        let d = country.coordinates.lat_lng().degree_distance(at);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((country, d));
        }
    }
    best
}
