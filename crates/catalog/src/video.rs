use serde::Serialize;

use crate::Country;

/// Shown when nothing is selected or a country has no video of its own.
pub const DEFAULT_VIDEO_URL: &str = "https://www.youtube.com/embed/DKmrVTGMOCM";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoPanel {
    pub title: String,
    pub embed_url: String,
}

pub fn video_for(country: Option<&Country>) -> VideoPanel {
    match country {
        Some(c) => VideoPanel {
            title: format!("{} Video Tanıtımı", c.name),
            embed_url: c
                .video_url
                .clone()
                .unwrap_or_else(|| DEFAULT_VIDEO_URL.to_string()),
        },
        None => VideoPanel {
            title: "Dünya Tanıtım Videosu".to_string(),
            embed_url: DEFAULT_VIDEO_URL.to_string(),
        },
    }
}
