//! Screen composition: everything one client renders, assembled from the globe, the
//! selection and the conversation session.

use catalog::{Country, VideoPanel, video_for};
use runtime::Notice;
use scene::selection::SelectionState;
use scene::{GlobeSnapshot, GlobeView};
use serde::Serialize;
use session::{Session, SessionSnapshot};

pub const TITLE: &str = "Discovery Globe";
pub const SUBTITLE: &str = "Touch and Discover";
pub const GUIDE_STATUS: &str = "Yapay Zeka Rehber Aktif";
pub const WELCOME_TEXT: &str = "Merhaba! Dünya hakkında bir sorunuz var mı?";
pub const WELCOME_EXAMPLE: &str = "Örneğin: \"Türkiye hakkında bilgi verir misin?\" veya \"İstanbul'da hava nasıl?\"";
pub const SPEAKING_TEXT: &str = "Konuşuyor...";
pub const CLOSE_TEXT: &str = "Kapat";

/// Globe-side state of one client: the interactive view and what is selected on it.
pub struct GlobeState {
    pub view: GlobeView<'static>,
    pub selection: SelectionState,
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoPanel {
    pub country: Country,
    pub narration: String,
    pub close_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatPanel {
    /// Shown only while the conversation is empty.
    pub welcome: Option<[&'static str; 2]>,
    pub speaking_indicator: Option<&'static str>,
    #[serde(flatten)]
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct Screen {
    pub header: Header,
    pub globe: GlobeSnapshot,
    pub info_panel: Option<InfoPanel>,
    pub chat: ChatPanel,
    pub video: VideoPanel,
    pub notices: Vec<Notice>,
}

/// Builds the screen and hands over pending notices; each notice is shown once.
pub fn compose(globe: &mut GlobeState, session: &Session) -> Screen {
    let catalog = globe.view.catalog();
    let selected = globe.selection.selected(catalog);

    let info_panel = selected.map(|country| InfoPanel {
        country: country.clone(),
        narration: country.narration(),
        close_label: CLOSE_TEXT,
    });

    let snapshot = session.snapshot();
    let chat = ChatPanel {
        welcome: snapshot
            .entries
            .is_empty()
            .then_some([WELCOME_TEXT, WELCOME_EXAMPLE]),
        speaking_indicator: snapshot.speaking.then_some(SPEAKING_TEXT),
        session: snapshot,
    };

    let video = video_for(selected);
    let mut notices = globe.view.drain_notices();
    notices.extend(session.drain_notices());

    Screen {
        header: Header {
            title: TITLE,
            subtitle: SUBTITLE,
            status: GUIDE_STATUS,
        },
        globe: globe.view.snapshot(),
        info_panel,
        chat,
        video,
        notices,
    }
}
