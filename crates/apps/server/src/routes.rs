use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog::{Catalog, Country};
use dashmap::DashMap;
use knowledge::{AnswerSource, ChatClient, ChatMessage, CHAT_ERROR_TEXT};
use parking_lot::Mutex;
use scene::assets::{TextureError, TextureSlot};
use scene::camera::Viewport;
use scene::selection::SelectionState;
use scene::{ClickOutcome, GlobeView};
use serde::{Deserialize, Serialize};
use serde_json::json;
use session::{
    ExternalRecognizer, RecognitionEvent, Session, SessionError, SpeechError, SpeechEvent, SpeechRecognizer,
    TracingSynthesizer,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::view::{compose, GlobeState, Screen};

/// One connected client.
pub struct ClientSession {
    pub globe: Mutex<GlobeState>,
    pub session: Arc<Session>,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: &'static Catalog,
    pub sessions: Arc<DashMap<String, Arc<ClientSession>>>,
    pub answers: Arc<dyn AnswerSource>,
    pub chat: Arc<ChatClient>,
}

impl AppState {
    pub fn new(answers: Arc<dyn AnswerSource>, chat: ChatClient) -> Self {
        Self {
            catalog: Catalog::builtin(),
            sessions: Arc::new(DashMap::new()),
            answers,
            chat: Arc::new(chat),
        }
    }

    fn client(&self, id: &str) -> Result<Arc<ClientSession>, ApiError> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(ApiError::UnknownSession)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/countries", get(list_countries))
        .route("/countries/:id", get(get_country))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_screen))
        .route("/sessions/:id/input", post(post_input))
        .route("/sessions/:id/ask", post(post_ask))
        .route("/sessions/:id/narrate", post(post_narrate))
        .route("/sessions/:id/listen", post(post_listen))
        .route("/chat", post(post_chat))
        .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
    UnknownSession,
    UnknownCountry,
    NothingSelected,
    Session(SessionError),
    Texture(TextureError),
    ChatFailed,
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSession => write!(f, "unknown session"),
            Self::UnknownCountry => write!(f, "unknown country"),
            Self::NothingSelected => write!(f, "no country selected"),
            Self::Session(SessionError::EmptyQuestion) => write!(f, "{}", session::EMPTY_QUESTION_TEXT),
            Self::Session(SessionError::Speech(SpeechError::Unavailable)) => {
                write!(f, "{}", session::speech::RECOGNITION_UNSUPPORTED_TEXT)
            }
            Self::Session(err) => write!(f, "{err}"),
            Self::Texture(err) => write!(f, "{err}"),
            Self::ChatFailed => write!(f, "{CHAT_ERROR_TEXT}"),
            Self::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnknownSession | Self::UnknownCountry => StatusCode::NOT_FOUND,
            Self::NothingSelected | Self::Session(SessionError::Busy) | Self::Texture(_) => StatusCode::CONFLICT,
            Self::Session(SessionError::EmptyQuestion) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::Speech(SpeechError::Unavailable)) => StatusCode::NOT_IMPLEMENTED,
            Self::Session(_) | Self::ChatFailed | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<TextureError> for ApiError {
    fn from(err: TextureError) -> Self {
        Self::Texture(err)
    }
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn list_countries(State(state): State<AppState>) -> Json<Vec<Country>> {
    Json(state.catalog.iter().cloned().collect())
}

async fn get_country(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Country>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::UnknownCountry)
}

#[derive(Debug, Deserialize)]
pub struct CreateSession {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_true")]
    pub speech_recognition: bool,
}

impl Default for CreateSession {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            speech_recognition: true,
        }
    }
}

fn default_width() -> f64 {
    Viewport::default().width
}

fn default_height() -> f64 {
    Viewport::default().height
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub session_id: String,
    pub screen: Screen,
}

async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSession>>,
) -> Json<Created> {
    let Json(req) = body.unwrap_or_default();
    let recognizer: Option<Box<dyn SpeechRecognizer>> = req
        .speech_recognition
        .then(|| Box::new(ExternalRecognizer::default()) as Box<dyn SpeechRecognizer>);

    let client = Arc::new(ClientSession {
        globe: Mutex::new(GlobeState {
            view: GlobeView::new(state.catalog, Viewport::new(req.width, req.height)),
            selection: SelectionState::new(),
        }),
        session: Arc::new(Session::new(
            state.answers.clone(),
            Box::new(TracingSynthesizer::new()),
            recognizer,
        )),
    });

    let session_id = Uuid::new_v4().to_string();
    let screen = compose(&mut client.globe.lock(), &client.session);
    state.sessions.insert(session_id.clone(), client);
    info!(%session_id, "session created");

    Json(Created { session_id, screen })
}

async fn get_screen(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Screen>, ApiError> {
    let client = state.client(&id)?;
    let screen = compose(&mut client.globe.lock(), &client.session);
    Ok(Json(screen))
}

/// Events a client forwards from its canvas, asset loader and speech engines.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i32,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default = "default_dt")]
        dt: f64,
    },
    PointerUp,
    Wheel {
        delta: f64,
    },
    Frame {
        dt: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
    Click {
        x: f64,
        y: f64,
    },
    TextureLoaded {
        slot: TextureSlot,
    },
    TextureFailed {
        slot: TextureSlot,
        #[serde(default)]
        reason: String,
    },
    CloseInfoPanel,
    Draft {
        text: String,
    },
    SpeechStart,
    SpeechEnd,
    SpeechError {
        #[serde(default)]
        reason: String,
    },
    Transcript {
        text: String,
    },
    RecognitionEnd,
    RecognitionError {
        #[serde(default)]
        reason: String,
    },
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

#[derive(Debug, Serialize)]
pub struct InputResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<ClickOutcome>,
    pub screen: Screen,
}

async fn post_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(event): Json<InputEvent>,
) -> Result<Json<InputResponse>, ApiError> {
    let client = state.client(&id)?;
    let mut globe = client.globe.lock();
    let session = &client.session;
    let mut click = None;

    match event {
        InputEvent::PointerDown { x, y, button } => globe.view.on_pointer_down(x, y, button),
        InputEvent::PointerMove { x, y, dt } => globe.view.on_pointer_move(x, y, dt),
        InputEvent::PointerUp => globe.view.on_pointer_up(),
        InputEvent::Wheel { delta } => globe.view.on_wheel(delta),
        InputEvent::Frame { dt } => {
            let next = globe.view.frame().advance(dt);
            globe.view.tick(next);
        }
        InputEvent::Resize { width, height } => globe.view.resize(width, height),
        InputEvent::Click { x, y } => {
            let GlobeState { view, selection } = &mut *globe;
            let outcome = view.click(x, y, |country| {
                selection.select(country);
            });
            // Clicking past the globe dismisses the info panel; an empty ocean hit keeps it.
            if outcome == ClickOutcome::Nothing {
                selection.clear();
            }
            debug!(session = %id, ?outcome, "click");
            click = Some(outcome);
        }
        InputEvent::TextureLoaded { slot } => globe.view.texture_loaded(slot)?,
        InputEvent::TextureFailed { slot, reason } => globe.view.texture_failed(slot, &reason)?,
        InputEvent::CloseInfoPanel => {
            globe.selection.clear();
        }
        InputEvent::Draft { text } => session.set_draft(text),
        InputEvent::SpeechStart => session.speech_event(SpeechEvent::Start),
        InputEvent::SpeechEnd => session.speech_event(SpeechEvent::End),
        InputEvent::SpeechError { reason } => session.speech_event(SpeechEvent::Error(reason)),
        InputEvent::Transcript { text } => session.recognition_event(RecognitionEvent::Result(text)),
        InputEvent::RecognitionEnd => session.recognition_event(RecognitionEvent::End),
        InputEvent::RecognitionError { reason } => session.recognition_event(RecognitionEvent::Error(reason)),
    }

    let screen = compose(&mut globe, session);
    Ok(Json(InputResponse { click, screen }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    /// Falls back to the session's input draft.
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub entry_id: u64,
    pub answer: String,
    pub screen: Screen,
}

async fn post_ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<AskRequest>>,
) -> Result<Json<AskResponse>, ApiError> {
    let client = state.client(&id)?;
    let Json(req) = body.unwrap_or_default();
    let question = req.question.unwrap_or_else(|| client.session.draft());

    // A detached task: the answer lands in the conversation even if this request is dropped.
    let session = client.session.clone();
    let entry_id = tokio::spawn(async move { session.ask(&question).await })
        .await
        .map_err(|e| {
            error!("ask task failed: {e}");
            ApiError::Internal("answer task failed".to_string())
        })??;

    let mut globe = client.globe.lock();
    let screen = compose(&mut globe, &client.session);
    let answer = screen
        .chat
        .session
        .entries
        .iter()
        .find(|e| e.id == entry_id)
        .map(|e| e.answer_text().to_string())
        .unwrap_or_default();

    Ok(Json(AskResponse {
        entry_id: entry_id.0,
        answer,
        screen,
    }))
}

async fn post_narrate(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Screen>, ApiError> {
    let client = state.client(&id)?;
    let mut globe = client.globe.lock();
    let country = globe
        .selection
        .selected(state.catalog)
        .ok_or(ApiError::NothingSelected)?;
    client.session.narrate_country(country)?;
    Ok(Json(compose(&mut globe, &client.session)))
}

#[derive(Debug, Serialize)]
pub struct ListenResponse {
    pub listening: bool,
    pub screen: Screen,
}

async fn post_listen(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListenResponse>, ApiError> {
    let client = state.client(&id)?;
    let listening = client.session.toggle_listening()?;
    let mut globe = client.globe.lock();
    let screen = compose(&mut globe, &client.session);
    Ok(Json(ListenResponse { listening, screen }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

async fn post_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.chat.complete(&req.messages).await {
        Ok(answer) => Ok(Json(json!({ "answer": answer }))),
        Err(err) => {
            warn!(%err, "chat completion failed");
            Err(ApiError::ChatFailed)
        }
    }
}
