//! Ownership of the speech engines. The engines themselves are external; the
//! [`Narrator`] and [`Listener`] are their only mutators.

use std::collections::VecDeque;

use runtime::NoticeBus;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const SPEECH_LANG: &str = "tr-TR";
pub const SPEECH_RATE: f32 = 1.1;
pub const SPEECH_PITCH: f32 = 1.0;

pub const RECOGNITION_UNSUPPORTED_TEXT: &str = "Ses tanıma bu tarayıcıda desteklenmiyor.";
pub const LISTENING_TEXT: &str = "Sizi dinliyorum...";
pub const RECOGNITION_ERROR_TEXT: &str = "Ses algılamada bir hata oluştu.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech engine unavailable")]
    Unavailable,
    #[error("speech engine error: {0}")]
    Engine(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: &'static str,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: SPEECH_LANG,
            rate: SPEECH_RATE,
            pitch: SPEECH_PITCH,
        }
    }
}

/// Lifecycle notifications from the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Start,
    End,
    Error(String),
}

pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stops whatever is being spoken, immediately.
    fn cancel(&mut self);

    /// Lifecycle events raised since the last call.
    fn drain_events(&mut self) -> Vec<SpeechEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NarrationState {
    Idle,
    /// Requested but the engine has not reported a start yet.
    Queued,
    Speaking,
}

/// Sole owner of the synthesis engine.
pub struct Narrator {
    synth: Box<dyn SpeechSynthesizer>,
    state: NarrationState,
}

impl Narrator {
    pub fn new(synth: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            synth,
            state: NarrationState::Idle,
        }
    }

    /// Speaks `text`, cancelling any utterance still in progress first.
    pub fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if self.state != NarrationState::Idle {
            self.synth.cancel();
            self.state = NarrationState::Idle;
        }

        self.synth.speak(&Utterance::new(text))?;
        self.state = NarrationState::Queued;
        self.pump();
        Ok(())
    }

    pub fn cancel(&mut self) {
        if self.state != NarrationState::Idle {
            self.synth.cancel();
            self.state = NarrationState::Idle;
        }
    }

    /// Applies pending engine events to the speaking flag.
    pub fn pump(&mut self) {
        for event in self.synth.drain_events() {
            self.handle(event);
        }
    }

    /// While an utterance is queued, an `End` or a cancellation error can only belong to
    /// the utterance it replaced, so those are ignored.
    pub fn handle(&mut self, event: SpeechEvent) {
        let queued = self.state == NarrationState::Queued;
        self.state = match event {
            SpeechEvent::Start => NarrationState::Speaking,
            SpeechEvent::End if queued => {
                debug!("ignoring end of a cancelled utterance");
                return;
            }
            SpeechEvent::End => NarrationState::Idle,
            SpeechEvent::Error(reason) if queued && is_cancellation(&reason) => {
                debug!(%reason, "ignoring error of a cancelled utterance");
                return;
            }
            SpeechEvent::Error(reason) => {
                warn!(%reason, "speech synthesis failed");
                NarrationState::Idle
            }
        };
    }

    /// True from the moment speech is requested until it ends or fails.
    pub fn is_speaking(&self) -> bool {
        self.state != NarrationState::Idle
    }
}

/// Error codes engines raise for an utterance that was cancelled rather than failed.
fn is_cancellation(reason: &str) -> bool {
    matches!(reason, "interrupted" | "canceled" | "cancelled")
}

impl Drop for Narrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Server-side synthesizer: logs each utterance and reports it finished at once.
#[derive(Debug, Default)]
pub struct TracingSynthesizer {
    events: VecDeque<SpeechEvent>,
}

impl TracingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechSynthesizer for TracingSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        info!(
            lang = utterance.lang,
            rate = utterance.rate,
            pitch = utterance.pitch,
            chars = utterance.text.chars().count(),
            "narrating"
        );
        self.events.push_back(SpeechEvent::Start);
        self.events.push_back(SpeechEvent::End);
        Ok(())
    }

    fn cancel(&mut self) {
        debug!("narration cancelled");
        self.events.clear();
    }

    fn drain_events(&mut self) -> Vec<SpeechEvent> {
        self.events.drain(..).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub lang: &'static str,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            lang: SPEECH_LANG,
            continuous: false,
            interim_results: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Result(String),
    End,
    Error(String),
}

pub trait SpeechRecognizer: Send {
    fn start(&mut self, config: &RecognitionConfig) -> Result<(), SpeechError>;
    fn stop(&mut self);
    fn abort(&mut self);
}

/// Recognizer whose transcripts arrive from the client; start and stop only log.
#[derive(Debug, Default)]
pub struct ExternalRecognizer {
    active: bool,
}

impl SpeechRecognizer for ExternalRecognizer {
    fn start(&mut self, config: &RecognitionConfig) -> Result<(), SpeechError> {
        debug!(lang = config.lang, continuous = config.continuous, "recognition started");
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        debug!("recognition stopped");
        self.active = false;
    }

    fn abort(&mut self) {
        if self.active {
            debug!("recognition aborted");
        }
        self.active = false;
    }
}

/// Sole owner of the (optional) recognition engine.
pub struct Listener {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    config: RecognitionConfig,
    listening: bool,
}

impl Listener {
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            config: RecognitionConfig::default(),
            listening: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Starts or stops capture. Returns whether the listener is now listening.
    pub fn toggle(&mut self, notices: &mut NoticeBus) -> Result<bool, SpeechError> {
        let Some(recognizer) = self.recognizer.as_mut() else {
            notices.error(RECOGNITION_UNSUPPORTED_TEXT);
            return Err(SpeechError::Unavailable);
        };

        if self.listening {
            recognizer.stop();
            self.listening = false;
            return Ok(false);
        }

        if let Err(err) = recognizer.start(&self.config) {
            notices.error(RECOGNITION_ERROR_TEXT);
            return Err(err);
        }
        self.listening = true;
        notices.info(LISTENING_TEXT);
        Ok(true)
    }

    /// Applies a recognition event; a transcript replaces `draft`.
    pub fn handle(&mut self, event: RecognitionEvent, draft: &mut String, notices: &mut NoticeBus) {
        match event {
            RecognitionEvent::Result(transcript) => *draft = transcript,
            RecognitionEvent::End => self.listening = false,
            RecognitionEvent::Error(reason) => {
                warn!(%reason, "speech recognition failed");
                self.listening = false;
                notices.error(RECOGNITION_ERROR_TEXT);
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.abort();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use runtime::{NoticeBus, NoticeLevel};

    use super::*;

    /// Records engine calls; utterances never finish on their own.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSynth {
        pub(crate) log: Arc<Mutex<Vec<String>>>,
        pub(crate) active: Arc<Mutex<usize>>,
        pub(crate) max_active: Arc<Mutex<usize>>,
    }

    impl SpeechSynthesizer for RecordingSynth {
        fn speak(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
            self.log.lock().push(format!("speak:{}", utterance.text));
            let mut active = self.active.lock();
            *active += 1;
            let mut max = self.max_active.lock();
            *max = (*max).max(*active);
            Ok(())
        }

        fn cancel(&mut self) {
            self.log.lock().push("cancel".to_string());
            *self.active.lock() = 0;
        }

        fn drain_events(&mut self) -> Vec<SpeechEvent> {
            Vec::new()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingRecognizer {
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl SpeechRecognizer for RecordingRecognizer {
        fn start(&mut self, config: &RecognitionConfig) -> Result<(), SpeechError> {
            assert_eq!(config.lang, "tr-TR");
            assert!(!config.continuous);
            self.log.lock().push("start");
            if self.fail {
                return Err(SpeechError::Engine("not-allowed".to_string()));
            }
            Ok(())
        }

        fn stop(&mut self) {
            self.log.lock().push("stop");
        }

        fn abort(&mut self) {
            self.log.lock().push("abort");
        }
    }

    #[test]
    fn second_utterance_cancels_the_first() {
        let synth = RecordingSynth::default();
        let mut narrator = Narrator::new(Box::new(synth.clone()));

        narrator.speak("bir").unwrap();
        assert!(narrator.is_speaking());
        narrator.speak("iki").unwrap();

        assert_eq!(*synth.log.lock(), vec!["speak:bir", "cancel", "speak:iki"]);
        assert_eq!(*synth.max_active.lock(), 1);
    }

    #[test]
    fn lifecycle_events_drive_the_speaking_flag() {
        let synth = RecordingSynth::default();
        let mut narrator = Narrator::new(Box::new(synth.clone()));

        narrator.speak("merhaba").unwrap();
        narrator.handle(SpeechEvent::Start);
        assert!(narrator.is_speaking());
        narrator.handle(SpeechEvent::End);
        assert!(!narrator.is_speaking());

        // Idle narrator does not cancel.
        narrator.speak("tekrar").unwrap();
        narrator.handle(SpeechEvent::Error("synthesis-failed".to_string()));
        assert!(!narrator.is_speaking());
        assert_eq!(*synth.log.lock(), vec!["speak:merhaba", "speak:tekrar"]);
    }

    #[test]
    fn late_events_of_a_cancelled_utterance_are_ignored() {
        let synth = RecordingSynth::default();
        let mut narrator = Narrator::new(Box::new(synth.clone()));

        narrator.speak("bir").unwrap();
        narrator.handle(SpeechEvent::Start);
        narrator.speak("iki").unwrap();

        narrator.handle(SpeechEvent::Error("interrupted".to_string()));
        narrator.handle(SpeechEvent::End);
        assert!(narrator.is_speaking());

        narrator.handle(SpeechEvent::Start);
        narrator.handle(SpeechEvent::End);
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn dropping_the_narrator_cancels_speech() {
        let synth = RecordingSynth::default();
        {
            let mut narrator = Narrator::new(Box::new(synth.clone()));
            narrator.speak("uzun bir metin").unwrap();
        }
        assert_eq!(synth.log.lock().last().map(String::as_str), Some("cancel"));
    }

    #[test]
    fn tracing_synthesizer_finishes_immediately() {
        let mut narrator = Narrator::new(Box::new(TracingSynthesizer::new()));
        narrator.speak("selam").unwrap();
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn missing_recognizer_reports_unsupported() {
        let mut listener = Listener::new(None);
        let mut notices = NoticeBus::new();

        assert_eq!(listener.toggle(&mut notices), Err(SpeechError::Unavailable));
        assert!(!listener.is_listening());
        assert_eq!(notices.notices()[0].message, RECOGNITION_UNSUPPORTED_TEXT);
        assert_eq!(notices.notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn toggle_and_transcript() {
        let recognizer = RecordingRecognizer::default();
        let log = recognizer.log.clone();
        let mut listener = Listener::new(Some(Box::new(recognizer)));
        let mut notices = NoticeBus::new();
        let mut draft = "eski".to_string();

        assert_eq!(listener.toggle(&mut notices), Ok(true));
        assert_eq!(notices.drain()[0].message, LISTENING_TEXT);

        listener.handle(RecognitionEvent::Result("istanbul hava durumu".to_string()), &mut draft, &mut notices);
        assert_eq!(draft, "istanbul hava durumu");
        assert!(listener.is_listening());
        listener.handle(RecognitionEvent::End, &mut draft, &mut notices);
        assert!(!listener.is_listening());

        assert_eq!(listener.toggle(&mut notices), Ok(true));
        assert_eq!(listener.toggle(&mut notices), Ok(false));
        drop(listener);
        assert_eq!(*log.lock(), vec!["start", "start", "stop", "abort"]);
    }

    #[test]
    fn recognition_errors_reset_and_notify() {
        let mut listener = Listener::new(Some(Box::new(RecordingRecognizer::default())));
        let mut notices = NoticeBus::new();
        let mut draft = String::new();

        listener.toggle(&mut notices).unwrap();
        notices.drain();
        listener.handle(RecognitionEvent::Error("no-speech".to_string()), &mut draft, &mut notices);

        assert!(!listener.is_listening());
        assert_eq!(notices.notices()[0].message, RECOGNITION_ERROR_TEXT);
        assert!(draft.is_empty());
    }

    #[test]
    fn failed_start_stays_idle() {
        let recognizer = RecordingRecognizer {
            fail: true,
            ..RecordingRecognizer::default()
        };
        let mut listener = Listener::new(Some(Box::new(recognizer)));
        let mut notices = NoticeBus::new();

        assert!(matches!(listener.toggle(&mut notices), Err(SpeechError::Engine(_))));
        assert!(!listener.is_listening());
    }
}
