use std::sync::Arc;

use catalog::Country;
use knowledge::AnswerSource;
use parking_lot::Mutex;
use runtime::{Notice, NoticeBus};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::conversation::{Conversation, ConversationEntry, ConversationError, EntryId};
use crate::speech::{
    Listener, Narrator, RecognitionEvent, SpeechError, SpeechEvent, SpeechRecognizer, SpeechSynthesizer,
};

pub const EMPTY_QUESTION_TEXT: &str = "Lütfen bir soru sorunuz.";
/// Stands in for an answer whose lookup was abandoned or crashed.
pub const ANSWER_FAILED_TEXT: &str = "Yanıt alınırken bir hata oluştu.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("a question is already being answered")]
    Busy,
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
}

/// Render-ready copy of the chat panel state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub entries: Vec<ConversationEntry>,
    pub draft: String,
    pub in_flight: bool,
    pub listening: bool,
    pub speaking: bool,
    pub recognition_available: bool,
    /// The input accepts text only while nothing is being said, heard or looked up.
    pub input_enabled: bool,
}

struct SessionState {
    conversation: Conversation,
    draft: String,
    in_flight: bool,
    notices: NoticeBus,
    narrator: Narrator,
    listener: Listener,
}

/// Settles an in-flight question if `ask` never gets to resolve it (panic or cancellation).
struct PendingAnswer<'a> {
    state: &'a Mutex<SessionState>,
    id: EntryId,
    settled: bool,
}

impl Drop for PendingAnswer<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(entry = self.id.0, "answer abandoned");
        let mut state = self.state.lock();
        state.in_flight = false;
        if let Err(err) = state.conversation.resolve(self.id, ANSWER_FAILED_TEXT) {
            warn!(%err, "could not settle abandoned answer");
        }
    }
}

pub struct Session {
    source: Arc<dyn AnswerSource>,
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(
        source: Arc<dyn AnswerSource>,
        synth: Box<dyn SpeechSynthesizer>,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
    ) -> Self {
        Self {
            source,
            state: Mutex::new(SessionState {
                conversation: Conversation::new(),
                draft: String::new(),
                in_flight: false,
                notices: NoticeBus::new(),
                narrator: Narrator::new(synth),
                listener: Listener::new(recognizer),
            }),
        }
    }

    /// Appends `question` with a pending answer, waits for the answer source and fills in
    /// that same entry, then reads the answer aloud.
    pub async fn ask(&self, question: &str) -> Result<EntryId, SessionError> {
        let question = question.trim();
        let id = {
            let mut state = self.state.lock();
            if question.is_empty() {
                state.notices.error(EMPTY_QUESTION_TEXT);
                return Err(SessionError::EmptyQuestion);
            }
            if state.in_flight {
                return Err(SessionError::Busy);
            }
            state.in_flight = true;
            state.draft.clear();
            state.conversation.push_pending(question)
        };

        debug!(entry = id.0, question, "answering");
        let mut pending = PendingAnswer {
            state: &self.state,
            id,
            settled: false,
        };
        let answer = self.source.answer(question).await;
        pending.settled = true;

        let mut state = self.state.lock();
        state.in_flight = false;
        state.conversation.resolve(id, answer.as_str())?;
        if let Err(err) = state.narrator.speak(&answer) {
            warn!(%err, "could not narrate answer");
        }
        Ok(id)
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.state.lock().draft = draft.into();
    }

    pub fn draft(&self) -> String {
        self.state.lock().draft.clone()
    }

    pub fn narrate(&self, text: &str) -> Result<(), SessionError> {
        self.state.lock().narrator.speak(text)?;
        Ok(())
    }

    pub fn narrate_country(&self, country: &Country) -> Result<(), SessionError> {
        self.narrate(&country.narration())
    }

    pub fn stop_narration(&self) {
        self.state.lock().narrator.cancel();
    }

    /// Returns whether the session is listening afterwards.
    pub fn toggle_listening(&self) -> Result<bool, SessionError> {
        let mut state = self.state.lock();
        let SessionState { listener, notices, .. } = &mut *state;
        Ok(listener.toggle(notices)?)
    }

    pub fn recognition_event(&self, event: RecognitionEvent) {
        let mut state = self.state.lock();
        let SessionState {
            listener,
            draft,
            notices,
            ..
        } = &mut *state;
        listener.handle(event, draft, notices);
    }

    pub fn speech_event(&self, event: SpeechEvent) {
        self.state.lock().narrator.handle(event);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut state = self.state.lock();
        state.narrator.pump();

        let speaking = state.narrator.is_speaking();
        let listening = state.listener.is_listening();
        SessionSnapshot {
            entries: state.conversation.entries().to_vec(),
            draft: state.draft.clone(),
            in_flight: state.in_flight,
            listening,
            speaking,
            recognition_available: state.listener.is_available(),
            input_enabled: !speaking && !listening && !state.in_flight,
        }
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.state.lock().notices.drain()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use catalog::Catalog;
    use knowledge::AnswerSource;
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    use super::*;
    use crate::conversation::{Answer, PENDING_TEXT};
    use crate::speech::TracingSynthesizer;
    use crate::speech::tests::RecordingSynth;

    /// Answers with the question reversed after a delay proportional to its length.
    struct SlowEcho;

    #[async_trait]
    impl AnswerSource for SlowEcho {
        async fn answer(&self, question: &str) -> String {
            tokio::time::sleep(Duration::from_millis(question.len() as u64 * 2)).await;
            format!("yanıt: {question}")
        }
    }

    /// Holds every answer until released.
    struct Gate(Arc<Notify>);

    #[async_trait]
    impl AnswerSource for Gate {
        async fn answer(&self, _question: &str) -> String {
            self.0.notified().await;
            "tamam".to_string()
        }
    }

    /// Panics on "patla", echoes everything else.
    struct Fragile;

    #[async_trait]
    impl AnswerSource for Fragile {
        async fn answer(&self, question: &str) -> String {
            tokio::task::yield_now().await;
            if question == "patla" {
                panic!("answer source crashed");
            }
            format!("yanıt: {question}")
        }
    }

    fn session(source: Arc<dyn AnswerSource>) -> Session {
        Session::new(source, Box::new(TracingSynthesizer::new()), None)
    }

    #[tokio::test]
    async fn each_answer_lands_on_its_question() {
        let session = session(Arc::new(SlowEcho));
        for question in ["uzun uzun bir soru metni", "kısa", "orta boy soru"] {
            session.ask(question).await.unwrap();
        }

        let snapshot = session.snapshot();
        let pairs: Vec<_> = snapshot
            .entries
            .iter()
            .map(|e| (e.question.clone(), e.answer_text().to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("uzun uzun bir soru metni".to_string(), "yanıt: uzun uzun bir soru metni".to_string()),
                ("kısa".to_string(), "yanıt: kısa".to_string()),
                ("orta boy soru".to_string(), "yanıt: orta boy soru".to_string()),
            ]
        );
        assert!(snapshot.input_enabled);
    }

    #[tokio::test]
    async fn blank_questions_are_rejected_with_a_notice() {
        let session = session(Arc::new(SlowEcho));
        assert_eq!(session.ask("   ").await, Err(SessionError::EmptyQuestion));
        assert!(session.snapshot().entries.is_empty());
        assert_eq!(session.drain_notices()[0].message, EMPTY_QUESTION_TEXT);
    }

    #[tokio::test]
    async fn second_question_waits_for_the_first() {
        let notify = Arc::new(Notify::new());
        let session = Arc::new(session(Arc::new(Gate(notify.clone()))));
        session.set_draft("Türkiye hakkında bilgi");

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.ask("Türkiye hakkında bilgi").await }
        });
        while !session.snapshot().in_flight {
            tokio::task::yield_now().await;
        }

        let snapshot = session.snapshot();
        assert!(!snapshot.input_enabled);
        assert!(snapshot.draft.is_empty());
        assert_eq!(snapshot.entries[0].answer_text(), PENDING_TEXT);
        assert_eq!(session.ask("ikinci").await, Err(SessionError::Busy));

        notify.notify_one();
        let id = first.await.unwrap().unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].id, id);
        assert_eq!(snapshot.entries[0].answer, Answer::Resolved("tamam".to_string()));
        assert!(!snapshot.in_flight);
    }

    #[tokio::test]
    async fn narration_cancels_the_previous_utterance() {
        let synth = RecordingSynth::default();
        let session = Session::new(Arc::new(SlowEcho), Box::new(synth.clone()), None);

        session.ask("bir").await.unwrap();
        assert!(session.snapshot().speaking);
        assert!(!session.snapshot().input_enabled);

        let turkey = Catalog::builtin().get("turkey").unwrap();
        session.narrate_country(turkey).unwrap();

        let log = synth.log.lock().clone();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], "speak:yanıt: bir");
        assert_eq!(log[1], "cancel");
        assert!(log[2].starts_with("speak:Türkiye hakkında bilgi."));
        assert_eq!(*synth.max_active.lock(), 1);

        session.speech_event(SpeechEvent::Start);
        session.speech_event(SpeechEvent::End);
        assert!(session.snapshot().input_enabled);
    }

    #[test]
    fn listening_without_a_recognizer() {
        let session = session(Arc::new(SlowEcho));
        assert_eq!(
            session.toggle_listening(),
            Err(SessionError::Speech(SpeechError::Unavailable))
        );
        assert!(!session.snapshot().recognition_available);
        assert_eq!(session.drain_notices().len(), 1);
    }

    #[test]
    fn transcript_fills_the_draft() {
        let session = Session::new(
            Arc::new(SlowEcho),
            Box::new(TracingSynthesizer::new()),
            Some(Box::new(crate::speech::ExternalRecognizer::default())),
        );
        assert_eq!(session.toggle_listening(), Ok(true));
        assert!(!session.snapshot().input_enabled);

        session.recognition_event(RecognitionEvent::Result("İstanbul'da hava nasıl?".to_string()));
        session.recognition_event(RecognitionEvent::End);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.draft, "İstanbul'da hava nasıl?");
        assert!(!snapshot.listening);
        assert!(snapshot.input_enabled);
    }

    #[tokio::test]
    async fn crashed_answer_does_not_lock_the_session() {
        let session = Arc::new(session(Arc::new(Fragile)));

        let crashed = tokio::spawn({
            let session = session.clone();
            async move { session.ask("patla").await }
        })
        .await;
        assert!(crashed.is_err());

        let snapshot = session.snapshot();
        assert!(!snapshot.in_flight);
        assert_eq!(snapshot.entries[0].answer, Answer::Resolved(ANSWER_FAILED_TEXT.to_string()));

        session.ask("tekrar").await.unwrap();
        assert_eq!(session.snapshot().entries[1].answer_text(), "yanıt: tekrar");
    }

    #[tokio::test]
    async fn cancelled_question_is_settled() {
        let session = Arc::new(session(Arc::new(Gate(Arc::new(Notify::new())))));
        let task = tokio::spawn({
            let session = session.clone();
            async move { session.ask("bekle").await }
        });
        while !session.snapshot().in_flight {
            tokio::task::yield_now().await;
        }

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let snapshot = session.snapshot();
        assert!(!snapshot.in_flight);
        assert_eq!(snapshot.entries[0].answer_text(), ANSWER_FAILED_TEXT);
    }
}
