//! One user's conversation with the guide: question/answer log, input draft and the
//! speech engines that read answers aloud and capture spoken questions.

pub mod conversation;
pub mod session;
pub mod speech;

pub use conversation::{Answer, Conversation, ConversationEntry, ConversationError, EntryId, PENDING_TEXT};
pub use session::{ANSWER_FAILED_TEXT, EMPTY_QUESTION_TEXT, Session, SessionError, SessionSnapshot};
pub use speech::{
    ExternalRecognizer, Listener, Narrator, RecognitionConfig, RecognitionEvent, SpeechError, SpeechEvent,
    SpeechRecognizer, SpeechSynthesizer, TracingSynthesizer, Utterance,
};
