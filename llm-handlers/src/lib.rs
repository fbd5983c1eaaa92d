//! Handlers that answer with the language model.

mod question_handler;

pub use question_handler::{QuestionHandler, DEFAULT_TYPING_DELAY};
