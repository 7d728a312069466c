//! Question transcription from quiz images.
//!
//! [`QuestionExtractor`] asks the completion service for a delimited text
//! transcription and parses it with [`parse_questions`]. When nothing usable
//! comes back it asks for the quiz's subject instead and wraps the answer as a
//! single synthetic [`Question`].

pub mod extractor;
pub mod parser;
pub mod types;


pub use extractor::{ExtractionOutcome, QuestionExtractor};
pub use parser::parse_questions;
pub use types::{OptionLabel, Question};
