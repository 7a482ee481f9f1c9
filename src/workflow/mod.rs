pub mod homework_flow;
pub mod quiz_flow;

pub use homework_flow::{HomeworkFlow, HomeworkOutcome};
pub use quiz_flow::{FeedbackOutcome, PdfOutcome, QuizFlow, QuizOutcome};
