pub mod answer_sheet;
pub mod quiz;
pub mod section;

pub use answer_sheet::{numbered_list, Answer, AnswerSheet, QUESTION_COLUMN};
pub use quiz::{QuizRequest, SectionCounts};
pub use section::{LineKind, SectionKind};
