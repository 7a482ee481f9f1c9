pub mod llm_service;
pub mod output_writer;
pub mod pdf;
pub mod prompt_builder;

pub use llm_service::{LlmService, TextGenerator};
pub use pdf::PdfFormatter;
