//! Prompt domain
//!
//! Templates for the evaluation and planning prompts.

mod template;

pub use template::PromptTemplate;
