//! Prompt domain
//!
//! Templates for the prompts the relay sends on its own behalf.

mod template;

pub use template::PromptTemplate;
