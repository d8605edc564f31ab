//! Review-side text handling: prompt assembly and comment extraction.

pub mod extract;
pub mod prompt;

pub use extract::extract_comments;
pub use prompt::{build_prompt, truncate_diff};
