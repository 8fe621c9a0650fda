mod client;
mod types;

pub use client::ExtractionClient;
pub use types::{AttachedFile, Submission, SubmitOutcome, SUPPORTED_EXTENSIONS};
