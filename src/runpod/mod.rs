pub mod client;
pub mod normalize;
pub mod types;

pub use client::*;
pub use normalize::{ChatOutcome, DiagnosisOutcome, normalize_chat, normalize_diagnosis};
pub use types::*;
