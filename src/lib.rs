pub mod cases;
pub mod config;
pub mod error;
pub mod runpod;
pub mod server;
pub mod upload;

pub use error::{Error, Result};
