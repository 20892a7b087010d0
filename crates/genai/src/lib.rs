//! Clients for the generative AI services.
//!
//! Wraps an OpenAI-compatible REST API behind two narrow traits —
//! [`image::ImageGenerator`] and [`text::TextGenerator`] — so the pipeline
//! can be driven by test doubles. Each client call is a single HTTP request
//! with no internal retry; retry policy belongs to the caller.

pub mod config;
pub mod error;
pub mod image;
pub mod text;

pub use config::GenAiConfig;
pub use error::GenAiError;
pub use image::{ImageGenerator, OpenAiImageClient};
pub use text::{OpenAiChatClient, TextGenerator};
