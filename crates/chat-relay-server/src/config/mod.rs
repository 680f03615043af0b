pub mod settings;

pub use settings::{ChatConfig, GeminiConfig, ServerConfig, Settings};
