pub mod conversation;
pub mod gemini;
pub mod relay;

pub use gemini::GeminiService;
pub use relay::{CompletionProvider, RelayService};
