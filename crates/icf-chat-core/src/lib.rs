pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod recall;
pub mod state;
pub mod widget;

// Re-export main types for convenience
pub use client::{AskClient, AskRequest, AskResponse};
pub use config::Config;
pub use error::ChatError;
pub use history::ConversationHistory;
pub use recall::InputRecall;
pub use state::{Message, Sender, Transcript, ERROR_TEXT};
pub use widget::{ChatWidget, PanelSize, MAX_INPUT_ROWS};
