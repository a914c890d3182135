pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod render;
pub mod services;

pub use commands::ChatController;
pub use error::{ClientError, ClientResult};
pub use render::{Area, Renderer, Sender, TerminalRenderer};
pub use services::backend_client::{ChatBackend, HttpBackend};
