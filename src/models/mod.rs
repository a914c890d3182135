mod chat;
mod history;
mod search;
mod session;

pub use chat::*;
pub use history::*;
pub use search::*;
pub use session::*;
