use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "echobot")]
#[command(version)]
#[command(about = "Terminal client for the EchoBot chat service")]
pub struct Args {
    /// Backend base URL (overrides config and ECHOBOT_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Session cookie value (overrides config and ECHOBOT_SESSION)
    #[arg(long, global = true)]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show chat history grouped by day
    History,

    /// Open one conversation
    Show {
        /// Chat id
        id: String,
    },

    /// Send a message to the assistant
    Send {
        message: String,

        /// Attach this file as context before sending
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Search chat history
    Search {
        query: String,

        /// Open the first result
        #[arg(long)]
        open: bool,
    },

    /// Upload a file for the assistant to read
    Upload { path: PathBuf },

    /// Export all chats as JSON
    Export {
        /// Output directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Delete a chat
    Delete { id: String },

    /// Show the signed-in user
    Whoami,

    /// End the backend session and forget the stored cookie
    Logout,

    /// Show or change stored settings
    Config {
        #[arg(long)]
        set_base_url: Option<String>,

        #[arg(long)]
        set_session: Option<String>,
    },
}
