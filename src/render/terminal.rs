use colored::*;

use crate::models::{ChatId, HistoryGroup, SearchResult, UserProfile};
use super::{Area, Renderer, Sender};

/// Prints to stdout, one line per item. Panes can be hidden so a command
/// only shows what it was asked for.
#[derive(Debug)]
pub struct TerminalRenderer {
    active_chat: Option<ChatId>,
    history_visible: bool,
    conversation_visible: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self {
            active_chat: None,
            history_visible: true,
            conversation_visible: true,
        }
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_history_visible(&mut self, visible: bool) {
        self.history_visible = visible;
    }

    pub fn set_conversation_visible(&mut self, visible: bool) {
        self.conversation_visible = visible;
    }
}

impl Renderer for TerminalRenderer {
    fn render_grouped_history(&mut self, groups: &[HistoryGroup]) {
        if !self.history_visible {
            return;
        }
        for group in groups {
            println!("{}", group.label.bright_cyan().bold());
            for entry in &group.entries {
                let marker = if self.active_chat.as_ref() == Some(&entry.id) { "*" } else { " " };
                println!(
                    "{} {:>6}  {}  {}",
                    marker,
                    entry.id.as_str().dimmed(),
                    entry.title,
                    entry.display_time.dimmed()
                );
            }
        }
    }

    fn render_search_results(&mut self, results: &[SearchResult]) {
        for result in results {
            println!(
                "{:>6}  {}  {}",
                result.id.as_str().dimmed(),
                result.display_title,
                result.display_date.dimmed()
            );
        }
    }

    fn render_placeholder(&mut self, area: Area, text: &str) {
        let visible = match area {
            Area::History => self.history_visible,
            Area::Conversation => self.conversation_visible,
            Area::Search => true,
        };
        if !visible {
            return;
        }
        println!("{}", text.italic());
    }

    fn render_message(&mut self, sender: Sender, text: &str, timestamp: Option<&str>) {
        if !self.conversation_visible {
            return;
        }
        let label = match sender {
            Sender::User => "you".green().bold(),
            Sender::Ai => "echobot".bright_cyan().bold(),
        };
        match timestamp {
            Some(timestamp) => println!("{} {}\n{}\n", label, timestamp.dimmed(), text),
            None => println!("{}\n{}\n", label, text),
        }
    }

    fn clear_messages(&mut self) {}

    fn show_typing_indicator(&mut self, show: bool) {
        if show && self.conversation_visible {
            println!("{}", "echobot is typing...".dimmed());
        }
    }

    fn highlight_chat(&mut self, id: Option<&ChatId>) {
        self.active_chat = id.cloned();
    }

    fn set_search_open(&mut self, _open: bool) {}

    fn render_user(&mut self, profile: &UserProfile) {
        let name = profile.username.as_deref().unwrap_or("unknown user");
        println!("{} Welcome, {}", format!("[{}]", profile.initials()).bold(), name);
        if let Some(email) = &profile.email {
            println!("    {}", email.dimmed());
        }
        if let Some(avatar) = profile.custom_avatar() {
            println!("    avatar: {}", avatar.dimmed());
        }
    }

    fn show_active_file(&mut self, filename: Option<&str>) {
        if let Some(filename) = filename {
            println!("{} {}", "Active file:".bold(), filename);
        }
    }
}
