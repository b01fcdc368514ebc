//! Chat Commands Module
//!
//! Slash commands available inside the interactive skill chat.

use std::fmt;

/// Commands understood by the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    History,
    Skills,
    Analysis,
    Clear,
    Quit,
}

impl ChatCommand {
    /// Parse a command word (without the leading '/')
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "help" | "h" | "?" => Some(Self::Help),
            "history" | "hist" => Some(Self::History),
            "skills" | "me" => Some(Self::Skills),
            "analysis" | "paths" => Some(Self::Analysis),
            "clear" | "cls" => Some(Self::Clear),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Help => "Show available commands",
            Self::History => "Show the conversation, optionally filtered",
            Self::Skills => "Show your current skills and expertise",
            Self::Analysis => "Show the latest career analysis",
            Self::Clear => "Forget the conversation",
            Self::Quit => "Leave the chat",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Self::Help => "/help",
            Self::History => "/history [search_term]",
            Self::Skills => "/skills",
            Self::Analysis => "/analysis",
            Self::Clear => "/clear",
            Self::Quit => "/quit",
        }
    }

    pub fn all_commands() -> Vec<Self> {
        vec![
            Self::Help,
            Self::History,
            Self::Skills,
            Self::Analysis,
            Self::Clear,
            Self::Quit,
        ]
    }

    /// Formatted command list for display
    pub fn get_command_menu() -> Vec<String> {
        Self::all_commands()
            .into_iter()
            .map(|cmd| format!("{:<24} {}", cmd.usage(), cmd.description()))
            .collect()
    }
}

impl fmt::Display for ChatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Help => "Help",
            Self::History => "History",
            Self::Skills => "Skills",
            Self::Analysis => "Analysis",
            Self::Clear => "Clear",
            Self::Quit => "Quit",
        };
        write!(f, "{}", name)
    }
}

/// Command parser and utilities
pub struct CommandParser;

impl CommandParser {
    /// Split a '/'-prefixed line into command and arguments
    pub fn parse_command_line(input: &str) -> Option<(ChatCommand, Vec<String>)> {
        let without_prefix = input.trim().strip_prefix('/')?;
        let mut parts = without_prefix.split_whitespace();

        let command = ChatCommand::from_str(parts.next()?)?;
        let args = parts.map(str::to_string).collect();

        Some((command, args))
    }

    /// Get command suggestions for partial input
    pub fn get_suggestions(partial: &str) -> Vec<String> {
        let partial = partial.trim_start_matches('/').to_lowercase();
        let mut suggestions: Vec<String> = ChatCommand::all_commands()
            .into_iter()
            .filter(|cmd| cmd.to_string().to_lowercase().starts_with(&partial))
            .map(|cmd| format!("{} - {}", cmd.usage(), cmd.description()))
            .collect();

        suggestions.sort();
        suggestions
    }
}
