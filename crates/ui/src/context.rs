use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use services::{AppServices, AuthService, FeedbackService, LeaderboardService};
use storage::Storage;

/// Which tutor hosts the practice and application phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChatStyle {
    #[default]
    Scaffolding,
    Polya,
}

impl ChatStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChatStyle::Scaffolding => "scaffolding",
            ChatStyle::Polya => "polya",
        }
    }
}

impl fmt::Display for ChatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseChatStyleError(String);

impl fmt::Display for ParseChatStyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown chat style: {} (expected scaffolding or polya)", self.0)
    }
}

impl std::error::Error for ParseChatStyleError {}

impl FromStr for ChatStyle {
    type Err = ParseChatStyleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scaffolding" => Ok(ChatStyle::Scaffolding),
            "polya" => Ok(ChatStyle::Polya),
            other => Err(ParseChatStyleError(other.to_string())),
        }
    }
}

pub trait UiApp: Send + Sync {
    fn services(&self) -> AppServices;
    fn chat_style(&self) -> ChatStyle;
}

#[derive(Clone)]
pub struct AppContext {
    services: AppServices,
    chat_style: ChatStyle,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            services: app.services(),
            chat_style: app.chat_style(),
        }
    }

    #[must_use]
    pub fn services(&self) -> AppServices {
        self.services.clone()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    #[must_use]
    pub fn feedback(&self) -> Arc<FeedbackService> {
        self.services.feedback()
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        self.services.leaderboard()
    }

    #[must_use]
    pub fn storage(&self) -> Storage {
        self.services.storage()
    }

    #[must_use]
    pub fn chat_style(&self) -> ChatStyle {
        self.chat_style
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_style_parses_case_insensitively() {
        assert_eq!("Polya".parse::<ChatStyle>(), Ok(ChatStyle::Polya));
        assert_eq!(" scaffolding ".parse::<ChatStyle>(), Ok(ChatStyle::Scaffolding));
        assert!("socratic".parse::<ChatStyle>().is_err());
    }
}
