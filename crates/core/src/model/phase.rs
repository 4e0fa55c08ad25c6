use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One stage of the learning flow.
///
/// Stages are strictly ordered; the only way back is [`PhaseAction::Restart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionPhase {
    #[serde(rename = "game")]
    Game,
    #[serde(rename = "game-result")]
    GameResult,
    #[serde(rename = "practice-basic")]
    PracticeBasic,
    #[serde(rename = "practice-advanced")]
    PracticeAdvanced,
    #[serde(rename = "application")]
    Application,
    #[serde(rename = "completed")]
    Completed,
}

impl SessionPhase {
    pub const ALL: [SessionPhase; 6] = [
        SessionPhase::Game,
        SessionPhase::GameResult,
        SessionPhase::PracticeBasic,
        SessionPhase::PracticeAdvanced,
        SessionPhase::Application,
        SessionPhase::Completed,
    ];

    #[must_use]
    pub const fn initial() -> Self {
        SessionPhase::Game
    }

    /// Stable storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Game => "game",
            SessionPhase::GameResult => "game-result",
            SessionPhase::PracticeBasic => "practice-basic",
            SessionPhase::PracticeAdvanced => "practice-advanced",
            SessionPhase::Application => "application",
            SessionPhase::Completed => "completed",
        }
    }

    /// Parses a stored value, treating anything unrecognized as absent.
    ///
    /// Accepts the older `warmup` / `warmup-result` spellings.
    #[must_use]
    pub fn from_stored(raw: &str) -> Option<Self> {
        // Values may have been written as JSON strings.
        let value = raw.trim().trim_matches('"');
        match value {
            "game" | "warmup" => Some(SessionPhase::Game),
            "game-result" | "warmup-result" => Some(SessionPhase::GameResult),
            "practice-basic" => Some(SessionPhase::PracticeBasic),
            "practice-advanced" => Some(SessionPhase::PracticeAdvanced),
            "application" => Some(SessionPhase::Application),
            "completed" => Some(SessionPhase::Completed),
            _ => None,
        }
    }

    /// Applies an action, returning the destination phase.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::InvalidTransition` when the action is not valid from this phase.
    pub fn apply(self, action: PhaseAction) -> Result<Self, PhaseError> {
        let next = match (self, action) {
            (_, PhaseAction::Restart) => SessionPhase::Game,
            (SessionPhase::Game, PhaseAction::CompleteWarmup) => SessionPhase::GameResult,
            (SessionPhase::GameResult, PhaseAction::StartPractice) => SessionPhase::PracticeBasic,
            (SessionPhase::PracticeBasic, PhaseAction::CompleteBasicPractice) => {
                SessionPhase::PracticeAdvanced
            }
            (SessionPhase::PracticeAdvanced, PhaseAction::CompleteAdvancedPractice) => {
                SessionPhase::Application
            }
            (SessionPhase::Application, PhaseAction::CompleteApplication) => {
                SessionPhase::Completed
            }
            (from, action) => return Err(PhaseError::InvalidTransition { from, action }),
        };
        Ok(next)
    }

    /// True for the phases that host a chat tutor.
    #[must_use]
    pub const fn is_chat(self) -> bool {
        matches!(
            self,
            SessionPhase::PracticeBasic | SessionPhase::PracticeAdvanced | SessionPhase::Application
        )
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionPhase {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_stored(s).ok_or_else(|| PhaseError::Unrecognized(s.to_string()))
    }
}

/// Transition requests understood by the phase state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseAction {
    CompleteWarmup,
    StartPractice,
    CompleteBasicPractice,
    CompleteAdvancedPractice,
    CompleteApplication,
    Restart,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PhaseError {
    #[error("cannot {action:?} from phase {from}")]
    InvalidTransition {
        from: SessionPhase,
        action: PhaseAction,
    },

    #[error("unrecognized phase: {0}")]
    Unrecognized(String),
}
