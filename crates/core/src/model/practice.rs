use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::phase::{PhaseAction, SessionPhase};

/// Which of the three tutor chats a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Basic,
    Advanced,
    Application,
}

impl PracticeKind {
    pub const ALL: [PracticeKind; 3] = [
        PracticeKind::Basic,
        PracticeKind::Advanced,
        PracticeKind::Application,
    ];

    /// The chat hosted by a phase, if any.
    #[must_use]
    pub const fn from_phase(phase: SessionPhase) -> Option<Self> {
        match phase {
            SessionPhase::PracticeBasic => Some(PracticeKind::Basic),
            SessionPhase::PracticeAdvanced => Some(PracticeKind::Advanced),
            SessionPhase::Application => Some(PracticeKind::Application),
            _ => None,
        }
    }

    #[must_use]
    pub const fn phase(self) -> SessionPhase {
        match self {
            PracticeKind::Basic => SessionPhase::PracticeBasic,
            PracticeKind::Advanced => SessionPhase::PracticeAdvanced,
            PracticeKind::Application => SessionPhase::Application,
        }
    }

    /// Transition that leaves this chat's phase.
    #[must_use]
    pub const fn completion_action(self) -> PhaseAction {
        match self {
            PracticeKind::Basic => PhaseAction::CompleteBasicPractice,
            PracticeKind::Advanced => PhaseAction::CompleteAdvancedPractice,
            PracticeKind::Application => PhaseAction::CompleteApplication,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PracticeKind::Basic => "basic",
            PracticeKind::Advanced => "advanced",
            PracticeKind::Application => "application",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            PracticeKind::Basic => "Luyện tập cơ bản",
            PracticeKind::Advanced => "Luyện tập nâng cao",
            PracticeKind::Application => "Vận dụng",
        }
    }
}

impl fmt::Display for PracticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
