//! Chat progress trackers for the three tutor phases.
//!
//! Both variants resume from a per-kind storage record, re-validate it
//! against the server, and append optimistically: a learner's message stays
//! in the transcript even when the tutor never answers it.

mod polya;
mod scaffolding;

pub use polya::{PolyaChat, PolyaRecord};
pub use scaffolding::{ScaffoldingChat, ScaffoldingRecord};

use storage::StorageKey;
use tutor_core::model::{PracticeKind, SessionId};

/// Proof that a learner message was appended and a reply is awaited.
///
/// A reply is only applied while the ticket still matches the tracker's
/// active session; otherwise it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTicket {
    session_id: SessionId,
    generation: u64,
    message: String,
}

impl TurnTicket {
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[must_use]
pub fn scaffolding_key(kind: PracticeKind) -> StorageKey {
    match kind {
        PracticeKind::Basic => StorageKey::PracticeSession,
        PracticeKind::Advanced => StorageKey::AdvancedPracticeSession,
        PracticeKind::Application => StorageKey::ApplicationSession,
    }
}

#[must_use]
pub fn polya_key(kind: PracticeKind) -> StorageKey {
    match kind {
        PracticeKind::Basic => StorageKey::PolyaPracticeSession,
        PracticeKind::Advanced => StorageKey::PolyaAdvancedSession,
        PracticeKind::Application => StorageKey::PolyaApplicationSession,
    }
}
