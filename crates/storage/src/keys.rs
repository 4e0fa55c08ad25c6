use std::fmt;

/// Fixed keys of the client-local durable store.
///
/// Every value is a cache: losing any of them only costs a re-fetch or a
/// fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Token,
    LearnGamePhase,
    PracticeSession,
    AdvancedPracticeSession,
    ApplicationSession,
    PolyaPracticeSession,
    PolyaAdvancedSession,
    PolyaApplicationSession,
    SelectedTopicId,
    SelectedTopicName,
}

impl StorageKey {
    pub const ALL: [StorageKey; 10] = [
        StorageKey::Token,
        StorageKey::LearnGamePhase,
        StorageKey::PracticeSession,
        StorageKey::AdvancedPracticeSession,
        StorageKey::ApplicationSession,
        StorageKey::PolyaPracticeSession,
        StorageKey::PolyaAdvancedSession,
        StorageKey::PolyaApplicationSession,
        StorageKey::SelectedTopicId,
        StorageKey::SelectedTopicName,
    ];

    /// Records owned by the linear scaffolding chat.
    pub const SCAFFOLDING_SESSIONS: [StorageKey; 3] = [
        StorageKey::PracticeSession,
        StorageKey::AdvancedPracticeSession,
        StorageKey::ApplicationSession,
    ];

    /// Records owned by the Polya chat.
    pub const POLYA_SESSIONS: [StorageKey; 3] = [
        StorageKey::PolyaPracticeSession,
        StorageKey::PolyaAdvancedSession,
        StorageKey::PolyaApplicationSession,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::LearnGamePhase => "learn-game-phase",
            StorageKey::PracticeSession => "practice_session",
            StorageKey::AdvancedPracticeSession => "advanced_practice_session",
            StorageKey::ApplicationSession => "application_session",
            StorageKey::PolyaPracticeSession => "polya_practice_session",
            StorageKey::PolyaAdvancedSession => "polya_advanced_session",
            StorageKey::PolyaApplicationSession => "polya_application_session",
            StorageKey::SelectedTopicId => "selectedTopicId",
            StorageKey::SelectedTopicName => "selectedTopicName",
        }
    }

    /// Every chat session record, both variants.
    pub fn session_records() -> impl Iterator<Item = StorageKey> {
        Self::SCAFFOLDING_SESSIONS
            .into_iter()
            .chain(Self::POLYA_SESSIONS)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
