use storage::{Storage, StorageKey};
use tutor_core::model::{PhaseAction, SessionPhase};

use crate::error::PhaseControllerError;

/// Sequences the learner through the warm-up and the three tutor chats.
///
/// The active phase is written to `learn-game-phase` on every accepted
/// transition. A rejected transition leaves both memory and storage as they were.
pub struct PhaseController {
    storage: Storage,
    phase: SessionPhase,
}

impl PhaseController {
    /// Restore the saved phase; missing or unreadable values start from the beginning.
    pub async fn restore(storage: Storage) -> Self {
        let phase = match storage.get_string(StorageKey::LearnGamePhase).await {
            Ok(Some(raw)) => SessionPhase::from_stored(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unrecognized stored phase; starting over");
                SessionPhase::initial()
            }),
            Ok(None) => SessionPhase::initial(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored phase; starting over");
                SessionPhase::initial()
            }
        };
        Self { storage, phase }
    }

    #[must_use]
    pub fn current(&self) -> SessionPhase {
        self.phase
    }

    /// `game` → `game-result`.
    ///
    /// # Errors
    ///
    /// Returns `PhaseControllerError::Transition` from any other phase.
    pub async fn complete_warmup(&mut self) -> Result<SessionPhase, PhaseControllerError> {
        self.transition(PhaseAction::CompleteWarmup).await
    }

    /// `game-result` → `practice-basic`.
    ///
    /// # Errors
    ///
    /// Returns `PhaseControllerError::Transition` from any other phase.
    pub async fn start_practice(&mut self) -> Result<SessionPhase, PhaseControllerError> {
        self.transition(PhaseAction::StartPractice).await
    }

    /// # Errors
    ///
    /// Returns `PhaseControllerError::Transition` unless in `practice-basic`.
    pub async fn complete_basic_practice(&mut self) -> Result<SessionPhase, PhaseControllerError> {
        self.transition(PhaseAction::CompleteBasicPractice).await
    }

    /// # Errors
    ///
    /// Returns `PhaseControllerError::Transition` unless in `practice-advanced`.
    pub async fn complete_advanced_practice(
        &mut self,
    ) -> Result<SessionPhase, PhaseControllerError> {
        self.transition(PhaseAction::CompleteAdvancedPractice).await
    }

    /// # Errors
    ///
    /// Returns `PhaseControllerError::Transition` unless in `application`.
    pub async fn complete_application(&mut self) -> Result<SessionPhase, PhaseControllerError> {
        self.transition(PhaseAction::CompleteApplication).await
    }

    /// Go back to the warm-up and forget every saved session.
    ///
    /// The in-memory phase is reset even if clearing storage fails.
    ///
    /// # Errors
    ///
    /// Returns `PhaseControllerError::Storage` if any key could not be removed.
    pub async fn restart(&mut self) -> Result<(), PhaseControllerError> {
        self.phase = SessionPhase::initial();
        let keys = std::iter::once(StorageKey::LearnGamePhase).chain(StorageKey::session_records());
        self.storage.remove_all(keys).await?;
        tracing::info!("learning flow restarted");
        Ok(())
    }

    /// Apply any action; used by views that map a button onto a transition.
    ///
    /// # Errors
    ///
    /// Returns `PhaseControllerError` if the action is invalid here or cannot be persisted.
    pub async fn apply(&mut self, action: PhaseAction) -> Result<SessionPhase, PhaseControllerError> {
        if action == PhaseAction::Restart {
            self.restart().await?;
            return Ok(self.phase);
        }
        self.transition(action).await
    }

    async fn transition(
        &mut self,
        action: PhaseAction,
    ) -> Result<SessionPhase, PhaseControllerError> {
        let next = self.phase.apply(action)?;
        self.storage
            .set_string(StorageKey::LearnGamePhase, next.as_str())
            .await?;
        tracing::info!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
        Ok(next)
    }
}
