use std::sync::Arc;

use serde::{Deserialize, Serialize};

use storage::{Storage, StorageError, StorageKey};
use tutor_core::model::{ChatMessage, Emotion, PolyaStep, PracticeKind, SessionId, Transcript};

use super::{TurnTicket, polya_key};
use crate::api::{PolyaApi, PolyaTurnResponse};
use crate::error::{ApiError, ChatError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyaRecord {
    pub exercise_id: SessionId,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub current_step: PolyaStep,
    #[serde(default)]
    pub transcript: Transcript,
}

/// Four-step guided chat for one practice phase.
///
/// The step always mirrors what the server last reported, and the exercise
/// only counts as completed when the server says so.
pub struct PolyaChat {
    kind: PracticeKind,
    api: Arc<dyn PolyaApi>,
    storage: Storage,
    session: Option<PolyaRecord>,
    generation: u64,
    loading: bool,
    exercise_completed: bool,
}

impl PolyaChat {
    #[must_use]
    pub fn new(kind: PracticeKind, api: Arc<dyn PolyaApi>, storage: Storage) -> Self {
        Self {
            kind,
            api,
            storage,
            session: None,
            generation: 0,
            loading: false,
            exercise_completed: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PracticeKind {
        self.kind
    }

    #[must_use]
    pub fn exercise_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|record| &record.exercise_id)
    }

    #[must_use]
    pub fn problem(&self) -> Option<&str> {
        self.session.as_ref().map(|record| record.problem.as_str())
    }

    #[must_use]
    pub fn current_step(&self) -> PolyaStep {
        self.session
            .as_ref()
            .map(|record| record.current_step)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        self.session
            .as_ref()
            .map_or(&[], |record| record.transcript.messages())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_exercise_completed(&self) -> bool {
        self.exercise_completed
    }

    /// # Errors
    ///
    /// Returns `ChatError::Api` if a new exercise cannot be started.
    pub async fn start(&mut self) -> Result<(), ChatError> {
        self.generation += 1;
        self.loading = false;
        self.exercise_completed = false;
        let key = polya_key(self.kind);

        if let Some(mut record) = self.load_record(key).await? {
            match self.api.polya_messages(&record.exercise_id).await {
                Ok(history) => {
                    if !history.is_empty() {
                        record.transcript = Transcript::from(
                            history.into_iter().map(ChatMessage::from).collect::<Vec<_>>(),
                        );
                        if let Some(step) = record
                            .transcript
                            .messages()
                            .iter()
                            .rev()
                            .find_map(|message| message.step)
                        {
                            record.current_step = step;
                        }
                    }
                    tracing::info!(kind = %self.kind, exercise = %record.exercise_id, "resumed polya exercise");
                    self.session = Some(record);
                    self.persist().await;
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!(
                        kind = %self.kind,
                        exercise = %record.exercise_id,
                        error = %err,
                        "stored polya exercise rejected; starting a new one"
                    );
                    self.forget(key).await;
                }
            }
        }

        let response = self.api.start_polya(self.kind).await?;
        let exercise = response.practice_exercise;
        let mut transcript = Transcript::new();
        transcript.push(
            ChatMessage::ai(response.welcome_message)
                .with_emotion(Some(Emotion::Happy))
                .with_step(Some(exercise.current_polya_step), None),
        );
        tracing::info!(kind = %self.kind, exercise = %exercise.id, "started polya exercise");
        self.session = Some(PolyaRecord {
            exercise_id: exercise.id,
            problem: exercise.problem,
            current_step: exercise.current_polya_step,
            transcript,
        });
        self.persist().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ChatError::NoSession`, `ChatError::Busy`, or
    /// `ChatError::Completed` once the server has closed the exercise.
    pub fn begin_turn(&mut self, text: &str) -> Result<Option<TurnTicket>, ChatError> {
        let message = text.trim();
        if message.is_empty() {
            return Ok(None);
        }
        if self.exercise_completed {
            return Err(ChatError::Completed);
        }
        if self.loading {
            return Err(ChatError::Busy);
        }
        let record = self.session.as_mut().ok_or(ChatError::NoSession)?;
        record.transcript.push(ChatMessage::user(message));
        self.loading = true;
        Ok(Some(TurnTicket {
            session_id: record.exercise_id.clone(),
            generation: self.generation,
            message: message.to_string(),
        }))
    }

    /// # Errors
    ///
    /// Returns `ChatError::Api` when the turn failed; the learner's message is kept.
    pub async fn finish_turn(
        &mut self,
        ticket: TurnTicket,
        outcome: Result<PolyaTurnResponse, ApiError>,
    ) -> Result<bool, ChatError> {
        if !self.owns(&ticket) {
            tracing::debug!(exercise = %ticket.session_id, "dropping reply for a closed exercise");
            return Ok(false);
        }
        self.loading = false;
        let reply = outcome.inspect_err(|err| {
            tracing::warn!(kind = %self.kind, exercise = %ticket.session_id, error = %err, "polya turn failed");
        })?;

        let completed = reply.is_exercise_completed();
        if let Some(record) = self.session.as_mut() {
            let emotion = if reply.passed == Some(true) {
                Emotion::Celebrating
            } else {
                Emotion::Encouraging
            };
            record.current_step = reply.current_step;
            record.transcript.push(
                ChatMessage::ai(reply.ai_response)
                    .with_emotion(Some(emotion))
                    .with_step(Some(reply.current_step), reply.passed),
            );
        }

        if completed {
            self.exercise_completed = true;
            let key = polya_key(self.kind);
            tracing::info!(kind = %self.kind, exercise = %ticket.session_id, "polya exercise completed");
            self.forget(key).await;
        } else {
            self.persist().await;
        }
        Ok(true)
    }

    /// # Errors
    ///
    /// See [`PolyaChat::begin_turn`] and [`PolyaChat::finish_turn`].
    pub async fn send(&mut self, text: &str) -> Result<(), ChatError> {
        let Some(ticket) = self.begin_turn(text)? else {
            return Ok(());
        };
        let outcome = self.request_reply(&ticket).await;
        self.finish_turn(ticket, outcome).await.map(|_| ())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the turn request fails.
    pub async fn request_reply(&self, ticket: &TurnTicket) -> Result<PolyaTurnResponse, ApiError> {
        self.api.polya_chat(&ticket.session_id, &ticket.message).await
    }

    /// Close the exercise on the server and clear every Polya record.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Api` for a failed server call (after clearing),
    /// else `ChatError::Storage`.
    pub async fn complete(&mut self) -> Result<(), ChatError> {
        let notified = match self.session.as_ref() {
            Some(record) => self.api.complete_polya(&record.exercise_id).await,
            None => Ok(()),
        };
        let cleared = self.storage.remove_all(StorageKey::POLYA_SESSIONS).await;

        if let Some(record) = self.session.take() {
            tracing::info!(kind = %self.kind, exercise = %record.exercise_id, "polya session closed");
        }
        self.generation += 1;
        self.loading = false;

        notified?;
        cleared?;
        Ok(())
    }

    fn owns(&self, ticket: &TurnTicket) -> bool {
        ticket.generation == self.generation
            && self.exercise_id().is_some_and(|id| *id == ticket.session_id)
    }

    async fn load_record(&self, key: StorageKey) -> Result<Option<PolyaRecord>, ChatError> {
        match self.storage.get_json::<PolyaRecord>(key).await {
            Ok(record) => Ok(record),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%key, %reason, "discarding unreadable polya record");
                self.forget(key).await;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn forget(&self, key: StorageKey) {
        if let Err(err) = self.storage.remove(key).await {
            tracing::warn!(%key, error = %err, "failed to remove polya record");
        }
    }

    async fn persist(&self) {
        let Some(record) = self.session.as_ref() else {
            return;
        };
        let key = polya_key(self.kind);
        if let Err(err) = self.storage.set_json(key, record).await {
            tracing::warn!(%key, error = %err, "failed to save polya record");
        }
    }
}
