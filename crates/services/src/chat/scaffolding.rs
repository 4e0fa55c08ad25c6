use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use storage::{Storage, StorageError, StorageKey};
use tutor_core::completion;
use tutor_core::model::{ChatMessage, Emotion, PracticeKind, PromptType, SessionId, Transcript};

use super::{TurnTicket, scaffolding_key};
use crate::api::{ChatTurnResponse, LearningApi};
use crate::error::{ApiError, ChatError};

/// Snapshot kept under the kind's storage key while a session is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldingRecord {
    pub session_id: SessionId,
    #[serde(default)]
    pub exercise: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<PromptType>,
    #[serde(default)]
    pub transcript: Transcript,
}

/// Linear scaffolding chat for one practice phase.
pub struct ScaffoldingChat {
    kind: PracticeKind,
    api: Arc<dyn LearningApi>,
    storage: Storage,
    session: Option<ScaffoldingRecord>,
    generation: u64,
    loading: bool,
}

impl ScaffoldingChat {
    #[must_use]
    pub fn new(kind: PracticeKind, api: Arc<dyn LearningApi>, storage: Storage) -> Self {
        Self {
            kind,
            api,
            storage,
            session: None,
            generation: 0,
            loading: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PracticeKind {
        self.kind
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|record| &record.session_id)
    }

    #[must_use]
    pub fn record(&self) -> Option<&ScaffoldingRecord> {
        self.session.as_ref()
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

    /// Teaching stage of the latest tutor turn.
    #[must_use]
    pub fn current_step(&self) -> Option<&PromptType> {
        self.session.as_ref().and_then(|record| record.step.as_ref())
    }

    #[must_use]
    pub fn current_emotion(&self) -> Option<Emotion> {
        self.session
            .as_ref()
            .and_then(|record| record.transcript.last_ai())
            .and_then(|message| message.emotion)
    }

    #[must_use]
    pub fn is_step_complete(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|record| completion::is_step_complete(&record.transcript))
    }

    /// Resume the stored session if the server still knows it, else start fresh.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Api` if a new session cannot be started.
    pub async fn start(&mut self) -> Result<(), ChatError> {
        self.generation += 1;
        self.loading = false;
        let key = scaffolding_key(self.kind);

        if let Some(mut record) = self.load_record(key).await? {
            match self.api.session_messages(&record.session_id).await {
                Ok(history) => {
                    if history.is_empty() {
                        tracing::debug!(session = %record.session_id, "server history empty; keeping local transcript");
                    } else {
                        record.transcript =
                            Transcript::from(history.into_iter().map(ChatMessage::from).collect::<Vec<_>>());
                        record.step = latest_step(&record.transcript);
                    }
                    tracing::info!(kind = %self.kind, session = %record.session_id, "resumed chat session");
                    self.session = Some(record);
                    self.persist().await;
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!(
                        kind = %self.kind,
                        session = %record.session_id,
                        error = %err,
                        "stored session rejected; starting a new one"
                    );
                    self.forget(key).await;
                }
            }
        }

        let response = self.api.start_session(self.kind).await?;
        let welcome = ChatMessage::ai(response.welcome_message)
            .with_prompt_type(Some(PromptType::Scaffolding1))
            .with_emotion(Some(Emotion::Happy));
        let mut transcript = Transcript::new();
        transcript.push(welcome);
        tracing::info!(kind = %self.kind, session = %response.session.id, "started chat session");
        self.session = Some(ScaffoldingRecord {
            session_id: response.session.id,
            exercise: response.exercise,
            step: Some(PromptType::Scaffolding1),
            transcript,
        });
        self.persist().await;
        Ok(())
    }

    /// Append the learner's message and raise the loading flag.
    ///
    /// Returns `None` for blank input.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NoSession` before `start`, or `ChatError::Busy`
    /// while a reply is pending.
    pub fn begin_turn(&mut self, text: &str) -> Result<Option<TurnTicket>, ChatError> {
        let message = text.trim();
        if message.is_empty() {
            return Ok(None);
        }
        if self.loading {
            return Err(ChatError::Busy);
        }
        let record = self.session.as_mut().ok_or(ChatError::NoSession)?;
        record.transcript.push(ChatMessage::user(message));
        self.loading = true;
        Ok(Some(TurnTicket {
            session_id: record.session_id.clone(),
            generation: self.generation,
            message: message.to_string(),
        }))
    }

    /// Apply the tutor's reply to a turn opened with `begin_turn`.
    ///
    /// Returns whether a reply was appended; stale tickets are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Api` when the turn failed. The learner's message is
    /// kept and no reply is appended.
    pub async fn finish_turn(
        &mut self,
        ticket: TurnTicket,
        outcome: Result<ChatTurnResponse, ApiError>,
    ) -> Result<bool, ChatError> {
        if !self.owns(&ticket) {
            tracing::debug!(session = %ticket.session_id, "dropping reply for a closed session");
            return Ok(false);
        }
        self.loading = false;
        let reply = outcome.inspect_err(|err| {
            tracing::warn!(kind = %self.kind, session = %ticket.session_id, error = %err, "chat turn failed");
        })?;
        if let Some(record) = self.session.as_mut() {
            let message = reply.into_message();
            if message.prompt_type.is_some() {
                record.step.clone_from(&message.prompt_type);
            }
            record.transcript.push(message);
        }
        self.persist().await;
        Ok(true)
    }

    /// Send a message and wait for the tutor.
    ///
    /// # Errors
    ///
    /// See [`ScaffoldingChat::begin_turn`] and [`ScaffoldingChat::finish_turn`].
    pub async fn send(&mut self, text: &str) -> Result<(), ChatError> {
        let Some(ticket) = self.begin_turn(text)? else {
            return Ok(());
        };
        let outcome = self.request_reply(&ticket).await;
        self.finish_turn(ticket, outcome).await.map(|_| ())
    }

    /// Ask the tutor to answer an open turn; local state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the chat request fails.
    pub async fn request_reply(&self, ticket: &TurnTicket) -> Result<ChatTurnResponse, ApiError> {
        self.api.chat(&ticket.session_id, &ticket.message).await
    }

    /// Close the session on the server and clear every linear chat record.
    ///
    /// Records are cleared even if the server call fails; that failure is
    /// returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Api` for a failed server call, else
    /// `ChatError::Storage` if clearing failed.
    pub async fn complete(&mut self) -> Result<(), ChatError> {
        let notified = match self.session.as_ref() {
            Some(record) => self.api.complete_session(&record.session_id).await,
            None => Ok(()),
        };
        let cleared = self
            .storage
            .remove_all(StorageKey::SCAFFOLDING_SESSIONS)
            .await;

        if let Some(record) = self.session.take() {
            tracing::info!(kind = %self.kind, session = %record.session_id, "chat session completed");
        }
        self.generation += 1;
        self.loading = false;

        notified?;
        cleared?;
        Ok(())
    }

    fn owns(&self, ticket: &TurnTicket) -> bool {
        ticket.generation == self.generation
            && self.session_id().is_some_and(|id| *id == ticket.session_id)
    }

    async fn load_record(&self, key: StorageKey) -> Result<Option<ScaffoldingRecord>, ChatError> {
        match self.storage.get_json::<ScaffoldingRecord>(key).await {
            Ok(record) => Ok(record),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(%key, %reason, "discarding unreadable chat record");
                self.forget(key).await;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn forget(&self, key: StorageKey) {
        if let Err(err) = self.storage.remove(key).await {
            tracing::warn!(%key, error = %err, "failed to remove chat record");
        }
    }

    async fn persist(&self) {
        let Some(record) = self.session.as_ref() else {
            return;
        };
        let key = scaffolding_key(self.kind);
        if let Err(err) = self.storage.set_json(key, record).await {
            tracing::warn!(%key, error = %err, "failed to save chat record");
        }
    }
}

fn latest_step(transcript: &Transcript) -> Option<PromptType> {
    transcript
        .messages()
        .iter()
        .rev()
        .find_map(|message| message.prompt_type.clone())
}
