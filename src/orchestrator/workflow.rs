//! The content workflow: validate, request, normalize, persist, display.

use super::post_process::persist_generation;
use crate::error::WorkflowError;
use crate::identity::IdentityProvider;
use crate::model::{
    FormState, GenerationResult, HistoryRecord, SubmissionOutcome, WorkflowEvent, WorkflowPhase,
};
use crate::normalize::normalize;
use crate::provider::ProviderAdapter;
use crate::request::build_request;
use crate::storage::HistoryStore;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Capabilities the workflow needs, injected at construction time.
#[derive(Clone)]
pub struct ContentWorkflow {
    pub provider: ProviderAdapter,
    pub store: Arc<dyn HistoryStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

fn emit(events: &UnboundedSender<WorkflowEvent>, ev: WorkflowEvent) {
    let _ = events.send(ev);
}

impl ContentWorkflow {
    pub fn new(
        provider: ProviderAdapter,
        store: Arc<dyn HistoryStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            provider,
            store,
            identity,
        }
    }

    /// History of the signed-in user, newest first. Empty when nobody is signed in.
    pub async fn load_history(&self) -> Result<Vec<HistoryRecord>, WorkflowError> {
        let user = self.identity.current_user();
        let Some(owner) = user.authenticated_id() else {
            return Ok(Vec::new());
        };
        self.store
            .list(owner)
            .await
            .map_err(|e| WorkflowError::Load(e.to_string()))
    }

    /// Run one submission to completion, emitting every transition on `events`.
    ///
    /// The provider call and the history append are awaited in sequence. Only validation and
    /// provider failures mark the outcome as failed; a save failure is carried alongside a
    /// successful result.
    pub async fn submit(
        &self,
        form: &FormState,
        events: &UnboundedSender<WorkflowEvent>,
    ) -> SubmissionOutcome {
        let mut outcome = SubmissionOutcome {
            format: form.format,
            prompt: form.prompt.clone(),
            phase: WorkflowPhase::Validating,
            result: None,
            record: None,
            error: None,
            save_error: None,
        };
        emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Validating));

        let user = self.identity.current_user();
        let (request, owner_id) = match build_request(form, &user) {
            Ok(built) => built,
            Err(e) => {
                tracing::debug!(error = %e, "submission rejected");
                let msg = e.to_string();
                emit(events, WorkflowEvent::ValidationFailed(msg.clone()));
                emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Idle));
                emit(events, WorkflowEvent::Finished);
                outcome.phase = WorkflowPhase::Idle;
                outcome.error = Some(msg);
                return outcome;
            }
        };

        emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Requesting));
        tracing::info!(format = %request.format, owner = %owner_id, "generating content");
        let raw = match self.provider.generate(&request).await {
            Ok(raw) => raw,
            Err(WorkflowError::ProviderUnavailable(reason)) => {
                tracing::warn!(reason = %reason, "provider unavailable");
                let msg = WorkflowError::ProviderUnavailable(reason).to_string();
                emit(events, WorkflowEvent::ProviderUnavailable(msg.clone()));
                emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Idle));
                emit(events, WorkflowEvent::Finished);
                outcome.phase = WorkflowPhase::Idle;
                outcome.error = Some(msg);
                return outcome;
            }
            Err(e) => {
                tracing::error!(error = %e, "error generating content");
                let msg = e.to_string();
                emit(
                    events,
                    WorkflowEvent::GenerationFailed {
                        format: request.format,
                        message: msg.clone(),
                    },
                );
                emit(
                    events,
                    WorkflowEvent::PhaseChanged(WorkflowPhase::ErrorDisplayed),
                );
                emit(events, WorkflowEvent::Finished);
                outcome.phase = WorkflowPhase::ErrorDisplayed;
                outcome.result = Some(GenerationResult::failure());
                outcome.error = Some(msg);
                return outcome;
            }
        };

        emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Normalizing));
        let result = normalize(&raw, request.format);
        tracing::debug!(units = result.units.len(), "normalized provider output");
        emit(
            events,
            WorkflowEvent::Generated {
                format: request.format,
                result: result.clone(),
            },
        );
        outcome.result = Some(result.clone());

        emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Persisting));
        match persist_generation(
            self.store.as_ref(),
            &owner_id,
            &request.prompt,
            request.format,
            &result,
        )
        .await
        {
            Ok(record) => {
                emit(events, WorkflowEvent::Saved(record.clone()));
                outcome.record = Some(record);
            }
            Err(e) => {
                let msg = e.to_string();
                emit(events, WorkflowEvent::SaveFailed(msg.clone()));
                outcome.save_error = Some(msg);
            }
        }

        emit(events, WorkflowEvent::PhaseChanged(WorkflowPhase::Displaying));
        emit(events, WorkflowEvent::Finished);
        outcome.phase = WorkflowPhase::Displaying;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentity;
    use crate::model::{PlatformFormat, GENERATION_FAILED_MESSAGE};
    use crate::provider::fake::FakeProvider;
    use crate::provider::ContentProvider;
    use crate::storage::memory::MemoryStore;
    use tokio::sync::mpsc;

    fn workflow(
        provider: Option<Arc<dyn ContentProvider>>,
        store: Arc<MemoryStore>,
        user: Option<&str>,
    ) -> ContentWorkflow {
        ContentWorkflow::new(
            ProviderAdapter::new(provider),
            store,
            Arc::new(LocalIdentity::in_memory(user.map(str::to_string))),
        )
    }

    fn form(format: PlatformFormat, prompt: &str) -> FormState {
        FormState {
            format,
            prompt: prompt.into(),
            image: None,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<WorkflowEvent>) -> Vec<WorkflowEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    fn phases(events: &[WorkflowEvent]) -> Vec<WorkflowPhase> {
        events
            .iter()
            .filter_map(|e| match e {
                WorkflowEvent::PhaseChanged(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn coffee_thread_scenario() {
        let provider = FakeProvider::ok("Tweet 1 text\n\nTweet 2 text");
        let store = Arc::new(MemoryStore::new());
        let wf = workflow(Some(provider.clone()), store.clone(), Some("u1"));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = wf.submit(&form(PlatformFormat::Thread, "coffee"), &tx).await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.phase, WorkflowPhase::Displaying);
        assert_eq!(
            outcome.result.unwrap().units,
            vec!["Tweet 1 text", "Tweet 2 text"]
        );
        let record = outcome.record.unwrap();
        assert_eq!(record.content, "Tweet 1 text\n\nTweet 2 text");
        assert_eq!(store.len(), 1);
        assert_eq!(provider.calls(), 1);

        let events = drain(&mut rx);
        assert_eq!(
            phases(&events),
            vec![
                WorkflowPhase::Validating,
                WorkflowPhase::Requesting,
                WorkflowPhase::Normalizing,
                WorkflowPhase::Persisting,
                WorkflowPhase::Displaying,
            ]
        );
        assert!(matches!(events.last(), Some(WorkflowEvent::Finished)));
    }

    #[tokio::test]
    async fn empty_prompt_never_reaches_provider() {
        let provider = FakeProvider::ok("unused");
        let store = Arc::new(MemoryStore::new());
        let wf = workflow(Some(provider.clone()), store.clone(), Some("u1"));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = wf.submit(&form(PlatformFormat::Thread, ""), &tx).await;

        assert!(!outcome.succeeded());
        assert_eq!(outcome.phase, WorkflowPhase::Idle);
        assert_eq!(provider.calls(), 0);
        assert_eq!(store.len(), 0);
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, WorkflowEvent::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn anonymous_session_is_rejected() {
        let provider = FakeProvider::ok("unused");
        let wf = workflow(Some(provider.clone()), Arc::new(MemoryStore::new()), None);
        let (tx, _rx) = mpsc::unbounded_channel();

        let outcome = wf.submit(&form(PlatformFormat::Thread, "coffee"), &tx).await;
        assert_eq!(outcome.phase, WorkflowPhase::Idle);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_shows_placeholder_and_saves_nothing() {
        let store = Arc::new(MemoryStore::new());
        let wf = workflow(
            Some(FakeProvider::failing("503")),
            store.clone(),
            Some("u1"),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = wf
            .submit(&form(PlatformFormat::ProfessionalPost, "hiring"), &tx)
            .await;

        assert_eq!(outcome.phase, WorkflowPhase::ErrorDisplayed);
        assert_eq!(
            outcome.result.unwrap().units,
            vec![GENERATION_FAILED_MESSAGE.to_string()]
        );
        assert!(outcome.record.is_none());
        assert_eq!(store.len(), 0);
        let events = drain(&mut rx);
        assert!(!events.iter().any(|e| matches!(e, WorkflowEvent::Saved(_))));
    }

    #[tokio::test]
    async fn missing_provider_returns_to_idle() {
        let wf = workflow(None, Arc::new(MemoryStore::new()), Some("u1"));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = wf.submit(&form(PlatformFormat::Thread, "coffee"), &tx).await;

        assert_eq!(outcome.phase, WorkflowPhase::Idle);
        assert!(outcome.result.is_none());
        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, WorkflowEvent::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn save_failure_keeps_generated_content() {
        let wf = workflow(
            Some(FakeProvider::ok("A caption")),
            Arc::new(MemoryStore::failing()),
            Some("u1"),
        );
        let (tx, _rx) = mpsc::unbounded_channel();

        let outcome = wf
            .submit(&form(PlatformFormat::PhotoCaption, "beach"), &tx)
            .await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.phase, WorkflowPhase::Displaying);
        assert_eq!(outcome.result.unwrap().units, vec!["A caption"]);
        assert!(outcome.save_error.is_some());
        assert!(outcome.record.is_none());
    }

    #[tokio::test]
    async fn history_read_failure_is_a_load_error() {
        let wf = workflow(None, Arc::new(MemoryStore::unreadable()), Some("u1"));
        let err = wf.load_history().await.unwrap_err();
        assert!(matches!(err, WorkflowError::Load(_)));
        assert_eq!(
            err.to_string(),
            "Could not load history: I/O error: history unreadable"
        );

        let anonymous = workflow(None, Arc::new(MemoryStore::unreadable()), None);
        assert!(anonymous.load_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_record_heads_the_next_history_read() {
        let store = Arc::new(MemoryStore::new());
        let wf = workflow(Some(FakeProvider::ok("one\n\ntwo")), store, Some("u1"));
        let (tx, _rx) = mpsc::unbounded_channel();

        wf.submit(&form(PlatformFormat::Thread, "first"), &tx).await;
        let second = wf
            .submit(&form(PlatformFormat::Thread, "second"), &tx)
            .await
            .record
            .unwrap();

        let history = wf.load_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], second);
    }
}
