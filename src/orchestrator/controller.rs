//! Session controller.
//!
//! Owns submission lifecycle for one interactive session and emits events for presentation layers.

use super::workflow::ContentWorkflow;
use crate::model::{FormState, SubmissionOutcome, WorkflowEvent};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Submit(FormState),
    RefreshHistory,
    DeleteHistory(String),
    SignIn(String),
    SignOut,
    Quit,
}

const IDENTITY_BUSY: &str = "Wait for the current generation to finish before switching users";

/// Reload the signed-in user's history and publish it.
async fn publish_history(workflow: &ContentWorkflow, event_tx: &UnboundedSender<WorkflowEvent>) {
    match workflow.load_history().await {
        Ok(history) => {
            let _ = event_tx.send(WorkflowEvent::HistoryLoaded(history));
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load history");
            let _ = event_tx.send(WorkflowEvent::Info(e.to_string()));
        }
    }
}

/// Drive submissions based on UI commands and emit events back to presentation layers.
pub(crate) async fn run_controller(
    workflow: ContentWorkflow,
    event_tx: UnboundedSender<WorkflowEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    if !workflow.provider.is_available() {
        tracing::warn!("no provider API key configured; generation disabled");
        let _ = event_tx.send(WorkflowEvent::ProviderUnavailable(
            "Content generation is unavailable: no provider API key is configured".into(),
        ));
    }
    if let Some(id) = workflow.identity.current_user().authenticated_id() {
        let _ = event_tx.send(WorkflowEvent::SignedIn(id.to_string()));
    }
    publish_history(&workflow, &event_tx).await;

    // At most one submission in flight.
    let mut in_flight: Option<tokio::task::JoinHandle<SubmissionOutcome>> = None;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Submit(form)) => {
                        if in_flight.is_some() {
                            let _ = event_tx.send(WorkflowEvent::Info(
                                "A generation is already in progress".into(),
                            ));
                            continue;
                        }
                        let wf = workflow.clone();
                        let tx = event_tx.clone();
                        in_flight = Some(tokio::spawn(async move { wf.submit(&form, &tx).await }));
                    }
                    Some(UiCommand::RefreshHistory) => {
                        publish_history(&workflow, &event_tx).await;
                    }
                    Some(UiCommand::DeleteHistory(id)) => {
                        let user = workflow.identity.current_user();
                        let Some(owner) = user.authenticated_id() else {
                            continue;
                        };
                        match workflow.store.delete(owner, &id).await {
                            Ok(()) => {
                                let _ = event_tx.send(WorkflowEvent::Info("Deleted".into()));
                            }
                            Err(e) => {
                                let _ = event_tx.send(WorkflowEvent::Info(format!("Delete failed: {e}")));
                            }
                        }
                        publish_history(&workflow, &event_tx).await;
                    }
                    Some(UiCommand::SignIn(_) | UiCommand::SignOut) if in_flight.is_some() => {
                        let _ = event_tx.send(WorkflowEvent::Info(IDENTITY_BUSY.into()));
                    }
                    Some(UiCommand::SignIn(id)) => {
                        match workflow.identity.sign_in(&id) {
                            Ok(user) => {
                                if let Some(id) = user.authenticated_id() {
                                    let _ = event_tx.send(WorkflowEvent::SignedIn(id.to_string()));
                                }
                                publish_history(&workflow, &event_tx).await;
                            }
                            Err(e) => {
                                let _ = event_tx.send(WorkflowEvent::Info(format!("Sign in failed: {e:#}")));
                            }
                        }
                    }
                    Some(UiCommand::SignOut) => {
                        if let Err(e) = workflow.identity.sign_out() {
                            let _ = event_tx.send(WorkflowEvent::Info(format!("Sign out failed: {e:#}")));
                        } else {
                            let _ = event_tx.send(WorkflowEvent::SignedOut);
                        }
                    }
                    // An in-flight submission is abandoned, not aborted: its task keeps running
                    // until the runtime shuts down and its result is discarded.
                    Some(UiCommand::Quit) | None => break,
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if another select branch is chosen, and we'll never observe completion.
            done = async {
                if let Some(h) = in_flight.as_mut() {
                    return Some(h.await);
                }
                futures::future::pending().await
            } => {
                in_flight = None;
                if let Some(Err(e)) = done {
                    tracing::error!(error = %e, "submission task failed");
                    let _ = event_tx.send(WorkflowEvent::Info(format!("Generation task failed: {e}")));
                    let _ = event_tx.send(WorkflowEvent::Finished);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentity;
    use crate::model::WorkflowPhase;
    use crate::provider::fake::FakeProvider;
    use crate::provider::ProviderAdapter;
    use crate::session::SessionState;
    use crate::storage::memory::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    async fn next_matching(
        rx: &mut mpsc::UnboundedReceiver<WorkflowEvent>,
        pred: impl Fn(&WorkflowEvent) -> bool,
    ) -> WorkflowEvent {
        loop {
            let ev = rx.recv().await.expect("controller closed");
            if pred(&ev) {
                return ev;
            }
        }
    }

    #[tokio::test]
    async fn submit_then_sign_in_flow() {
        let workflow = ContentWorkflow::new(
            ProviderAdapter::new(Some(FakeProvider::ok("A\n\nB"))),
            Arc::new(MemoryStore::new()),
            Arc::new(LocalIdentity::in_memory(None)),
        );
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_controller(workflow, event_tx, cmd_rx));

        // Initial empty history for the anonymous session.
        next_matching(&mut event_rx, |e| matches!(e, WorkflowEvent::HistoryLoaded(h) if h.is_empty())).await;

        cmd_tx.send(UiCommand::SignIn("alice".into())).unwrap();
        next_matching(&mut event_rx, |e| matches!(e, WorkflowEvent::SignedIn(id) if id == "alice")).await;

        cmd_tx
            .send(UiCommand::Submit(FormState {
                prompt: "coffee".into(),
                ..Default::default()
            }))
            .unwrap();
        let saved = next_matching(&mut event_rx, |e| matches!(e, WorkflowEvent::Saved(_))).await;
        let WorkflowEvent::Saved(record) = saved else {
            unreachable!()
        };
        assert_eq!(record.owner_id, "alice");
        next_matching(&mut event_rx, |e| {
            matches!(e, WorkflowEvent::PhaseChanged(WorkflowPhase::Displaying))
        })
        .await;

        cmd_tx.send(UiCommand::Quit).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn user_cannot_change_while_generation_is_in_flight() {
        let workflow = ContentWorkflow::new(
            ProviderAdapter::new(Some(FakeProvider::slow(
                "A\n\nB",
                Duration::from_millis(200),
            ))),
            Arc::new(MemoryStore::new()),
            Arc::new(LocalIdentity::in_memory(Some("alice".into()))),
        );
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_controller(workflow, event_tx, cmd_rx));
        let mut session = SessionState::default();

        cmd_tx
            .send(UiCommand::Submit(FormState {
                prompt: "coffee".into(),
                ..Default::default()
            }))
            .unwrap();
        cmd_tx.send(UiCommand::SignOut).unwrap();
        cmd_tx.send(UiCommand::SignIn("bob".into())).unwrap();

        let mut refused = 0;
        loop {
            let ev = event_rx.recv().await.expect("controller closed");
            if matches!(&ev, WorkflowEvent::Info(m) if m == IDENTITY_BUSY) {
                refused += 1;
            }
            let finished = matches!(ev, WorkflowEvent::Finished);
            session.apply(ev);
            if finished {
                break;
            }
        }
        assert_eq!(refused, 2);
        assert_eq!(session.user_id.as_deref(), Some("alice"));
        assert_eq!(session.history.len(), 1);
        assert!(session.history.iter().all(|r| r.owner_id == "alice"));

        // Once the task has been reaped, switching users goes through.
        loop {
            cmd_tx.send(UiCommand::SignOut).unwrap();
            let ev = next_matching(&mut event_rx, |e| {
                matches!(e, WorkflowEvent::SignedOut)
                    || matches!(e, WorkflowEvent::Info(m) if m == IDENTITY_BUSY)
            })
            .await;
            if matches!(ev, WorkflowEvent::SignedOut) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cmd_tx.send(UiCommand::SignIn("bob".into())).unwrap();
        let loaded =
            next_matching(&mut event_rx, |e| matches!(e, WorkflowEvent::HistoryLoaded(_))).await;
        let WorkflowEvent::HistoryLoaded(history) = loaded else {
            unreachable!()
        };
        assert!(history.is_empty());

        cmd_tx.send(UiCommand::Quit).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn missing_provider_is_announced_once_at_start() {
        let workflow = ContentWorkflow::new(
            ProviderAdapter::new(None),
            Arc::new(MemoryStore::new()),
            Arc::new(LocalIdentity::in_memory(Some("u1".into()))),
        );
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_controller(workflow, event_tx, cmd_rx));

        let first = event_rx.recv().await.unwrap();
        assert!(matches!(first, WorkflowEvent::ProviderUnavailable(_)));

        drop(cmd_tx);
        handle.await.unwrap().unwrap();
    }
}
