//! Per-session UI state.
//!
//! Presentation layers own one [`SessionState`] and feed it every [`WorkflowEvent`]. Nothing here
//! is shared across sessions.

use crate::model::{
    FormState, GenerationResult, HistoryRecord, PlatformFormat, WorkflowEvent, WorkflowPhase,
};
use crate::normalize::units_from_content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Content currently on screen, with the format it was generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedContent {
    pub format: PlatformFormat,
    pub result: GenerationResult,
    /// Set when the content was reopened from history rather than freshly generated.
    pub history_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub form: FormState,
    pub busy: bool,
    pub phase: WorkflowPhase,
    pub displayed: Option<DisplayedContent>,
    pub history: Vec<HistoryRecord>,
    pub history_selected: usize,
    pub notice: Option<Notice>,
    pub provider_available: bool,
    pub user_id: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            busy: false,
            phase: WorkflowPhase::Idle,
            displayed: None,
            history: Vec::new(),
            history_selected: 0,
            notice: None,
            provider_available: true,
            user_id: None,
        }
    }
}

impl SessionState {
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    /// Claim the busy flag and hand back the form to submit.
    ///
    /// Refuses while another submission is in progress, after generation has been disabled,
    /// or before the prompt has any text.
    pub fn begin_submission(&mut self) -> Option<FormState> {
        if self.busy {
            return None;
        }
        if !self.provider_available {
            self.notify(
                NoticeLevel::Error,
                "Content generation is unavailable: no provider API key is configured",
            );
            return None;
        }
        if self.form.prompt.trim().is_empty() {
            self.notify(NoticeLevel::Error, "Please enter a prompt.");
            return None;
        }
        self.busy = true;
        self.notice = None;
        Some(self.form.clone())
    }

    pub fn apply(&mut self, ev: WorkflowEvent) {
        match ev {
            WorkflowEvent::PhaseChanged(phase) => {
                self.phase = phase;
                if phase.is_busy() {
                    self.busy = true;
                }
            }
            WorkflowEvent::ValidationFailed(msg) => {
                self.notify(NoticeLevel::Error, msg);
            }
            WorkflowEvent::ProviderUnavailable(msg) => {
                self.provider_available = false;
                self.notify(NoticeLevel::Error, msg);
            }
            WorkflowEvent::GenerationFailed { format, message } => {
                self.displayed = Some(DisplayedContent {
                    format,
                    result: GenerationResult::failure(),
                    history_id: None,
                });
                self.notify(NoticeLevel::Error, message);
            }
            WorkflowEvent::Generated { format, result } => {
                self.displayed = Some(DisplayedContent {
                    format,
                    result,
                    history_id: None,
                });
            }
            WorkflowEvent::Saved(record) => {
                // Records only ever join the list of the user who owns them.
                if self.user_id.as_deref() == Some(record.owner_id.as_str()) {
                    self.history.insert(0, record);
                    self.history_selected = 0;
                }
            }
            WorkflowEvent::SaveFailed(msg) => {
                self.notify(NoticeLevel::Warning, msg);
            }
            WorkflowEvent::HistoryLoaded(history) => {
                self.history = history;
                if self.history_selected >= self.history.len() {
                    self.history_selected = self.history.len().saturating_sub(1);
                }
            }
            WorkflowEvent::SignedIn(id) => {
                self.notify(NoticeLevel::Info, format!("Signed in as {id}"));
                self.user_id = Some(id);
            }
            WorkflowEvent::SignedOut => {
                self.user_id = None;
                self.history.clear();
                self.history_selected = 0;
                self.displayed = None;
                self.notify(NoticeLevel::Info, "Signed out");
            }
            WorkflowEvent::Info(msg) => {
                self.notify(NoticeLevel::Info, msg);
            }
            WorkflowEvent::Finished => {
                self.busy = false;
            }
        }
    }

    /// Reopen a history record: restores its format, prompt and units.
    pub fn select_history(&mut self, index: usize) -> bool {
        let Some(record) = self.history.get(index) else {
            return false;
        };
        self.history_selected = index;
        self.form.format = record.format;
        self.form.prompt = record.prompt.clone();
        self.displayed = Some(DisplayedContent {
            format: record.format,
            result: units_from_content(&record.content, record.format),
            history_id: Some(record.id.clone()),
        });
        true
    }

    /// Drop a record from the local list, keeping the selection in range.
    pub fn remove_history(&mut self, id: &str) -> bool {
        let Some(pos) = self.history.iter().position(|r| r.id == id) else {
            return false;
        };
        self.history.remove(pos);
        if self.history_selected >= self.history.len() {
            self.history_selected = self.history.len().saturating_sub(1);
        }
        if let Some(shown) = self.displayed.as_mut() {
            if shown.history_id.as_deref() == Some(id) {
                shown.history_id = None;
            }
        }
        true
    }

    pub fn selected_record(&self) -> Option<&HistoryRecord> {
        self.history.get(self.history_selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GENERATION_FAILED_MESSAGE;
    use time::macros::datetime;

    fn record(id: &str, format: PlatformFormat, content: &str) -> HistoryRecord {
        HistoryRecord {
            id: id.into(),
            owner_id: "u1".into(),
            format,
            prompt: format!("prompt {id}"),
            content: content.into(),
            created_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    fn ready() -> SessionState {
        let mut s = SessionState::default();
        s.form.prompt = "coffee".into();
        s.user_id = Some("u1".into());
        s
    }

    #[test]
    fn second_submission_is_refused_while_busy() {
        let mut s = ready();
        assert!(s.begin_submission().is_some());
        assert!(s.begin_submission().is_none());

        s.apply(WorkflowEvent::PhaseChanged(WorkflowPhase::Requesting));
        assert!(s.busy);
        s.apply(WorkflowEvent::Finished);
        assert!(!s.busy);
        assert!(s.begin_submission().is_some());
    }

    #[test]
    fn blank_prompt_is_not_submitted() {
        let mut s = ready();
        s.form.prompt = "   ".into();
        assert!(s.begin_submission().is_none());
        assert!(!s.busy);
        assert_eq!(s.notice.unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn provider_unavailable_disables_generation() {
        let mut s = ready();
        s.apply(WorkflowEvent::ProviderUnavailable("no key".into()));
        assert!(!s.provider_available);
        assert!(s.begin_submission().is_none());
    }

    #[test]
    fn generation_failure_replaces_content_with_placeholder() {
        let mut s = ready();
        s.apply(WorkflowEvent::Generated {
            format: PlatformFormat::Thread,
            result: GenerationResult {
                units: vec!["old".into()],
            },
        });
        s.apply(WorkflowEvent::GenerationFailed {
            format: PlatformFormat::Thread,
            message: "timeout".into(),
        });
        let shown = s.displayed.unwrap();
        assert_eq!(shown.result.units, vec![GENERATION_FAILED_MESSAGE]);
        assert!(s.history.is_empty());
    }

    #[test]
    fn failure_placeholder_keeps_the_submitted_format() {
        let mut s = ready();
        s.apply(WorkflowEvent::HistoryLoaded(vec![record(
            "a",
            PlatformFormat::ProfessionalPost,
            "Para",
        )]));
        assert!(s.begin_submission().is_some());
        // Reopening a record while busy switches the form to its format.
        assert!(s.select_history(0));
        s.apply(WorkflowEvent::GenerationFailed {
            format: PlatformFormat::Thread,
            message: "timeout".into(),
        });
        assert_eq!(s.form.format, PlatformFormat::ProfessionalPost);
        assert_eq!(s.displayed.unwrap().format, PlatformFormat::Thread);
    }

    #[test]
    fn saved_record_of_another_user_is_ignored() {
        let mut s = ready();
        let mut foreign = record("x", PlatformFormat::Thread, "y");
        foreign.owner_id = "someone-else".into();
        s.apply(WorkflowEvent::Saved(foreign));
        assert!(s.history.is_empty());

        s.apply(WorkflowEvent::SignedOut);
        s.apply(WorkflowEvent::Saved(record("z", PlatformFormat::Thread, "y")));
        assert!(s.history.is_empty());
    }

    #[test]
    fn saved_record_goes_to_the_head_without_reload() {
        let mut s = ready();
        s.apply(WorkflowEvent::HistoryLoaded(vec![record(
            "old",
            PlatformFormat::Thread,
            "x",
        )]));
        s.apply(WorkflowEvent::Saved(record("new", PlatformFormat::Thread, "y")));
        assert_eq!(s.history[0].id, "new");
        assert_eq!(s.history[1].id, "old");
    }

    #[test]
    fn save_failure_keeps_displayed_content() {
        let mut s = ready();
        s.apply(WorkflowEvent::Generated {
            format: PlatformFormat::ProfessionalPost,
            result: GenerationResult {
                units: vec!["post".into()],
            },
        });
        s.apply(WorkflowEvent::SaveFailed("disk full".into()));
        assert_eq!(s.displayed.unwrap().result.units, vec!["post"]);
        assert_eq!(s.notice.unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn selecting_history_restores_form_and_units() {
        let mut s = ready();
        s.apply(WorkflowEvent::HistoryLoaded(vec![
            record("a", PlatformFormat::ProfessionalPost, "Para\n\nPara"),
            record("b", PlatformFormat::Thread, "T1\n\nT2"),
        ]));
        assert!(s.select_history(1));
        assert_eq!(s.form.format, PlatformFormat::Thread);
        assert_eq!(s.form.prompt, "prompt b");
        let shown = s.displayed.clone().unwrap();
        assert_eq!(shown.result.units, vec!["T1", "T2"]);
        assert_eq!(shown.history_id.as_deref(), Some("b"));

        assert!(s.select_history(0));
        assert_eq!(s.displayed.as_ref().unwrap().result.units.len(), 1);
        assert!(!s.select_history(5));
    }

    #[test]
    fn removing_last_record_keeps_selection_in_range() {
        let mut s = ready();
        s.apply(WorkflowEvent::HistoryLoaded(vec![
            record("a", PlatformFormat::Thread, "x"),
            record("b", PlatformFormat::Thread, "y"),
        ]));
        s.history_selected = 1;
        assert!(s.remove_history("b"));
        assert_eq!(s.history_selected, 0);
        assert!(!s.remove_history("b"));
        assert_eq!(s.history.len(), 1);
    }

    #[test]
    fn sign_out_clears_private_state() {
        let mut s = ready();
        s.apply(WorkflowEvent::HistoryLoaded(vec![record(
            "a",
            PlatformFormat::Thread,
            "x",
        )]));
        s.apply(WorkflowEvent::SignedOut);
        assert!(!s.is_signed_in());
        assert!(s.history.is_empty());
    }
}
