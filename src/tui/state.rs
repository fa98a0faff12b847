use crate::config::Layout;
use crate::model::{FormState, HistoryRecord, WorkflowEvent};
use crate::session::{NoticeLevel, SessionState};
use ratatui::style::{Color, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Generate,
    History,
    Docs,
    Help,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Generate, Tab::History, Tab::Docs, Tab::Help];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Generate => "Generate",
            Tab::History => "History",
            Tab::Docs => "Docs",
            Tab::Help => "Help",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    /// Tabs that show private data and need a signed-in user.
    pub fn needs_user(self) -> bool {
        matches!(self, Tab::Generate | Tab::History)
    }
}

/// Which text field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    ImagePath,
    SignIn,
    DocsSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputView {
    Content,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePage {
    Home,
    Docs,
    Pricing,
    Faq,
}

pub struct UiState {
    pub tab: Tab,
    pub layout: Layout,
    pub session: SessionState,
    pub mode: InputMode,
    pub view: OutputView,
    pub site_page: SitePage,
    pub image_input: String,
    pub sign_in_input: String,
    pub docs_query: String,
    pub history_scroll_offset: usize,
    pub last_exported_path: Option<String>,
    pub spinner: usize,
}

impl UiState {
    pub fn new(layout: Layout, form: FormState) -> Self {
        let session = SessionState {
            form,
            ..Default::default()
        };
        Self {
            tab: Tab::Generate,
            layout,
            session,
            mode: InputMode::SignIn,
            view: OutputView::Content,
            site_page: SitePage::Home,
            image_input: String::new(),
            sign_in_input: String::new(),
            docs_query: String::new(),
            history_scroll_offset: 0,
            last_exported_path: None,
            spinner: 0,
        }
    }

    /// True when the current tab should show the sign-in screen instead of its content.
    pub fn shows_sign_in(&self) -> bool {
        self.tab.needs_user() && !self.session.is_signed_in()
    }

    /// Input mode that matches the current tab when nothing else is being edited.
    pub fn default_mode(&self) -> InputMode {
        if self.shows_sign_in() {
            InputMode::SignIn
        } else {
            InputMode::Normal
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.mode = self.default_mode();
        if tab == Tab::History {
            self.history_scroll_offset = 0;
        }
    }

    pub fn apply(&mut self, ev: WorkflowEvent) {
        let signed_in_before = self.session.is_signed_in();
        self.session.apply(ev);
        if signed_in_before != self.session.is_signed_in() {
            self.sign_in_input.clear();
            self.mode = self.default_mode();
        }
        if self.history_scroll_offset >= self.session.history.len() {
            self.history_scroll_offset = 0;
        }
    }

    pub fn selected_history(&self) -> Option<&HistoryRecord> {
        self.session.selected_record()
    }

    pub fn select_prev(&mut self) {
        let s = &mut self.session;
        if s.history_selected > 0 {
            s.history_selected -= 1;
            if s.history_selected < self.history_scroll_offset {
                self.history_scroll_offset = s.history_selected;
            }
        }
    }

    pub fn select_next(&mut self, visible: usize) {
        let s = &mut self.session;
        if s.history_selected + 1 < s.history.len() {
            s.history_selected += 1;
            let visible = visible.max(1);
            if s.history_selected >= self.history_scroll_offset + visible {
                self.history_scroll_offset = s.history_selected + 1 - visible;
            }
        }
    }

    pub fn notice_style(&self) -> Style {
        match self.session.notice.as_ref().map(|n| n.level) {
            Some(NoticeLevel::Error) => Style::default().fg(Color::Red),
            Some(NoticeLevel::Warning) => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::Gray),
        }
    }

    pub fn spinner_frame(&self) -> &'static str {
        const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
        FRAMES[self.spinner % FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlatformFormat;
    use time::macros::datetime;

    fn records(n: usize) -> Vec<HistoryRecord> {
        (0..n)
            .map(|i| HistoryRecord {
                id: format!("r{i}"),
                owner_id: "u1".into(),
                format: PlatformFormat::Thread,
                prompt: "p".into(),
                content: "c".into(),
                created_at: datetime!(2024-01-01 0:00 UTC),
            })
            .collect()
    }

    #[test]
    fn sign_in_switches_input_to_prompt() {
        let mut s = UiState::new(Layout::Sidebar, FormState::default());
        assert!(s.shows_sign_in());
        assert_eq!(s.mode, InputMode::SignIn);
        s.apply(WorkflowEvent::SignedIn("alice".into()));
        assert!(!s.shows_sign_in());
        assert_eq!(s.mode, InputMode::Normal);
        s.apply(WorkflowEvent::SignedOut);
        assert_eq!(s.mode, InputMode::SignIn);
    }

    #[test]
    fn docs_tab_is_public() {
        let mut s = UiState::new(Layout::TopNav, FormState::default());
        s.set_tab(Tab::Docs);
        assert!(!s.shows_sign_in());
        assert_eq!(Tab::Help.next(), Tab::Generate);
    }

    #[test]
    fn history_selection_scrolls_window() {
        let mut s = UiState::new(Layout::Sidebar, FormState::default());
        s.apply(WorkflowEvent::SignedIn("u1".into()));
        s.apply(WorkflowEvent::HistoryLoaded(records(5)));
        for _ in 0..4 {
            s.select_next(2);
        }
        assert_eq!(s.session.history_selected, 4);
        assert_eq!(s.history_scroll_offset, 3);
        s.select_next(2);
        assert_eq!(s.session.history_selected, 4);
        for _ in 0..4 {
            s.select_prev();
        }
        assert_eq!(s.session.history_selected, 0);
        assert_eq!(s.history_scroll_offset, 0);
    }
}
