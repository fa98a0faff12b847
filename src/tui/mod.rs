mod export;
mod help;
mod state;

use self::export::{copy_to_clipboard, export_record_json};
use self::help::draw_help;
use self::state::{InputMode, OutputView, SitePage, Tab, UiState};
use crate::config::{AppConfig, Layout as NavLayout};
use crate::model::{FormState, ImageAttachment, PlatformFormat, WorkflowEvent};
use crate::normalize::exceeds_cap;
use crate::orchestrator::{self, ContentWorkflow, UiCommand};
use crate::render::{render_content, render_preview, PreviewLine};
use crate::session::NoticeLevel;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use std::path::{Path, PathBuf};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const SIDEBAR_WIDTH: u16 = 24;

pub async fn run(workflow: ContentWorkflow, cfg: AppConfig, form: FormState) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<WorkflowEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(cfg, form, event_rx, cmd_tx));

    let res = orchestrator::run_controller(workflow, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// What the UI loop should do after a key press.
#[derive(Debug)]
enum KeyAction {
    Nothing,
    Command(UiCommand),
    Quit,
}

/// Values the key handler needs from outside the state.
struct KeyContext {
    export_dir: PathBuf,
    history_rows: usize,
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    cfg: AppConfig,
    form: FormState,
    mut event_rx: UnboundedReceiver<WorkflowEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(cfg.layout, form);
    let mut ctx = KeyContext {
        export_dir: cfg.data_dir.join("exports"),
        history_rows: 20,
    };

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            state.apply(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            if state.session.busy {
                state.spinner = state.spinner.wrapping_add(1);
            }
            if let Ok(size) = terminal.size() {
                ctx.history_rows = history_rows(size.height);
            }
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, k, &ctx) {
                    KeyAction::Nothing => {}
                    KeyAction::Command(cmd) => {
                        if cmd_tx.send(cmd).is_err() {
                            break Err(anyhow::anyhow!("session controller stopped"));
                        }
                    }
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

/// Rows available to the history list for a terminal of `height` rows.
fn history_rows(height: u16) -> usize {
    // Status bar, navigation, borders and the header line.
    (height as usize).saturating_sub(12).max(1) / 2
}

fn handle_key(state: &mut UiState, key: KeyEvent, ctx: &KeyContext) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Tab => {
            state.set_tab(state.tab.next());
            return KeyAction::Nothing;
        }
        KeyCode::F(1) => {
            state.set_tab(Tab::Help);
            return KeyAction::Nothing;
        }
        _ => {}
    }

    match state.mode {
        InputMode::SignIn => handle_sign_in_key(state, key),
        InputMode::ImagePath => handle_image_key(state, key),
        InputMode::DocsSearch => handle_docs_search_key(state, key),
        InputMode::Normal => match state.tab {
            Tab::Generate => handle_generate_key(state, key),
            Tab::History => handle_history_key(state, key, ctx),
            Tab::Docs => handle_docs_key(state, key),
            Tab::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
                _ => KeyAction::Nothing,
            },
        },
    }
}

/// Plain character typed into a text field, ignoring control chords.
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn handle_sign_in_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    if let Some(c) = typed_char(&key) {
        state.sign_in_input.push(c);
        return KeyAction::Nothing;
    }
    match key.code {
        KeyCode::Backspace => {
            state.sign_in_input.pop();
            KeyAction::Nothing
        }
        KeyCode::Enter => {
            let id = state.sign_in_input.trim().to_string();
            if id.is_empty() {
                state
                    .session
                    .notify(NoticeLevel::Error, "Enter a user id to sign in");
                return KeyAction::Nothing;
            }
            KeyAction::Command(UiCommand::SignIn(id))
        }
        KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Nothing,
    }
}

fn handle_generate_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if let Some(c) = typed_char(&key) {
        state.session.form.prompt.push(c);
        return KeyAction::Nothing;
    }
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Backspace => {
            state.session.form.prompt.pop();
            KeyAction::Nothing
        }
        KeyCode::Enter => match state.session.begin_submission() {
            Some(form) => KeyAction::Command(UiCommand::Submit(form)),
            None => KeyAction::Nothing,
        },
        KeyCode::F(2) => {
            if state.session.busy {
                return KeyAction::Nothing;
            }
            let form = &mut state.session.form;
            form.format = form.format.next();
            if !form.format.accepts_image() {
                form.image = None;
            }
            KeyAction::Nothing
        }
        KeyCode::F(3) => {
            state.view = match state.view {
                OutputView::Content => OutputView::Preview,
                OutputView::Preview => OutputView::Content,
            };
            KeyAction::Nothing
        }
        KeyCode::F(4) => {
            if state.session.busy {
                state.session.notify(
                    NoticeLevel::Info,
                    "Wait for the current generation to finish before signing out",
                );
                return KeyAction::Nothing;
            }
            KeyAction::Command(UiCommand::SignOut)
        }
        KeyCode::Char('o') if ctrl => {
            if state.session.form.format.accepts_image() {
                state.image_input.clear();
                state.mode = InputMode::ImagePath;
            } else {
                state.session.notify(
                    NoticeLevel::Info,
                    "Images can only be attached to photo captions (F2 to switch)",
                );
            }
            KeyAction::Nothing
        }
        KeyCode::Char('x') if ctrl => {
            if state.session.form.image.take().is_some() {
                state.session.notify(NoticeLevel::Info, "Image removed");
            }
            KeyAction::Nothing
        }
        KeyCode::Char('y') if ctrl => {
            let text = state
                .session
                .displayed
                .as_ref()
                .map(|d| d.result.content_text())
                .filter(|t| !t.is_empty());
            match text {
                Some(text) => match copy_to_clipboard(&text) {
                    Ok(()) => state
                        .session
                        .notify(NoticeLevel::Info, "✓ Copied content to clipboard"),
                    Err(e) => state
                        .session
                        .notify(NoticeLevel::Error, format!("Clipboard copy failed: {e:#}")),
                },
                None => state
                    .session
                    .notify(NoticeLevel::Info, "Nothing to copy yet"),
            }
            KeyAction::Nothing
        }
        _ => KeyAction::Nothing,
    }
}

fn handle_image_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    if let Some(c) = typed_char(&key) {
        state.image_input.push(c);
        return KeyAction::Nothing;
    }
    match key.code {
        KeyCode::Backspace => {
            state.image_input.pop();
        }
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let path = state.image_input.trim().to_string();
            if !path.is_empty() {
                match ImageAttachment::from_path(Path::new(&path)) {
                    Ok(image) => {
                        state.session.notify(
                            NoticeLevel::Info,
                            format!("Attached {} ({})", image.file_name, image.mime_type),
                        );
                        state.session.form.image = Some(image);
                    }
                    Err(e) => {
                        state
                            .session
                            .notify(NoticeLevel::Error, format!("Image not attached: {e:#}"));
                    }
                }
            }
            state.mode = InputMode::Normal;
        }
        _ => {}
    }
    KeyAction::Nothing
}

fn handle_history_key(state: &mut UiState, key: KeyEvent, ctx: &KeyContext) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            KeyAction::Nothing
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next(ctx.history_rows);
            KeyAction::Nothing
        }
        KeyCode::Enter => {
            let idx = state.session.history_selected;
            if state.session.select_history(idx) {
                state.view = OutputView::Content;
                state.set_tab(Tab::Generate);
            }
            KeyAction::Nothing
        }
        KeyCode::Char('d') => {
            let Some(id) = state.selected_history().map(|r| r.id.clone()) else {
                return KeyAction::Nothing;
            };
            state.session.remove_history(&id);
            KeyAction::Command(UiCommand::DeleteHistory(id))
        }
        KeyCode::Char('r') => KeyAction::Command(UiCommand::RefreshHistory),
        KeyCode::Char('e') => {
            let exported = state
                .selected_history()
                .map(|r| export_record_json(r, &ctx.export_dir));
            match exported {
                Some(Ok(p)) => {
                    state.last_exported_path = Some(p.to_string_lossy().to_string());
                    state.session.notify(
                        NoticeLevel::Info,
                        format!("Exported JSON: {} (press 'y' to copy path)", p.display()),
                    );
                }
                Some(Err(e)) => {
                    state
                        .session
                        .notify(NoticeLevel::Error, format!("JSON export failed: {e:#}"));
                }
                None => {}
            }
            KeyAction::Nothing
        }
        KeyCode::Char('y') => {
            match state.last_exported_path.clone() {
                Some(path) => match copy_to_clipboard(&path) {
                    Ok(()) => state
                        .session
                        .notify(NoticeLevel::Info, format!("✓ Copied to clipboard: {path}")),
                    Err(e) => state
                        .session
                        .notify(NoticeLevel::Error, format!("Clipboard copy failed: {e:#}")),
                },
                None => state.session.notify(
                    NoticeLevel::Info,
                    "No exported file path to copy. Export a record first (e)",
                ),
            }
            KeyAction::Nothing
        }
        _ => KeyAction::Nothing,
    }
}

fn handle_docs_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('/') => {
            state.site_page = SitePage::Docs;
            state.mode = InputMode::DocsSearch;
            KeyAction::Nothing
        }
        KeyCode::Char('0') => {
            state.site_page = SitePage::Home;
            KeyAction::Nothing
        }
        KeyCode::Char('1') => {
            state.site_page = SitePage::Docs;
            KeyAction::Nothing
        }
        KeyCode::Char('2') => {
            state.site_page = SitePage::Pricing;
            KeyAction::Nothing
        }
        KeyCode::Char('3') => {
            state.site_page = SitePage::Faq;
            KeyAction::Nothing
        }
        _ => KeyAction::Nothing,
    }
}

fn handle_docs_search_key(state: &mut UiState, key: KeyEvent) -> KeyAction {
    if let Some(c) = typed_char(&key) {
        state.docs_query.push(c);
        return KeyAction::Nothing;
    }
    match key.code {
        KeyCode::Backspace => {
            state.docs_query.pop();
        }
        KeyCode::Enter | KeyCode::Esc => {
            state.mode = InputMode::Normal;
        }
        _ => {}
    }
    KeyAction::Nothing
}

fn key_style() -> Style {
    Style::default().fg(Color::Magenta)
}

fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);

    let body = match state.layout {
        NavLayout::TopNav => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
                .split(outer[0]);
            draw_top_nav(chunks[0], f, state);
            chunks[1]
        }
        NavLayout::Sidebar => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)].as_ref())
                .split(outer[0]);
            draw_sidebar(chunks[0], f, state);
            chunks[1]
        }
    };

    if state.shows_sign_in() {
        draw_sign_in(body, f, state);
    } else {
        match state.tab {
            Tab::Generate => draw_generate(body, f, state),
            Tab::History => draw_history(body, f, state),
            Tab::Docs => draw_docs(body, f, state),
            Tab::Help => draw_help(body, f),
        }
    }

    draw_status(outer[1], f, state);
}

fn draw_top_nav(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let tabs = Tabs::new(Tab::ALL.iter().map(|t| Line::from(t.title())).collect::<Vec<_>>())
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL).title("threadcraft"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, area);
}

fn draw_sidebar(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines: Vec<Line> = Vec::new();
    for tab in Tab::ALL {
        if tab == state.tab {
            lines.push(Line::from(Span::styled(
                format!("▶ {}", tab.title()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(format!("  {}", tab.title())));
        }
    }
    lines.push(Line::from(""));
    match state.session.user_id.as_deref() {
        Some(id) => {
            lines.push(Line::from(Span::styled(
                "Signed in as",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(truncate(id, SIDEBAR_WIDTH as usize - 4)));
        }
        None => lines.push(Line::from(Span::styled(
            "Not signed in",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Tab", key_style()),
        Span::raw(" switch"),
    ]));

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("threadcraft"));
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut spans = Vec::new();
    if state.session.busy {
        spans.push(Span::styled(
            format!("{} {:?}  ", state.spinner_frame(), state.session.phase),
            Style::default().fg(Color::Cyan),
        ));
    }
    match state.session.notice.as_ref() {
        Some(n) => spans.push(Span::styled(n.message.clone(), state.notice_style())),
        None if !state.session.busy => spans.push(Span::styled(
            "Ready",
            Style::default().fg(Color::DarkGray),
        )),
        None => {}
    }
    let p = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}

fn draw_sign_in(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let lines = vec![
        Line::from(Span::styled(
            "Sign in to generate and browse your content",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("User id: "),
            Span::raw(state.sign_in_input.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", key_style()),
            Span::raw(" sign in   "),
            Span::styled("Tab", key_style()),
            Span::raw(" docs and help   "),
            Span::styled("Esc", key_style()),
            Span::raw(" quit"),
        ]),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Sign in"));
    f.render_widget(p, area);
}

fn draw_generate(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(cols[0]);

    let form = &state.session.form;

    let format_lines: Vec<Line> = PlatformFormat::ALL
        .iter()
        .map(|fmt| {
            if *fmt == form.format {
                Line::from(Span::styled(
                    format!("▶ {}", fmt.label()),
                    Style::default().fg(Color::Yellow),
                ))
            } else {
                Line::from(format!("  {}", fmt.label()))
            }
        })
        .collect();
    let formats = Paragraph::new(format_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Format (F2)"),
    );
    f.render_widget(formats, left[0]);

    let mut prompt_spans = vec![Span::raw(form.prompt.clone())];
    if state.mode == InputMode::Normal {
        prompt_spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    let prompt = Paragraph::new(Line::from(prompt_spans))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Prompt (Enter to generate)"),
        );
    f.render_widget(prompt, left[1]);

    let image_line = if !form.format.accepts_image() {
        Line::from(Span::styled(
            "Only used for photo captions",
            Style::default().fg(Color::DarkGray),
        ))
    } else if state.mode == InputMode::ImagePath {
        Line::from(vec![
            Span::raw("Path: "),
            Span::raw(state.image_input.clone()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ])
    } else {
        match form.image.as_ref() {
            Some(img) => Line::from(format!("{} ({})", img.file_name, img.mime_type)),
            None => Line::from(vec![
                Span::raw("none  "),
                Span::styled("Ctrl-O", key_style()),
                Span::raw(" attach"),
            ]),
        }
    };
    let image = Paragraph::new(image_line)
        .block(Block::default().borders(Borders::ALL).title("Image"));
    f.render_widget(image, left[2]);

    draw_output(cols[1], f, state);
}

fn draw_output(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let view_name = match state.view {
        OutputView::Content => "Content",
        OutputView::Preview => "Preview",
    };
    let mut title = format!("{view_name} (F3 to toggle)");

    let lines: Vec<Line> = match state.session.displayed.as_ref() {
        None if state.session.busy => vec![Line::from(Span::styled(
            format!("{} Generating…", state.spinner_frame()),
            Style::default().fg(Color::Cyan),
        ))],
        None => vec![Line::from(Span::styled(
            "Nothing generated yet.",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(shown) => {
            if shown.history_id.is_some() {
                title.push_str(" - from history");
            }
            match state.view {
                OutputView::Content => content_lines(shown.format, &shown.result),
                OutputView::Preview => render_preview(&shown.result, shown.format)
                    .into_iter()
                    .map(preview_line)
                    .collect(),
            }
        }
    };

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

fn content_lines(
    format: PlatformFormat,
    result: &crate::model::GenerationResult,
) -> Vec<Line<'static>> {
    let over: Vec<bool> = result.units.iter().map(|u| exceeds_cap(u)).collect();
    let mut unit = 0usize;
    render_content(result, format)
        .into_iter()
        .map(|line| {
            // Thread unit headers look like "[3] 120/280".
            if format == PlatformFormat::Thread && line.starts_with('[') && line.ends_with("/280") {
                let color = if over.get(unit).copied().unwrap_or(false) {
                    Color::Red
                } else {
                    Color::DarkGray
                };
                unit += 1;
                Line::from(Span::styled(line, Style::default().fg(color)))
            } else {
                Line::from(line)
            }
        })
        .collect()
}

fn preview_line(line: PreviewLine) -> Line<'static> {
    match line {
        PreviewLine::Header(s) => Line::from(Span::styled(
            s,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        PreviewLine::Muted(s) => Line::from(Span::styled(s, Style::default().fg(Color::DarkGray))),
        PreviewLine::Placeholder(s) => Line::from(Span::styled(
            s,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
        PreviewLine::Body(s) => Line::from(s),
        PreviewLine::Separator => Line::from(Span::styled(
            PreviewLine::Separator.text().to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        PreviewLine::Blank => Line::from(""),
    }
}

fn draw_history(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let history = &state.session.history;
    let max_items = (rows[0].height as usize).saturating_sub(3);
    let total = history.len();
    let current = if total > 0 {
        state.session.history_selected + 1
    } else {
        0
    };

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::raw(format!("History ({current}/{total}) - ")),
        Span::styled("↑/↓/j/k", key_style()),
        Span::raw(": navigate, "),
        Span::styled("Enter", key_style()),
        Span::raw(": reopen, "),
        Span::styled("r", key_style()),
        Span::raw(": refresh, "),
        Span::styled("d", key_style()),
        Span::raw(": delete, "),
        Span::styled("e", key_style()),
        Span::raw(": export JSON"),
    ])];

    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "No history yet. Generated content is saved here.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let prompt_width = (rows[0].width as usize).saturating_sub(52).max(10);
    for (i, r) in history
        .iter()
        .enumerate()
        .skip(state.history_scroll_offset)
        .take(max_items)
    {
        let selected = i == state.session.history_selected;
        let marker = if selected { "> " } else { "  " };
        let text = format!(
            "{marker}{}  {:<18} {}",
            r.created_at_display(),
            r.format.label(),
            truncate(&r.prompt, prompt_width)
        );
        let style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("History"));
    f.render_widget(list, rows[0]);

    let detail: Vec<Line> = match state.selected_history() {
        Some(r) => {
            let mut d = vec![
                Line::from(vec![
                    Span::styled("Prompt: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(r.prompt.clone()),
                ]),
                Line::from(""),
            ];
            d.extend(r.content.lines().map(|l| Line::from(l.to_string())));
            d
        }
        None => Vec::new(),
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Selected"));
    f.render_widget(detail, rows[1]);
}

fn draw_docs(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let page_tab = |label: &'static str, page: SitePage| {
        if state.site_page == page {
            Span::styled(label, Style::default().fg(Color::Yellow))
        } else {
            Span::raw(label)
        }
    };
    let mut lines = vec![
        Line::from(vec![
            page_tab("[0] Home", SitePage::Home),
            Span::raw("  "),
            page_tab("[1] Docs", SitePage::Docs),
            Span::raw("  "),
            page_tab("[2] Pricing", SitePage::Pricing),
            Span::raw("  "),
            page_tab("[3] FAQ", SitePage::Faq),
        ]),
        Line::from(""),
    ];

    let body = match state.site_page {
        SitePage::Docs => {
            let mut search = vec![Span::raw("Search: "), Span::raw(state.docs_query.clone())];
            if state.mode == InputMode::DocsSearch {
                search.push(Span::styled("█", Style::default().fg(Color::Yellow)));
            } else if state.docs_query.is_empty() {
                search.push(Span::styled("press / to search", Style::default().fg(Color::DarkGray)));
            }
            lines.push(Line::from(search));
            lines.push(Line::from(""));
            crate::site::docs_lines(&state.docs_query)
        }
        SitePage::Home => crate::site::home_lines(),
        SitePage::Pricing => crate::site::pricing_lines(),
        SitePage::Faq => crate::site::faq_lines(),
    };
    lines.extend(body.into_iter().map(Line::from));

    lines.push(Line::from(""));
    for (group, links) in crate::site::FOOTER_LINKS {
        lines.push(Line::from(Span::styled(
            format!("{group}: {}", links.join(" · ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Docs"));
    f.render_widget(p, area);
}
