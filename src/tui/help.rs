use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const KEY_WIDTH: usize = 12;

fn keybind(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(KEY_WIDTH.saturating_sub(key.chars().count()))),
        Span::raw(what),
    ])
}

pub fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from("Keybinds:"),
        keybind("Ctrl-C", "Quit"),
        keybind("Esc", "Cancel editing / quit"),
        keybind("Tab", "Switch tabs"),
        keybind("F1", "Show this help"),
        Line::from(""),
        Line::from("Generate tab:"),
        keybind("type", "Edit the prompt"),
        keybind("Enter", "Generate"),
        keybind("F2", "Next platform format"),
        keybind("F3", "Toggle content / preview"),
        keybind("Ctrl-O", "Attach an image (photo captions)"),
        keybind("Ctrl-X", "Remove the attached image"),
        keybind("Ctrl-Y", "Copy the generated content"),
        keybind("F4", "Sign out"),
        Line::from(""),
        Line::from("History tab:"),
        keybind("↑/↓ j/k", "Navigate"),
        keybind("Enter", "Reopen selected"),
        keybind("e", "Export selected as JSON"),
        keybind("y", "Copy exported path to clipboard"),
        keybind("d", "Delete selected"),
        keybind("r", "Refresh history"),
        Line::from(""),
        Line::from("Docs tab:"),
        keybind("/", "Search documentation"),
        keybind("0 1 2 3", "Home / Docs / Pricing / FAQ"),
    ]
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(help_lines())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
