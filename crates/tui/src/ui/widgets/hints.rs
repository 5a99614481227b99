use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Pane, StatusLevel};

/// Key hints for the focused pane.
pub fn hints_for(pane: Pane) -> &'static [(&'static str, &'static str)] {
    match pane {
        Pane::Palette => &[("\u{2191}/\u{2193}", "kind"), ("Enter", "add"), ("Tab", "pane"), ("^S", "save"), ("q", "quit")],
        Pane::Canvas => &[
            ("\u{2191}/\u{2193}", "select"),
            ("J/K", "move"),
            ("d", "remove"),
            ("p", "properties"),
            ("Space", "click"),
            ("Esc", "deselect"),
            ("q", "quit"),
        ],
        Pane::Properties => &[
            ("\u{2191}/\u{2193}", "property"),
            ("type", "edit"),
            ("Space", "toggle"),
            ("\u{2190}/\u{2192}", "option"),
            ("^A/^D", "add/remove option"),
            ("Tab", "pane"),
        ],
        Pane::Preview => &[
            ("\u{2191}/\u{2193}", "field"),
            ("\u{2190}/\u{2192}", "item"),
            ("Space", "toggle"),
            ("Enter", "press/lookup/attach"),
            ("^A/^D", "add/remove"),
            ("Esc", "reset"),
        ],
    }
}

/// Draws the status line, or the key hints of the focused pane when there is no status.
pub fn draw_hints(frame: &mut Frame, rect: Rect, app: &App) {
    let theme = app.theme.as_ref();
    let line = match &app.status {
        Some(status) => {
            let style = match status.level {
                StatusLevel::Info => theme.status_info(),
                StatusLevel::Success => theme.status_success(),
                StatusLevel::Warning => theme.status_warning(),
                StatusLevel::Error => theme.status_error(),
            };
            Line::from(Span::styled(status.message.clone(), style))
        }
        None => {
            let mut spans = Vec::new();
            for (key, action) in hints_for(app.focus) {
                spans.push(Span::styled(format!(" {key} "), theme.accent_emphasis_style()));
                spans.push(Span::styled(format!("{action}  "), theme.text_muted_style()));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), rect);
}
