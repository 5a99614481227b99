//! Top-level layout and key routing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{App, Effect, Pane};
use crate::ui::components::component::Component;
use crate::ui::components::{CanvasComponent, HintBarComponent, PaletteComponent, PreviewComponent, PropertiesComponent};
use crate::ui::theme::theme_helpers::app_background_style;

#[derive(Debug, Default)]
pub struct MainView {
    palette: PaletteComponent,
    canvas: CanvasComponent,
    properties: PropertiesComponent,
    preview: PreviewComponent,
    hint_bar: HintBarComponent,
}

impl MainView {
    fn focused_component(&mut self, pane: Pane) -> &mut dyn Component {
        match pane {
            Pane::Palette => &mut self.palette,
            Pane::Canvas => &mut self.canvas,
            Pane::Properties => &mut self.properties,
            Pane::Preview => &mut self.preview,
        }
    }

    fn header(app: &App) -> Line<'static> {
        let theme = app.theme.as_ref();
        let definition = app.session.definition();
        let title = if definition.title.is_empty() { "Untitled form" } else { definition.title.as_str() };
        let mut spans = vec![
            Span::styled(" Formwright ", theme.accent_emphasis_style()),
            Span::styled(format!("\u{00B7} {title} "), theme.text_primary_style()),
            Span::styled(format!("\u{00B7} {} field(s) ", definition.fields.len()), theme.text_muted_style()),
            Span::styled(format!("\u{00B7} {}", app.export_path.display()), theme.text_muted_style()),
        ];
        if app.session.is_dirty() {
            spans.push(Span::styled(" \u{25CF} unsaved", theme.status_warning()));
        }
        Line::from(spans)
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        let quitting = matches!(key.code, KeyCode::Char('q')) && matches!(app.focus, Pane::Palette | Pane::Canvas);
        app.status = None;
        if !quitting {
            app.disarm_quit();
        }

        match key.code {
            KeyCode::Tab => {
                app.cycle_focus(true);
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.cycle_focus(false);
                return Vec::new();
            }
            KeyCode::Char('s') if control => return vec![Effect::Export],
            KeyCode::Char('q') | KeyCode::Char('c') if control => return vec![Effect::Quit],
            _ => {}
        }

        let effects = self.focused_component(app.focus).handle_key_events(app, key);
        app.ensure_focus_visible();
        effects
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        frame.render_widget(Block::default().style(app_background_style(app.theme.as_ref())), rect);
        let [header, body, hints] = Layout::vertical([Constraint::Length(1), Constraint::Min(6), Constraint::Length(1)]).areas(rect);
        frame.render_widget(Paragraph::new(Self::header(app)), header);

        let properties_visible = app.session.properties_visible();
        let mut columns = vec![Constraint::Length(22), Constraint::Min(30)];
        if properties_visible {
            columns.push(Constraint::Percentage(30));
        }
        let areas = Layout::horizontal(columns).split(body);
        self.palette.render(frame, areas[0], app);

        let [canvas, preview] = Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(areas[1]);
        self.canvas.render(frame, canvas, app);
        self.preview.render(frame, preview, app);
        if properties_visible {
            self.properties.render(frame, areas[2], app);
        }

        self.hint_bar.render(frame, hints, app);
    }
}
