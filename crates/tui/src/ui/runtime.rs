//! Runtime: terminal lifecycle and the event loop of the authoring TUI.
//!
//! A dedicated input thread blocks on `crossterm::event::read()` and forwards events over
//! a channel. The loop multiplexes those events with messages produced by background
//! tasks (address lookups) and executes the `Effect`s components return.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use formwright_engine::{AddressLookup, AuthoringSession, resolve_address};
use ratatui::{Terminal, prelude::*};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::{App, Effect, Msg};
use crate::ui::components::component::Component;
use crate::ui::main_view::MainView;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    std::thread::spawn(move || {
        loop {
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!("Failed to read event: {}", error);
                        break;
                    }
                },
                Ok(false) if sender.is_closed() => break,
                Ok(false) => {}
                Err(error) => {
                    warn!("Failed to poll events: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

/// Executes effects. Returns `true` when the loop should stop.
fn process_effects(app: &mut App, effects: Vec<Effect>, address_lookup: &Arc<dyn AddressLookup>, messages: &mpsc::Sender<Msg>) -> bool {
    for effect in effects {
        match effect {
            Effect::Quit => return true,
            Effect::Export => app.export(),
            Effect::LookupAddress { field_id, query } => {
                debug!(field_id = %field_id, "starting address lookup");
                let lookup = Arc::clone(address_lookup);
                let sender = messages.clone();
                tokio::spawn(async move {
                    let outcome = resolve_address(lookup.as_ref(), &query).await.map_err(|error| error.to_string());
                    if sender.send(Msg::AddressResolved { field_id, outcome }).await.is_err() {
                        debug!("address lookup finished after the UI closed");
                    }
                });
            }
        }
    }
    false
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event loop, and
/// restores the terminal on exit, including when the loop fails.
pub async fn run_app(session: AuthoringSession, export_path: PathBuf, address_lookup: Arc<dyn AddressLookup>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let (message_sender, mut message_receiver) = mpsc::channel::<Msg>(32);
    let mut main_view = MainView::default();
    let mut app = App::new(session, export_path);
    let mut terminal = setup_terminal()?;
    info!(path = %app.export_path.display(), "authoring session started");

    let outcome = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, &mut message_receiver, &message_sender, &address_lookup).await;
    cleanup_terminal(&mut terminal)?;
    info!(unsaved = app.session.is_dirty(), "authoring session ended");
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
    message_receiver: &mut mpsc::Receiver<Msg>,
    message_sender: &mpsc::Sender<Msg>,
    address_lookup: &Arc<dyn AddressLookup>,
) -> Result<()> {
    render(terminal, app, main_view)?;
    loop {
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                match event {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        let effects = main_view.handle_key_events(app, key_event);
                        if process_effects(app, effects, address_lookup, message_sender) {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            Some(msg) = message_receiver.recv() => {
                app.update(msg);
            }
        }
        render(terminal, app, main_view)?;
    }
    Ok(())
}
