use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::flow::{CreateStage, FlowMode};

use super::App;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    match app.flow.mode() {
        FlowMode::Create(CreateStage::Form) | FlowMode::Intro { .. } => handle_form_key(app, key),
        FlowMode::Create(CreateStage::Generated { .. }) => match key.code {
            KeyCode::Char('c') => app.copy_link(),
            KeyCode::Char('n') => app.create_another(),
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            _ => {}
        },
        FlowMode::Proposal(_) => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                app.toggle_choice()
            }
            KeyCode::Enter | KeyCode::Char(' ') => app.activate_choice(),
            KeyCode::Char('y') => app.accept(),
            KeyCode::Char('n') => app.decline(),
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            _ => {}
        },
        FlowMode::Accepted(_) => match key.code {
            KeyCode::Char('s') | KeyCode::Enter => app.open_share(),
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            _ => {}
        },
        FlowMode::Loading => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                app.quit = true;
            }
        }
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    let creating = matches!(app.flow.mode(), FlowMode::Create(_));

    match key.code {
        KeyCode::Esc => {
            let cleared = match app.focused_input() {
                Some(input) if !input.buf.is_empty() => {
                    input.clear();
                    true
                }
                _ => false,
            };
            if !cleared {
                app.quit = true;
            }
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down if creating => {
            app.toggle_focus();
        }
        KeyCode::Enter => {
            if creating {
                app.submit_creator_form();
            } else {
                app.submit_recipient();
            }
        }
        code => {
            let Some(input) = app.focused_input() else {
                return;
            };
            match code {
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.move_home(),
                KeyCode::End => input.move_end(),
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.clear()
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.insert_char(c)
                }
                _ => {}
            }
        }
    }
}
