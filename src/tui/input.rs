//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state. Which keys do
//! what depends on the active screen and, on the schedule screen, on the
//! traversal engine's state.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::AppMode;
use crate::core::{TaskAction, TraversalState};
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Windows delivers both press and release events.
    if key.kind == KeyEventKind::Release {
        return;
    }

    match app.mode {
        AppMode::Login => handle_login(key, app),
        AppMode::Schedule => match app.traversal.state() {
            TraversalState::Collecting => handle_schedule_form(key, app),
            TraversalState::InProgress => handle_in_progress(key, app),
            TraversalState::AwaitingExtendAmount => handle_extend_prompt(key, app),
            TraversalState::Completed => handle_completed(key, app),
        },
    }
}

/// Login screen: two text fields, signup toggle, submit.
fn handle_login(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.toggle_focus();
        }
        KeyCode::Enter => app.submit_login(),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.signup = !app.login.signup;
            app.login.error = None;
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.focused_mut().clear();
        }
        KeyCode::Backspace => {
            app.login.focused_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.focused_mut().push(c);
        }
        _ => {}
    }
}

/// Schedule input form: task text, minutes budget, generate.
fn handle_schedule_form(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.schedule_form.toggle_focus();
        }
        KeyCode::Enter => app.generate_schedule(),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.logout();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.schedule_form.focused_mut().clear();
        }
        KeyCode::Backspace => {
            app.schedule_form.focused_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.schedule_form.focused_mut().push(c);
        }
        _ => {}
    }
}

/// Walking the schedule: one action key per step.
fn handle_in_progress(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.is_empty() => {
            app.apply_action(TaskAction::Complete);
        }
        KeyCode::Char('s') if key.modifiers.is_empty() => {
            app.apply_action(TaskAction::Skip);
        }
        KeyCode::Char('d') if key.modifiers.is_empty() => {
            app.apply_action(TaskAction::Defer);
        }
        KeyCode::Char('e') if key.modifiers.is_empty() => app.begin_extend(),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.logout();
        }
        _ => {}
    }
}

/// Extend prompt: free text entry, validated on submit so bad input
/// re-prompts instead of being silently unencodable.
fn handle_extend_prompt(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.cancel_extend(),
        KeyCode::Enter => app.submit_extend(),
        KeyCode::Backspace => {
            app.extend_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.extend_input.push(c);
        }
        _ => {}
    }
}

/// All tasks consumed: start over or leave.
fn handle_completed(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('n') | KeyCode::Enter => app.new_schedule(),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}
