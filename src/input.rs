//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `draw_status_bar` in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::F(5) | KeyCode::Char('R') => app.refresh(),
        KeyCode::Enter | KeyCode::Char('r') => {
            app.retry_selected();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headlines::HeadlinesController;
    use crate::test_support::LoaderSpy;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::sync::Arc;

    fn make_app() -> (App, Arc<LoaderSpy>) {
        let loader = Arc::new(LoaderSpy::default());
        let app = App::new(HeadlinesController::new(loader.clone(), loader.clone()), 0);
        (app, loader)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_and_esc_quit() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let (mut app, _loader) = make_app();
            handle_key_event(&mut app, press(code));
            assert!(app.quit);
        }
    }

    #[test]
    fn refresh_keys_issue_one_load_each() {
        let (mut app, loader) = make_app();
        handle_key_event(&mut app, press(KeyCode::Char('R')));
        handle_key_event(&mut app, press(KeyCode::F(5)));
        assert_eq!(loader.load_call_count(), 2);
    }

    #[test]
    fn key_release_is_ignored() {
        let (mut app, _loader) = make_app();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }
}
