//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  The list and the detail
//! pane have separate keymaps; `q` quits from either.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in the keymap for the right view.
//! 3. Update the help text in `ui::draw_status_bar`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, View};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('q') {
        app.quit = true;
        return;
    }

    match app.view {
        View::List => match key.code {
            KeyCode::Esc => app.quit = true,
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Home | KeyCode::Char('g') => app.select_first(),
            KeyCode::End | KeyCode::Char('G') => app.select_last(),
            KeyCode::Enter => app.open_selected(),
            KeyCode::Char('n') | KeyCode::Char('r') => app.load_more(),
            _ => {}
        },
        View::Detail(_) => match key.code {
            KeyCode::Esc | KeyCode::Backspace => app.close_detail(),
            KeyCode::Down | KeyCode::Char('j') => app.scroll_detail_down(),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_detail_up(),
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::make_app;
    use crate::fetch::FetchRequest;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_from_any_view() {
        let (mut app, _rx) = make_app(3, 1);
        app.select_first();
        app.open_selected();

        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }

    #[test]
    fn esc_backs_out_of_detail_before_quitting() {
        let (mut app, _rx) = make_app(3, 1);
        app.select_first();
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(matches!(app.view, View::Detail(_)));

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.view, View::List);
        assert!(!app.quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[test]
    fn arrows_move_selection_in_list() {
        let (mut app, _rx) = make_app(3, 1);
        handle_key_event(&mut app, press(KeyCode::Down));
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.list_state.selected(), Some(1));

        handle_key_event(&mut app, press(KeyCode::Up));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn arrows_scroll_detail() {
        let (mut app, _rx) = make_app(3, 1);
        app.select_first();
        app.open_selected();

        handle_key_event(&mut app, press(KeyCode::Down));
        assert_eq!(app.detail_scroll, 1);
        assert_eq!(app.list_state.selected(), Some(0), "list untouched");
    }

    #[test]
    fn n_requests_next_page() {
        let (mut app, rx) = make_app(10, 2);
        handle_key_event(&mut app, press(KeyCode::Char('n')));
        assert_eq!(rx.try_recv().unwrap(), FetchRequest::Page(2));
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut app, _rx) = make_app(3, 1);
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;

        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }
}
