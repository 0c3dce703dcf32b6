use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.view.selected.is_some() {
        // Schedule screen
        match key.code {
            Char('q') | Esc => return Action::Quit,
            Char('c') => app.controller.change_address(),
            Char('r') => {
                // Re-fetch the schedule for the current selection.
                if let Some(address) = app.view.selected.clone() {
                    app.controller.on_address_picked(address);
                }
            }
            _ => {}
        }
        return Action::None;
    }

    // Postcode entry / candidate list. Letters feed the input, so plain
    // 'q' is not a quit key here.
    match key.code {
        Esc => return Action::Quit,
        Up => app.select_previous(),
        Down => app.select_next(),
        Enter => app.pick_current(),
        Backspace => app.pop_input(),
        Char(character) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT)
            {
                app.push_input(character);
            }
        }
        _ => {}
    }

    Action::None
}
