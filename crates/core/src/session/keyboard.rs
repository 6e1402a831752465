//! Headless keyboard routing for the session view.
//!
//! Translates key events into session intents. The router is inert while
//! a text input has focus, so typing never triggers shortcuts.

use crate::session::overlay::Overlay;

/// The keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    #[must_use]
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusContext {
    /// A text input, textarea, or select is focused; shortcuts are off.
    TextField,
    /// Anything else.
    General,
}

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionIntent {
    PreviousCard,
    NextCard,
    ToggleAnswer,
    BackToBrowsing,
    OpenAddCard,
    ToggleHelp,
    CloseOverlay,
    FocusNext,
    FocusPrevious,
}

/// Pure routing from a key event to an intent.
///
/// `overlay` is the currently open overlay and `studying` whether the
/// cursor is mid-session; both change which bindings are live.
#[must_use]
pub fn route_key(
    event: KeyEvent,
    focus: FocusContext,
    overlay: Option<Overlay>,
    studying: bool,
) -> Option<SessionIntent> {
    if focus == FocusContext::TextField {
        return None;
    }

    if event.key == Key::Char('?') {
        return Some(SessionIntent::ToggleHelp);
    }

    // Escape closes the open overlay; the key is consumed on first match
    // and does nothing when nothing is open.
    if event.key == Key::Escape {
        return overlay.map(|_| SessionIntent::CloseOverlay);
    }

    // Dialogs trap Tab into their own focus cycle.
    if event.key == Key::Tab {
        if overlay.is_some_and(|open| open.traps_focus()) {
            return Some(if event.shift {
                SessionIntent::FocusPrevious
            } else {
                SessionIntent::FocusNext
            });
        }
        return None;
    }

    // Study bindings are live only mid-session and under no overlay.
    if !studying || overlay.is_some() {
        return None;
    }

    match event.key {
        Key::ArrowLeft => Some(SessionIntent::PreviousCard),
        Key::ArrowRight => Some(SessionIntent::NextCard),
        Key::Char(c) if c.eq_ignore_ascii_case(&'s') => Some(SessionIntent::ToggleAnswer),
        Key::Char(c) if c.eq_ignore_ascii_case(&'b') => Some(SessionIntent::BackToBrowsing),
        Key::Char(c) if c.eq_ignore_ascii_case(&'a') => Some(SessionIntent::OpenAddCard),
        _ => None,
    }
}

/// A shortcut line for the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub keys: &'static str,
    pub action: &'static str,
}

/// The shortcut table shown by the help overlay.
pub const SHORTCUTS: [Shortcut; 7] = [
    Shortcut { keys: "Tab", action: "Navigate between elements" },
    Shortcut { keys: "Enter/Space", action: "Activate buttons or toggle flashcards" },
    Shortcut { keys: "Escape", action: "Close dropdowns or modals" },
    Shortcut { keys: "\u{2190}/\u{2192}", action: "Navigate between flashcards" },
    Shortcut { keys: "S", action: "Show/hide answer" },
    Shortcut { keys: "B", action: "Go back to main menu" },
    Shortcut { keys: "A", action: "Add new flashcard" },
];
