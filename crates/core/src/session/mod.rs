mod cursor;
mod filter;
mod keyboard;
mod overlay;

pub use cursor::{CursorError, SessionCursor};
pub use filter::filter_cards;
pub use keyboard::{FocusContext, Key, KeyEvent, SHORTCUTS, SessionIntent, Shortcut, route_key};
pub use overlay::{Control, FocusTrap, Overlay, OverlayFsm};
