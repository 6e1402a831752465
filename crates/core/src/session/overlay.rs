//! Overlay and focus state for the session view.
//!
//! At most one overlay is open at a time: the open overlay is a single
//! tagged value and escape handling is a pure transition over it,
//! instead of a pile of independent show/hide flags.

/// Everything that can sit on top of the session view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    AddCard,
    EditCard,
    Subject,
    DeleteCard,
    DeleteSubject,
    OptionsMenu,
    SubjectMenu,
}

impl Overlay {
    /// Escape closes overlays in this fixed order; lower rank wins when a
    /// replacement decision has to be made.
    pub const ESCAPE_PRIORITY: [Overlay; 8] = [
        Overlay::Help,
        Overlay::AddCard,
        Overlay::EditCard,
        Overlay::Subject,
        Overlay::DeleteCard,
        Overlay::DeleteSubject,
        Overlay::OptionsMenu,
        Overlay::SubjectMenu,
    ];

    #[must_use]
    pub fn escape_rank(&self) -> usize {
        Self::ESCAPE_PRIORITY
            .iter()
            .position(|overlay| overlay == self)
            .unwrap_or(Self::ESCAPE_PRIORITY.len())
    }

    /// Dialogs trap Tab focus; dropdown menus do not.
    #[must_use]
    pub fn traps_focus(&self) -> bool {
        !matches!(self, Overlay::OptionsMenu | Overlay::SubjectMenu)
    }
}

/// The control that opened an overlay; focus returns to it on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    SubjectsButton,
    OptionsButton,
    StartStudyingButton,
    BackButton,
    PrevButton,
    NextButton,
    AddCardButton,
    Flashcard,
    HelpButton,
}

/// Tab cycle over an overlay's focusable controls.
///
/// Opening focuses the first control; Tab on the last wraps to the
/// first, Shift+Tab on the first wraps to the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    len: usize,
    current: usize,
}

impl FocusTrap {
    /// Builds a trap over `len` controls, focused on the first.
    /// Returns `None` when the overlay has nothing focusable.
    #[must_use]
    pub fn new(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self { len, current: 0 })
    }

    #[must_use]
    pub fn focused(&self) -> usize {
        self.current
    }

    pub fn tab(&mut self) {
        self.current = if self.current + 1 >= self.len {
            0
        } else {
            self.current + 1
        };
    }

    pub fn shift_tab(&mut self) {
        self.current = if self.current == 0 {
            self.len - 1
        } else {
            self.current - 1
        };
    }
}

/// Owns the (at most one) open overlay and its focus bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayFsm {
    current: Option<(Overlay, Control)>,
    trap: Option<FocusTrap>,
}

impl OverlayFsm {
    /// Opens an overlay, replacing whatever was open, and remembers the
    /// opener so focus can return to it.
    pub fn open(&mut self, overlay: Overlay, opener: Control, focusable: usize) {
        self.current = Some((overlay, opener));
        self.trap = if overlay.traps_focus() {
            FocusTrap::new(focusable)
        } else {
            None
        };
    }

    /// Closes the open overlay and yields the control focus returns to.
    pub fn close(&mut self) -> Option<Control> {
        let (_, opener) = self.current.take()?;
        self.trap = None;
        Some(opener)
    }

    /// Escape handling: a pure transition from the open overlay to none.
    /// Returns the consumed overlay and the focus-return control, or
    /// `None` when nothing was open (the key is not consumed).
    pub fn escape(&mut self) -> Option<(Overlay, Control)> {
        let open = self.current.take()?;
        self.trap = None;
        Some(open)
    }

    #[must_use]
    pub fn current(&self) -> Option<Overlay> {
        self.current.map(|(overlay, _)| overlay)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn focused(&self) -> Option<usize> {
        self.trap.map(|trap| trap.focused())
    }

    pub fn focus_next(&mut self) {
        if let Some(trap) = &mut self.trap {
            trap.tab();
        }
    }

    pub fn focus_previous(&mut self) {
        if let Some(trap) = &mut self.trap {
            trap.shift_tab();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_priority_starts_with_help_and_ends_with_subject_menu() {
        assert_eq!(Overlay::Help.escape_rank(), 0);
        assert!(Overlay::Help.escape_rank() < Overlay::AddCard.escape_rank());
        assert!(Overlay::AddCard.escape_rank() < Overlay::EditCard.escape_rank());
        assert!(Overlay::DeleteSubject.escape_rank() < Overlay::OptionsMenu.escape_rank());
        assert!(Overlay::OptionsMenu.escape_rank() < Overlay::SubjectMenu.escape_rank());
    }

    #[test]
    fn menus_do_not_trap_focus() {
        assert!(Overlay::AddCard.traps_focus());
        assert!(Overlay::Help.traps_focus());
        assert!(!Overlay::OptionsMenu.traps_focus());
        assert!(!Overlay::SubjectMenu.traps_focus());
    }

    #[test]
    fn opening_focuses_the_first_control() {
        let mut fsm = OverlayFsm::default();
        fsm.open(Overlay::AddCard, Control::AddCardButton, 5);
        assert_eq!(fsm.focused(), Some(0));
    }

    #[test]
    fn tab_wraps_from_last_to_first() {
        let mut trap = FocusTrap::new(3).unwrap();
        trap.tab();
        trap.tab();
        assert_eq!(trap.focused(), 2);
        trap.tab();
        assert_eq!(trap.focused(), 0);
    }

    #[test]
    fn shift_tab_wraps_from_first_to_last() {
        let mut trap = FocusTrap::new(3).unwrap();
        trap.shift_tab();
        assert_eq!(trap.focused(), 2);
    }

    #[test]
    fn close_returns_focus_to_the_opener() {
        let mut fsm = OverlayFsm::default();
        fsm.open(Overlay::Subject, Control::SubjectsButton, 4);
        assert_eq!(fsm.close(), Some(Control::SubjectsButton));
        assert!(!fsm.is_open());
    }

    #[test]
    fn escape_consumes_only_when_something_is_open() {
        let mut fsm = OverlayFsm::default();
        assert_eq!(fsm.escape(), None);

        fsm.open(Overlay::Help, Control::HelpButton, 1);
        assert_eq!(fsm.escape(), Some((Overlay::Help, Control::HelpButton)));
        assert_eq!(fsm.escape(), None);
    }

    #[test]
    fn opening_replaces_the_current_overlay() {
        let mut fsm = OverlayFsm::default();
        fsm.open(Overlay::OptionsMenu, Control::OptionsButton, 0);
        fsm.open(Overlay::Help, Control::HelpButton, 2);
        assert_eq!(fsm.current(), Some(Overlay::Help));
    }
}
