use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    #[error("cannot start studying an empty card set")]
    EmptySet,
}

/// Position and reveal state within the filtered card set.
///
/// The cursor does not own the cards; callers pass the current filtered
/// length so the machine stays a pure function of its inputs. The caller
/// must discard the cursor (via [`SessionCursor::back`] or a fresh value)
/// whenever the selected subject or difficulty changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionCursor {
    /// Subject summary view; no card is on screen.
    #[default]
    Browsing,
    /// Mid-session: invariant `index < len` of the filtered set.
    Studying { index: usize, revealed: bool },
}

impl SessionCursor {
    /// Enters the studying state at the first card, answer hidden.
    ///
    /// # Errors
    ///
    /// Returns `CursorError::EmptySet` when the filtered set is empty;
    /// callers render an empty-state view instead of a session.
    pub fn start(&mut self, count: usize) -> Result<(), CursorError> {
        if count == 0 {
            return Err(CursorError::EmptySet);
        }
        *self = SessionCursor::Studying {
            index: 0,
            revealed: false,
        };
        Ok(())
    }

    /// Returns to the browsing view, discarding position and reveal state.
    pub fn back(&mut self) {
        *self = SessionCursor::Browsing;
    }

    /// Advances to the next card, wrapping past the end. Hides the answer.
    pub fn next(&mut self, count: usize) {
        if let SessionCursor::Studying { index, .. } = self {
            if count == 0 {
                return;
            }
            let next = if *index + 1 >= count { 0 } else { *index + 1 };
            *self = SessionCursor::Studying {
                index: next,
                revealed: false,
            };
        }
    }

    /// Moves to the previous card, wrapping before the start. Hides the answer.
    pub fn previous(&mut self, count: usize) {
        if let SessionCursor::Studying { index, .. } = self {
            if count == 0 {
                return;
            }
            let prev = if *index == 0 { count - 1 } else { *index - 1 };
            *self = SessionCursor::Studying {
                index: prev,
                revealed: false,
            };
        }
    }

    /// Flips the answer reveal; no-op while browsing.
    pub fn toggle_answer(&mut self) {
        if let SessionCursor::Studying { revealed, .. } = self {
            *revealed = !*revealed;
        }
    }

    /// Re-establishes the index invariant after a card was removed.
    ///
    /// Clamps an out-of-range index to the new last card, or returns to
    /// browsing when the filtered set became empty.
    pub fn card_removed(&mut self, new_count: usize) {
        if let SessionCursor::Studying { index, .. } = self {
            if new_count == 0 {
                *self = SessionCursor::Browsing;
            } else if *index >= new_count {
                *self = SessionCursor::Studying {
                    index: new_count - 1,
                    revealed: false,
                };
            }
        }
    }

    #[must_use]
    pub fn is_studying(&self) -> bool {
        matches!(self, SessionCursor::Studying { .. })
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            SessionCursor::Browsing => None,
            SessionCursor::Studying { index, .. } => Some(*index),
        }
    }

    #[must_use]
    pub fn answer_revealed(&self) -> bool {
        matches!(
            self,
            SessionCursor::Studying { revealed: true, .. }
        )
    }

    /// Progress through the set as a percentage.
    ///
    /// Not computed for sets of one card or fewer; `0.0` at the first
    /// card, `index / (count - 1) * 100` otherwise.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, count: usize) -> Option<f64> {
        let SessionCursor::Studying { index, .. } = self else {
            return None;
        };
        if count <= 1 {
            return None;
        }
        if *index == 0 {
            return Some(0.0);
        }
        Some(*index as f64 / (count - 1) as f64 * 100.0)
    }

    /// One-based "i / n" label for display.
    #[must_use]
    pub fn position_label(&self, count: usize) -> Option<String> {
        self.index().map(|index| format!("{} / {count}", index + 1))
    }
}
