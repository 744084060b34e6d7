//=========================================================================
// Input Buffer
//=========================================================================
//
// Holds translated input between two flushes of the platform.
//
//   discrete : key and button edges, kept in arrival order
//   cursor   : latest cursor position only (motion is coalesced)
//
// The frame loop folds discrete events first, then the cursor, so a
// click and the move that preceded it still resolve to one position.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

#[derive(Debug, Default)]
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    cursor: Option<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(16),
            cursor: None,
        }
    }

    /// Queues an event, replacing any earlier cursor motion.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_continuous() {
            self.cursor = Some(event);
        } else {
            self.discrete.push(event);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.cursor.is_none()
    }

    /// Takes everything buffered as `(discrete, continuous)`, or `None`
    /// when nothing arrived since the last drain.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = std::mem::take(&mut self.discrete);
        let continuous = self.cursor.take().into_iter().collect();
        Some((discrete, continuous))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
