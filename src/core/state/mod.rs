//=========================================================================
// State System
//=========================================================================
//
// Mutually exclusive application states with a shared lifecycle.
//
// Architecture:
//   StateMachine
//     ├─ nodes: HashMap<S, Box<dyn StateNode<S>>>
//     └─ active: Option<S>
//
// Flow (per frame):
//   advance_frame() → Transition<S> → on_exit(old) → on_enter(new)
//   render()        → render_prep() → render() → handle_ui()
//
//=========================================================================

//=== Module Declarations =================================================

mod machine;
mod transition;

//=== Public API ==========================================================

pub use machine::StateMachine;
pub use transition::{Priority, Transition};

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// Typically implemented by an application-specific enum.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== State Node Trait ====================================================

/// One application mode with its own lifecycle and local automata.
///
/// Nodes are constructed once at startup, initialized once, and then
/// entered and exited any number of times. Inactive nodes keep their
/// private state frozen until they are entered again.
///
/// Only `advance_frame()` is required:
///
/// ```rust
/// # use std::time::Duration;
/// # use aetheric_runtime::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Mode { Title, Play }
/// # impl StateKey for Mode {}
/// struct Title;
///
/// impl StateNode<Mode> for Title {
///     fn advance_frame(
///         &mut self,
///         _tick: Duration,
///         context: &mut AppContext,
///         transition: &mut Transition<Mode>,
///     ) {
///         if context.input.went_down(Control::Confirm) {
///             transition.request(Mode::Play, Priority::Interaction);
///         }
///     }
/// }
/// ```
pub trait StateNode<S: StateKey> {
    /// Called once after construction, before the first `on_enter`.
    ///
    /// Resolve audio handles and entity references here.
    fn initialize(&mut self, _context: &mut AppContext) {}

    /// Called every time the node becomes active. `previous` is `None`
    /// for the application's initial state.
    fn on_enter(&mut self, _previous: Option<S>, _context: &mut AppContext) {}

    /// Called every time the node stops being active, before the next
    /// node's `on_enter`.
    fn on_exit(&mut self, _next: S, _context: &mut AppContext) {}

    /// Per-frame logic. Writes a request into `transition` to leave.
    fn advance_frame(&mut self, tick: Duration, context: &mut AppContext, transition: &mut Transition<S>);

    fn render_prep(&mut self, _context: &mut AppContext) {}

    fn render(&mut self, _context: &mut AppContext) {}

    /// Immediate-mode UI pass, after rendering.
    fn handle_ui(&mut self, _context: &mut AppContext) {}
}
