//=========================================================================
// State Machine
//=========================================================================
//
// Owns every state node and dispatches the per-frame lifecycle to the
// single active one.
//
// Nodes are stored in a HashMap by key so each keeps its private state
// between activations. Registration order is remembered so that
// `initialize_all` runs deterministically.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{StateKey, StateNode, Transition};
use crate::core::context::AppContext;

//=== StateMachine ========================================================

pub struct StateMachine<S: StateKey> {
    nodes: HashMap<S, Box<dyn StateNode<S>>>,
    order: Vec<S>,
    active: Option<S>,
    previous: Option<S>,
}

impl<S: StateKey> StateMachine<S> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty machine. Nothing is active until `start()`.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
            active: None,
            previous: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a node under `key`. The node is boxed for storage.
    pub fn register<T>(&mut self, key: S, node: T)
    where
        T: StateNode<S> + 'static,
    {
        self.register_boxed(key, Box::new(node));
    }

    pub fn register_boxed(&mut self, key: S, node: Box<dyn StateNode<S>>) {
        if self.nodes.insert(key, node).is_some() {
            warn!("State {:?} was already registered and has been replaced", key);
        } else {
            self.order.push(key);
        }
    }

    pub fn contains(&self, key: S) -> bool {
        self.nodes.contains_key(&key)
    }

    //--- Startup ----------------------------------------------------------

    /// Calls `initialize` once on every node, in registration order.
    pub fn initialize_all(&mut self, context: &mut AppContext) {
        for key in &self.order {
            if let Some(node) = self.nodes.get_mut(key) {
                debug!("Initializing state {:?}", key);
                node.initialize(context);
            }
        }
    }

    /// Activates `initial` and calls its `on_enter(None)`.
    ///
    /// Returns `false` if `initial` is not registered.
    pub fn start(&mut self, initial: S, context: &mut AppContext) -> bool {
        let Some(node) = self.nodes.get_mut(&initial) else {
            warn!("Initial state {:?} not registered", initial);
            return false;
        };

        info!("Starting state machine in {:?}", initial);
        self.active = Some(initial);
        node.on_enter(None, context);
        true
    }

    //--- Queries ----------------------------------------------------------

    pub fn active(&self) -> Option<S> {
        self.active
    }

    /// State that was active before the most recent transition.
    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances the active node and applies its transition request.
    ///
    /// Returns the `(from, to)` pair if a transition took place.
    pub fn advance_frame(&mut self, tick: Duration, context: &mut AppContext) -> Option<(S, S)> {
        let current = self.active?;
        let node = self.nodes.get_mut(&current)?;

        let mut transition = Transition::default();
        node.advance_frame(tick, context, &mut transition);

        let target = transition.target()?;
        self.switch(current, target, context)
    }

    /// Runs the render pass on the active node.
    pub fn render(&mut self, context: &mut AppContext) {
        let Some(node) = self.active.and_then(|key| self.nodes.get_mut(&key)) else {
            return;
        };
        node.render_prep(context);
        node.render(context);
        node.handle_ui(context);
    }

    //--- Internal Helpers -------------------------------------------------

    fn switch(&mut self, from: S, to: S, context: &mut AppContext) -> Option<(S, S)> {
        if from == to {
            debug!("State {:?} requested itself, ignoring", from);
            return None;
        }
        if !self.nodes.contains_key(&to) {
            warn!("Attempted to enter unregistered state {:?}", to);
            return None;
        }

        info!("State transition {:?} -> {:?}", from, to);

        if let Some(node) = self.nodes.get_mut(&from) {
            node.on_exit(to, context);
        }

        self.previous = Some(from);
        self.active = Some(to);

        if let Some(node) = self.nodes.get_mut(&to) {
            node.on_enter(Some(from), context);
        }

        Some((from, to))
    }
}

impl<S: StateKey> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Priority;
    use crate::core::testing::test_context;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestState {
        A,
        B,
        Missing,
    }

    impl StateKey for TestState {}

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Node that journals every lifecycle call and requests `next` when
    /// told to.
    struct Probe {
        name: &'static str,
        journal: Journal,
        next: Rc<RefCell<Option<TestState>>>,
    }

    impl Probe {
        fn new(name: &'static str, journal: &Journal) -> (Self, Rc<RefCell<Option<TestState>>>) {
            let next = Rc::new(RefCell::new(None));
            let probe = Self {
                name,
                journal: journal.clone(),
                next: next.clone(),
            };
            (probe, next)
        }

        fn note(&self, event: impl Into<String>) {
            self.journal
                .borrow_mut()
                .push(format!("{}:{}", self.name, event.into()));
        }
    }

    impl StateNode<TestState> for Probe {
        fn initialize(&mut self, _context: &mut AppContext) {
            self.note("init");
        }

        fn on_enter(&mut self, previous: Option<TestState>, _context: &mut AppContext) {
            self.note(format!("enter({:?})", previous));
        }

        fn on_exit(&mut self, next: TestState, _context: &mut AppContext) {
            self.note(format!("exit({:?})", next));
        }

        fn advance_frame(
            &mut self,
            _tick: Duration,
            _context: &mut AppContext,
            transition: &mut Transition<TestState>,
        ) {
            self.note("advance");
            if let Some(next) = self.next.borrow_mut().take() {
                transition.request(next, Priority::Interaction);
            }
        }

        fn render_prep(&mut self, _context: &mut AppContext) {
            self.note("prep");
        }

        fn render(&mut self, _context: &mut AppContext) {
            self.note("render");
        }

        fn handle_ui(&mut self, _context: &mut AppContext) {
            self.note("ui");
        }
    }

    struct Fixture {
        machine: StateMachine<TestState>,
        journal: Journal,
        a_next: Rc<RefCell<Option<TestState>>>,
        context: AppContext,
    }

    fn fixture() -> Fixture {
        let journal = Journal::default();
        let (a, a_next) = Probe::new("A", &journal);
        let (b, _) = Probe::new("B", &journal);

        let mut machine = StateMachine::new();
        machine.register(TestState::A, a);
        machine.register(TestState::B, b);

        let (context, _fakes) = test_context();
        Fixture {
            machine,
            journal,
            a_next,
            context,
        }
    }

    const TICK: Duration = Duration::from_millis(16);

    //--- Startup ----------------------------------------------------------

    #[test]
    fn initialize_runs_in_registration_order() {
        let mut f = fixture();
        f.machine.initialize_all(&mut f.context);
        assert_eq!(*f.journal.borrow(), vec!["A:init", "B:init"]);
    }

    #[test]
    fn start_enters_initial_with_no_previous() {
        let mut f = fixture();
        assert!(f.machine.start(TestState::A, &mut f.context));
        assert_eq!(f.machine.active(), Some(TestState::A));
        assert_eq!(*f.journal.borrow(), vec!["A:enter(None)"]);
    }

    #[test]
    fn start_rejects_unregistered_state() {
        let mut f = fixture();
        assert!(!f.machine.start(TestState::Missing, &mut f.context));
        assert_eq!(f.machine.active(), None);
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn exit_completes_before_enter() {
        let mut f = fixture();
        f.machine.start(TestState::A, &mut f.context);
        f.journal.borrow_mut().clear();

        *f.a_next.borrow_mut() = Some(TestState::B);
        let switched = f.machine.advance_frame(TICK, &mut f.context);

        assert_eq!(switched, Some((TestState::A, TestState::B)));
        assert_eq!(
            *f.journal.borrow(),
            vec!["A:advance", "A:exit(B)", "B:enter(Some(A))"]
        );
        assert_eq!(f.machine.active(), Some(TestState::B));
        assert_eq!(f.machine.previous(), Some(TestState::A));
    }

    #[test]
    fn render_uses_the_newly_active_node() {
        let mut f = fixture();
        f.machine.start(TestState::A, &mut f.context);
        *f.a_next.borrow_mut() = Some(TestState::B);
        f.machine.advance_frame(TICK, &mut f.context);
        f.journal.borrow_mut().clear();

        f.machine.render(&mut f.context);

        assert_eq!(*f.journal.borrow(), vec!["B:prep", "B:render", "B:ui"]);
    }

    #[test]
    fn stay_keeps_active_node() {
        let mut f = fixture();
        f.machine.start(TestState::A, &mut f.context);

        assert_eq!(f.machine.advance_frame(TICK, &mut f.context), None);
        assert_eq!(f.machine.active(), Some(TestState::A));
    }

    #[test]
    fn self_transition_is_ignored() {
        let mut f = fixture();
        f.machine.start(TestState::A, &mut f.context);
        f.journal.borrow_mut().clear();

        *f.a_next.borrow_mut() = Some(TestState::A);
        assert_eq!(f.machine.advance_frame(TICK, &mut f.context), None);
        assert_eq!(*f.journal.borrow(), vec!["A:advance"]);
    }

    #[test]
    fn unregistered_target_is_ignored() {
        let mut f = fixture();
        f.machine.start(TestState::A, &mut f.context);

        *f.a_next.borrow_mut() = Some(TestState::Missing);
        assert_eq!(f.machine.advance_frame(TICK, &mut f.context), None);
        assert_eq!(f.machine.active(), Some(TestState::A));
    }

    #[test]
    fn nothing_runs_before_start() {
        let mut f = fixture();
        assert_eq!(f.machine.advance_frame(TICK, &mut f.context), None);
        f.machine.render(&mut f.context);
        assert!(f.journal.borrow().is_empty());
    }
}
