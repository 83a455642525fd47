//! One step of experience fed to the update rule

use crate::types::Action;

/// A single (state, action, reward, next state) step.
///
/// `next_state: None` means the episode ended (or the next state is unknown)
/// and is treated like `terminal: true`. `next_actions` narrows the bootstrap
/// to the actions legal in the next state; `None` bootstraps over the whole
/// action space, and an empty list is treated as terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    pub state: S,
    pub action: Action,
    pub reward: f64,
    pub next_state: Option<S>,
    pub terminal: bool,
    pub next_actions: Option<Vec<Action>>,
}

impl<S> Transition<S> {
    pub fn new(state: S, action: impl Into<Action>, reward: f64, next_state: Option<S>) -> Self {
        Self {
            state,
            action: action.into(),
            reward,
            next_state,
            terminal: false,
            next_actions: None,
        }
    }

    /// A transition that ends the episode; its target is the reward alone.
    pub fn terminal(state: S, action: impl Into<Action>, reward: f64) -> Self {
        Self {
            terminal: true,
            ..Self::new(state, action, reward, None)
        }
    }

    /// Restrict the bootstrap to the given next-state actions.
    pub fn with_next_actions(mut self, actions: Vec<Action>) -> Self {
        self.next_actions = Some(actions);
        self
    }
}
