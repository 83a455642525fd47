//! Q-learning agent
//!
//! The agent owns one Q-table, the action space it was built for, its
//! hyperparameters and the exploration scheduler. Game drivers talk to it
//! through two calls: [`QLearningAgent::choose_action`] and
//! [`QLearningAgent::update`].

use crate::{
    Result,
    app::QConfig,
    error::Error,
    q_learning::{
        q_table::QTable,
        scheduler::EpsilonScheduler,
        state_key::{Encodable, encode},
        transition::Transition,
    },
    types::{Action, ActionSpace, StateKey},
};

/// Q-learning agent (off-policy TD control)
///
/// Learns Q* by updating toward the maximum next-state value regardless of
/// which action is played next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    actions: ActionSpace,
    config: QConfig,
    q_table: QTable,
    scheduler: EpsilonScheduler,
}

impl QLearningAgent {
    /// Create a new Q-learning agent with an empty table
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` is out of range.
    pub fn new(actions: ActionSpace, config: QConfig) -> Result<Self> {
        config.validate()?;
        let scheduler = EpsilonScheduler::new(config.schedule(), config.seed);
        Ok(Self {
            actions,
            config,
            q_table: QTable::new(),
            scheduler,
        })
    }

    pub(crate) fn from_parts(
        actions: ActionSpace,
        config: QConfig,
        q_table: QTable,
        step: u64,
    ) -> Result<Self> {
        let mut agent = Self::new(actions, config)?;
        agent.q_table = q_table;
        agent.scheduler.set_step(step);
        Ok(agent)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.scheduler = self.scheduler.with_seed(seed);
        self
    }

    pub fn actions(&self) -> &ActionSpace {
        &self.actions
    }

    pub fn config(&self) -> &QConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn scheduler(&self) -> &EpsilonScheduler {
        &self.scheduler
    }

    /// Number of training selections made so far
    pub fn step(&self) -> u64 {
        self.scheduler.step()
    }

    /// Current Q-value for a state-action pair
    pub fn q_value<S: Encodable + ?Sized>(&self, state: &S, action: &Action) -> Result<f64> {
        Ok(self.q_table.get(&encode(state)?, action))
    }

    /// Pick an action for `state` over the full action space.
    ///
    /// With `training` the choice is ε-greedy and advances the exploration
    /// schedule; without it the choice is the tie-broken greedy action and
    /// the schedule is not consulted.
    pub fn choose_action<S: Encodable + ?Sized>(
        &mut self,
        state: &S,
        training: bool,
    ) -> Result<Action> {
        let key = encode(state)?;
        select(
            &self.q_table,
            &mut self.scheduler,
            &key,
            self.actions.as_slice(),
            training,
        )
    }

    /// Like [`Self::choose_action`] but restricted to the actions legal in `state`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if `legal` is empty, or
    /// [`Error::UnknownAction`] if it names an action outside the action space.
    pub fn choose_legal_action<S: Encodable + ?Sized>(
        &mut self,
        state: &S,
        legal: &[Action],
        training: bool,
    ) -> Result<Action> {
        self.check_known(legal)?;
        let key = encode(state)?;
        select(&self.q_table, &mut self.scheduler, &key, legal, training)
    }

    /// Greedy action and its value for `state`, ties broken at random.
    pub fn best_action<S: Encodable + ?Sized>(&mut self, state: &S) -> Result<(Action, f64)> {
        let key = encode(state)?;
        self.q_table
            .best_action(&key, &self.actions, self.scheduler.rng_mut())
    }

    /// One-step Q-learning update, bootstrapping over the full action space.
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·target, where target is `reward` for a
    /// terminal step (or one without a next state) and
    /// `reward + γ · max_a' Q(s',a')` otherwise. Exactly one table entry is
    /// written. Returns the new estimate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidReward`] for a non-finite reward,
    /// [`Error::UnknownAction`] for an action outside the action space, or
    /// [`Error::Encoding`] if a state cannot be encoded.
    pub fn update<S: Encodable + ?Sized>(
        &mut self,
        state: &S,
        action: &Action,
        reward: f64,
        next_state: Option<&S>,
        terminal: bool,
    ) -> Result<f64> {
        let bootstrap = match next_state {
            Some(next) if !terminal => {
                let next_key = encode(next)?;
                self.q_table.max_value(&next_key, &self.actions)
            }
            _ => None,
        };
        self.td_update(encode(state)?, action, reward, bootstrap)
    }

    /// One-step update bootstrapping only over `next_actions`.
    ///
    /// An empty `next_actions` makes the step terminal.
    pub fn update_restricted<S: Encodable + ?Sized>(
        &mut self,
        state: &S,
        action: &Action,
        reward: f64,
        next_state: Option<&S>,
        next_actions: &[Action],
        terminal: bool,
    ) -> Result<f64> {
        self.check_known(next_actions)?;
        let bootstrap = match next_state {
            Some(next) if !terminal => {
                let next_key = encode(next)?;
                self.q_table.max_value(&next_key, next_actions)
            }
            _ => None,
        };
        self.td_update(encode(state)?, action, reward, bootstrap)
    }

    /// Apply a recorded transition.
    pub fn apply<S: Encodable>(&mut self, transition: &Transition<S>) -> Result<f64> {
        match &transition.next_actions {
            Some(next_actions) => self.update_restricted(
                &transition.state,
                &transition.action,
                transition.reward,
                transition.next_state.as_ref(),
                next_actions,
                transition.terminal,
            ),
            None => self.update(
                &transition.state,
                &transition.action,
                transition.reward,
                transition.next_state.as_ref(),
                transition.terminal,
            ),
        }
    }

    /// Apply a sequence of transitions in order. Returns how many were applied.
    pub fn train<'a, S, I>(&mut self, transitions: I) -> Result<usize>
    where
        S: Encodable + 'a,
        I: IntoIterator<Item = &'a Transition<S>>,
    {
        let mut applied = 0;
        for transition in transitions {
            self.apply(transition)?;
            applied += 1;
        }
        log::debug!("applied {applied} transitions, table size {}", self.q_table.len());
        Ok(applied)
    }

    fn td_update(
        &mut self,
        state: StateKey,
        action: &Action,
        reward: f64,
        bootstrap: Option<f64>,
    ) -> Result<f64> {
        if !reward.is_finite() {
            return Err(Error::InvalidReward { value: reward });
        }
        self.check_known(std::slice::from_ref(action))?;

        let target = match bootstrap {
            Some(max_next_q) => reward + self.config.discount * max_next_q,
            None => reward,
        };
        let alpha = self.config.learning_rate;
        let current_q = self.q_table.get(&state, action);
        let new_q = (1.0 - alpha) * current_q + alpha * target;

        log::debug!("Q({state}, {action}): {current_q:.4} -> {new_q:.4} (target {target:.4})");
        self.q_table.set(state, action.clone(), new_q);
        Ok(new_q)
    }

    fn check_known(&self, actions: &[Action]) -> Result<()> {
        match actions.iter().find(|action| !self.actions.contains(action)) {
            Some(unknown) => Err(Error::UnknownAction {
                action: unknown.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Replace the hyperparameters wholesale.
    ///
    /// The table and step counter are kept; the random source is rebuilt
    /// from the new seed.
    pub fn reconfigure(&mut self, config: QConfig) -> Result<()> {
        config.validate()?;
        let step = self.scheduler.step();
        self.scheduler = EpsilonScheduler::new(config.schedule(), config.seed);
        self.scheduler.set_step(step);
        self.config = config;
        Ok(())
    }

    /// Forget everything learned and restart the exploration schedule.
    pub fn reset(&mut self) {
        self.q_table.clear();
        self.scheduler.reset();
    }
}

fn select(
    q_table: &QTable,
    scheduler: &mut EpsilonScheduler,
    key: &StateKey,
    candidates: &[Action],
    training: bool,
) -> Result<Action> {
    let q_values = q_table.values(key, candidates);
    if training {
        scheduler.next_action(candidates, &q_values)
    } else {
        scheduler.exploit(candidates, &q_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rps_agent(config: QConfig) -> QLearningAgent {
        QLearningAgent::new(
            ActionSpace::new(["rock", "paper", "scissors"]).unwrap(),
            config,
        )
        .unwrap()
    }

    fn a(label: &str) -> Action {
        Action::from(label)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = QLearningAgent::new(
            ActionSpace::new(["a"]).unwrap(),
            QConfig::default().with_learning_rate(0.0),
        );
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_terminal_update() {
        let mut agent = rps_agent(QConfig::default().with_learning_rate(0.5));
        let new_q = agent.update("rock", &a("paper"), 1.0, None, true).unwrap();
        assert_eq!(new_q, 0.5);
        assert_eq!(agent.q_value("rock", &a("paper")).unwrap(), 0.5);
    }

    #[test]
    fn test_bootstrap_uses_full_action_space() {
        let mut agent = rps_agent(QConfig::default().with_learning_rate(0.5).with_discount(0.9));
        agent.update("paper", &a("scissors"), 2.0, None, true).unwrap(); // Q(paper, scissors) = 1.0

        let new_q = agent
            .update("rock", &a("paper"), 0.0, Some("paper"), false)
            .unwrap();
        // 0.5 * 0 + 0.5 * (0 + 0.9 * 1.0)
        assert!((new_q - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_flag_ignores_next_state() {
        let mut agent = rps_agent(QConfig::default().with_learning_rate(1.0));
        agent.update("paper", &a("rock"), 5.0, None, true).unwrap();
        let new_q = agent
            .update("rock", &a("paper"), 1.0, Some("paper"), true)
            .unwrap();
        assert_eq!(new_q, 1.0);
    }

    #[test]
    fn test_restricted_bootstrap() {
        let mut agent = rps_agent(QConfig::default().with_learning_rate(1.0).with_discount(1.0));
        agent.update("s2", &a("rock"), 3.0, None, true).unwrap();
        agent.update("s2", &a("paper"), 1.0, None, true).unwrap();

        let restricted = agent
            .update_restricted("s1", &a("rock"), 0.0, Some("s2"), &[a("paper")], false)
            .unwrap();
        assert_eq!(restricted, 1.0);

        let empty = agent
            .update_restricted("s1", &a("paper"), 0.5, Some("s2"), &[], false)
            .unwrap();
        assert_eq!(empty, 0.5);
    }

    #[test]
    fn test_update_touches_one_cell() {
        let mut agent = rps_agent(QConfig::default());
        agent.update("rock", &a("paper"), 1.0, Some("scissors"), false).unwrap();
        assert_eq!(agent.q_table().len(), 1);
        assert_eq!(agent.q_value("scissors", &a("rock")).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_reward_rejected() {
        let mut agent = rps_agent(QConfig::default());
        assert!(matches!(
            agent.update("rock", &a("paper"), f64::NAN, None, true),
            Err(Error::InvalidReward { .. })
        ));
        assert!(agent.q_table().is_empty());
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut agent = rps_agent(QConfig::default());
        assert!(matches!(
            agent.update("rock", &a("lizard"), 1.0, None, true),
            Err(Error::UnknownAction { .. })
        ));
        assert!(matches!(
            agent.choose_legal_action("rock", &[a("spock")], false),
            Err(Error::UnknownAction { .. })
        ));
    }

    #[test]
    fn test_exploit_mode_does_not_advance_step() {
        let mut agent = rps_agent(QConfig::default());
        agent.update("rock", &a("paper"), 1.0, None, true).unwrap();
        for _ in 0..10 {
            assert_eq!(agent.choose_action("rock", false).unwrap(), a("paper"));
        }
        assert_eq!(agent.step(), 0);

        agent.choose_action("rock", true).unwrap();
        assert_eq!(agent.step(), 1);
    }

    #[test]
    fn test_full_and_legal_selection_agree() {
        let mut agent = rps_agent(QConfig::default().with_epsilon(0.0, 0.0));
        agent.update("rock", &a("scissors"), 1.0, None, true).unwrap();
        agent.update("rock", &a("paper"), 0.5, None, true).unwrap();

        assert_eq!(agent.choose_action("rock", true).unwrap(), a("scissors"));
        let legal = [a("rock"), a("paper")];
        assert_eq!(agent.choose_legal_action("rock", &legal, true).unwrap(), a("paper"));
        assert_eq!(agent.step(), 2);
        assert_eq!(agent.actions().len(), 3);
    }

    #[test]
    fn test_apply_dispatches_restriction() {
        let mut agent = rps_agent(QConfig::default().with_learning_rate(1.0).with_discount(1.0));
        agent.update("next", &a("rock"), 4.0, None, true).unwrap();

        let full = Transition::new("here", "paper", 0.0, Some("next"));
        assert_eq!(agent.apply(&full).unwrap(), 4.0);

        let narrowed = Transition::new("here", "scissors", 0.0, Some("next"))
            .with_next_actions(vec![a("paper")]);
        assert_eq!(agent.apply(&narrowed).unwrap(), 0.0);

        let done = Transition::terminal("here", "rock", -1.0);
        assert_eq!(agent.apply(&done).unwrap(), -1.0);
    }

    #[test]
    fn test_reconfigure_keeps_table_and_step() {
        let mut agent = rps_agent(QConfig::default());
        agent.update("rock", &a("paper"), 1.0, None, true).unwrap();
        agent.choose_action("rock", true).unwrap();

        agent
            .reconfigure(QConfig::default().with_learning_rate(0.9).with_seed(3))
            .unwrap();
        assert_eq!(agent.config().learning_rate, 0.9);
        assert_eq!(agent.step(), 1);
        assert_eq!(agent.q_table().len(), 1);
        assert!(agent.reconfigure(QConfig::default().with_discount(2.0)).is_err());
    }

    #[test]
    fn test_reset() {
        let mut agent = rps_agent(QConfig::default());
        agent.update("rock", &a("paper"), 1.0, None, true).unwrap();
        agent.choose_action("rock", true).unwrap();
        agent.reset();
        assert!(agent.q_table().is_empty());
        assert_eq!(agent.step(), 0);
    }
}
