//! Rock-paper-scissors: the bot learns which move counters the human's habits

use std::{fmt, str::FromStr};

use crate::{
    Result,
    analysis::FrequencyModel,
    error::Error,
    q_learning::{Encodable, QLearningAgent, StateValue, Transition},
    types::{Action, ActionSpace},
};

/// Key used before the human has shown any move.
pub const START: &str = "START";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn label(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }

    /// The move that beats this one.
    pub fn beaten_by(&self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    pub fn action(&self) -> Action {
        Action::from(self.label())
    }

    pub fn from_action(action: &Action) -> Result<Move> {
        action.as_str().parse()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Move::ALL
            .into_iter()
            .find(|m| m.label() == s)
            .ok_or_else(|| Error::InvalidMove {
                message: format!("'{s}' is not rock, paper or scissors"),
            })
    }
}

impl Encodable for Move {
    fn state_value(&self) -> Result<StateValue> {
        Ok(StateValue::str(self.label()))
    }
}

pub fn action_space() -> ActionSpace {
    ActionSpace::from_known(Move::ALL.map(|m| m.label()))
}

/// Score of a round from the bot's side: 1 win, 0 draw, -1 loss.
pub fn outcome(bot: Move, human: Move) -> i8 {
    if bot == human {
        0
    } else if bot == human.beaten_by() {
        1
    } else {
        -1
    }
}

/// Counter-training transitions for a recorded human sequence.
///
/// For each human move the bot is rewarded for the move that beats it; the
/// next state is the human's following move, and the last move has none.
pub fn counter_transitions(history: &[Move]) -> Vec<Transition<Move>> {
    history
        .iter()
        .enumerate()
        .map(|(i, &current)| {
            Transition::new(
                current,
                current.beaten_by().action(),
                1.0,
                history.get(i + 1).copied(),
            )
        })
        .collect()
}

/// Train the agent on a recorded human sequence. Returns the number of updates.
pub fn train(agent: &mut QLearningAgent, history: &[Move]) -> Result<usize> {
    agent.train(&counter_transitions(history))
}

/// The learned response to the human's last move, without exploration.
pub fn respond(agent: &mut QLearningAgent, previous: Option<Move>) -> Result<Move> {
    let action = match previous {
        Some(previous) => agent.choose_action(&previous, false)?,
        None => agent.choose_action(START, false)?,
    };
    Move::from_action(&action)
}

/// Frequency model over rock, paper and scissors.
pub fn frequency_model(seed: Option<u64>) -> FrequencyModel {
    FrequencyModel::new(action_space(), seed)
}

/// Counter to a sampled guess of the human's next move.
///
/// Needs no training; it only uses how often each move has been played.
pub fn best_response(model: &mut FrequencyModel) -> Result<Move> {
    Ok(Move::from_action(&model.predict()?)?.beaten_by())
}

/// One played round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub human: Move,
    pub bot: Move,
    /// Bot's score: 1 win, 0 draw, -1 loss
    pub score: i8,
}

/// Let the bot answer `human`, having seen only the human's previous move.
pub fn play_round(
    agent: &mut QLearningAgent,
    previous: Option<Move>,
    human: Move,
) -> Result<Round> {
    let bot = respond(agent, previous)?;
    Ok(Round {
        human,
        bot,
        score: outcome(bot, human),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::QConfig;

    #[test]
    fn test_outcome_table() {
        assert_eq!(outcome(Move::Paper, Move::Rock), 1);
        assert_eq!(outcome(Move::Rock, Move::Paper), -1);
        assert_eq!(outcome(Move::Scissors, Move::Scissors), 0);
        for m in Move::ALL {
            assert_eq!(outcome(m.beaten_by(), m), 1);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("scissors".parse::<Move>().unwrap(), Move::Scissors);
        assert!("lizard".parse::<Move>().is_err());
    }

    #[test]
    fn test_counter_transitions() {
        let transitions = counter_transitions(&[Move::Rock, Move::Rock, Move::Paper]);
        assert_eq!(transitions.len(), 3);
        assert_eq!(transitions[0].state, Move::Rock);
        assert_eq!(transitions[0].action, Action::from("paper"));
        assert_eq!(transitions[0].next_state, Some(Move::Rock));
        assert_eq!(transitions[2].action, Action::from("scissors"));
        assert_eq!(transitions[2].next_state, None);
        assert!(transitions.iter().all(|t| t.reward == 1.0 && !t.terminal));
    }

    #[test]
    fn test_move_key_matches_plain_string() {
        use crate::q_learning::encode;
        assert_eq!(encode(&Move::Rock).unwrap(), encode("rock").unwrap());
    }

    #[test]
    fn test_respond_counters_habit() {
        let mut agent = QLearningAgent::new(action_space(), QConfig::default()).unwrap();
        train(&mut agent, &[Move::Scissors; 5]).unwrap();
        assert_eq!(respond(&mut agent, Some(Move::Scissors)).unwrap(), Move::Rock);

        let round = play_round(&mut agent, Some(Move::Scissors), Move::Scissors).unwrap();
        assert_eq!(round.score, 1);
    }

    #[test]
    fn test_best_response_to_a_rock_player() {
        let mut model = frequency_model(Some(4));
        for _ in 0..200 {
            model.observe(&Move::Rock.action()).unwrap();
        }
        let papers = (0..100)
            .filter(|_| best_response(&mut model).unwrap() == Move::Paper)
            .count();
        assert!(papers > 90, "{papers}");
    }
}
