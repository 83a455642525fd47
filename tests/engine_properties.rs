//! Engine-level properties that hold for every game built on the table.

use std::collections::{BTreeMap, HashMap};

use gamebot::{
    Action, ActionSpace, Error, QConfig, QLearningAgent,
    q_learning::{EpsilonSchedule, deserialize, encode, encode_serialize, serialize},
};
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

fn agent(labels: &[&str], config: QConfig) -> QLearningAgent {
    QLearningAgent::new(ActionSpace::new(labels.iter().copied()).unwrap(), config).unwrap()
}

#[test]
fn test_encoding_ignores_map_insertion_order() {
    let mut first = HashMap::new();
    first.insert("row".to_string(), 2);
    first.insert("col".to_string(), 3);
    first.insert("lives".to_string(), 1);

    let mut second = HashMap::new();
    second.insert("lives".to_string(), 1);
    second.insert("col".to_string(), 3);
    second.insert("row".to_string(), 2);

    let ordered: BTreeMap<String, i32> = first.clone().into_iter().collect();

    assert_eq!(encode(&first).unwrap(), encode(&second).unwrap());
    assert_eq!(encode(&first).unwrap(), encode(&ordered).unwrap());
    assert_eq!(encode(&first).unwrap().as_str(), r#"{"col":3,"lives":1,"row":2}"#);
}

#[test]
fn test_serde_states_share_keys_with_native_ones() {
    #[derive(Serialize)]
    struct Cell {
        row: usize,
        col: usize,
    }

    let via_serde = encode_serialize(&Cell { row: 1, col: 2 }).unwrap();
    let mut native = BTreeMap::new();
    native.insert("col".to_string(), 2usize);
    native.insert("row".to_string(), 1usize);
    assert_eq!(via_serde, encode(&native).unwrap());
    assert_eq!(encode_serialize(&(0, 1)).unwrap(), encode(&(0, 1)).unwrap());
}

#[test]
fn test_non_finite_state_is_an_encoding_error() {
    assert!(matches!(encode(&f64::NAN), Err(Error::Encoding { .. })));
    assert!(matches!(encode(&vec![1.0, f64::INFINITY]), Err(Error::Encoding { .. })));
}

#[test]
fn test_fresh_table_reads_zero() {
    let agent = agent(&["a", "b", "c"], QConfig::default());
    for state in ["START", "x", ""] {
        for action in agent.actions().iter() {
            assert_eq!(agent.q_value(state, action).unwrap(), 0.0);
        }
    }
    assert_eq!(agent.q_value(&(3, 4), &Action::from("a")).unwrap(), 0.0);
}

#[test]
fn test_terminal_updates_converge_monotonically() {
    for alpha in [0.05, 0.3, 0.9] {
        let mut agent = agent(&["a", "b"], QConfig::default().with_learning_rate(alpha));
        let reward = 2.5;
        let a = Action::from("a");
        let mut gap = (agent.q_value("s", &a).unwrap() - reward).abs();
        for _ in 0..200 {
            let q = agent.update("s", &a, reward, Some("s"), true).unwrap();
            let new_gap = (q - reward).abs();
            assert!(new_gap < gap || new_gap == 0.0, "alpha {alpha}: {new_gap} !< {gap}");
            gap = new_gap;
        }
        assert!(gap < 1e-3);
    }
}

#[test]
fn test_tie_breaking_is_uniform() {
    let labels = ["rock", "paper", "scissors"];
    let mut agent = agent(&labels, QConfig::default().with_seed(7));
    let n = 30_000;

    let mut counts: HashMap<Action, usize> = HashMap::new();
    for _ in 0..n {
        let (action, value) = agent.best_action("tied").unwrap();
        assert_eq!(value, 0.0);
        *counts.entry(action).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), labels.len());
    let expected = n as f64 / labels.len() as f64;
    let statistic: f64 = counts
        .values()
        .map(|&observed| (observed as f64 - expected).powi(2) / expected)
        .sum();
    let chi = ChiSquared::new((labels.len() - 1) as f64).unwrap();
    let p_value = 1.0 - chi.cdf(statistic);
    assert!(p_value > 1e-4, "tie-breaking looks biased: {counts:?} (p = {p_value})");
}

#[test]
fn test_persistence_round_trip_is_exact() {
    let config = QConfig::default()
        .with_learning_rate(0.37)
        .with_discount(0.9)
        .with_epsilon(0.8, 0.01)
        .with_decay_steps(123)
        .with_seed(99);
    let mut original = agent(
        &["up", "down", "left", "right"],
        config.clone().with_learning_rate(1.0),
    );
    let awkward = [0.1 + 0.2, 1e-300, -1234.567_890_123_456_7, 1.0 / 3.0, 5e-324];
    for (i, &value) in awkward.iter().enumerate() {
        original
            .update(&(i, i + 1), &Action::from("up"), value, None, true)
            .unwrap();
    }
    original
        .update("text state|with pipe", &Action::from("left"), 0.7, None, true)
        .unwrap();
    original.reconfigure(config.clone()).unwrap();

    let text = serialize(&original).unwrap();
    let saved = deserialize(&text).unwrap();
    assert_eq!(saved.config.as_ref(), Some(&config));
    assert_eq!(&saved.table, original.q_table());

    let restored = saved
        .into_agent(original.actions(), &QConfig::default())
        .unwrap();
    for (i, &value) in awkward.iter().enumerate() {
        assert_eq!(
            restored.q_value(&(i, i + 1), &Action::from("up")).unwrap().to_bits(),
            value.to_bits()
        );
        assert_eq!(restored.q_value(&(i, i + 1), &Action::from("down")).unwrap(), 0.0);
    }
    assert_eq!(
        restored.q_value("text state|with pipe", &Action::from("left")).unwrap(),
        0.7
    );
    assert_eq!(restored.q_value("never seen", &Action::from("up")).unwrap(), 0.0);
    assert_eq!(restored.config(), &config);
}

#[test]
fn test_decoder_rejects_garbage() {
    for text in ["", "not json", "[1, 2, 3]", r#"{"version": 99, "q": {}}"#] {
        assert!(
            matches!(deserialize(text), Err(Error::Decode { .. })),
            "{text:?} should not decode"
        );
    }
}

#[test]
fn test_epsilon_schedule_bounds() {
    let schedule = EpsilonSchedule::new(1.0, 0.05, 100);
    assert_eq!(schedule.epsilon(0), 1.0);
    assert_eq!(schedule.epsilon(100), 0.05);
    for n in [101, 1_000, u64::MAX] {
        assert_eq!(schedule.epsilon(n), 0.05);
    }

    let mut previous = schedule.epsilon(0);
    for step in 1..=100 {
        let current = schedule.epsilon(step);
        assert!(current <= previous, "epsilon rose at step {step}");
        assert!((0.05..=1.0).contains(&current));
        previous = current;
    }
}

#[test]
fn test_training_selection_advances_schedule_once() {
    let mut agent = agent(&["a", "b"], QConfig::default().with_decay_steps(10));
    for expected in 1..=25u64 {
        agent.choose_action("s", true).unwrap();
        assert_eq!(agent.step(), expected);
    }
    assert_eq!(agent.scheduler().epsilon(), 0.05);

    agent.choose_action("s", false).unwrap();
    assert_eq!(agent.step(), 25);
}

#[test]
fn test_empty_candidates_are_rejected() {
    let mut agent = agent(&["a"], QConfig::default());
    assert!(matches!(
        agent.choose_legal_action("s", &[], false),
        Err(Error::EmptyActionSet)
    ));
    assert!(matches!(
        agent.choose_legal_action("s", &[], true),
        Err(Error::EmptyActionSet)
    ));
}
