//! Transition pattern frequencies

use std::collections::{BTreeMap, HashMap};

use crate::types::Action;

/// Most likely follow-up to one context of preceding moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub context: Vec<Action>,
    pub likely: Action,
    pub count: usize,
    pub total: usize,
}

impl Pattern {
    /// Share of the context's occurrences followed by `likely`
    pub fn frequency(&self) -> f64 {
        self.count as f64 / self.total as f64
    }
}

/// For every run of `window` consecutive moves in `history`, the move that
/// most often came next.
///
/// Ties go to the smaller action label. Patterns are ordered by context.
/// A `window` of zero yields the single most frequent move overall.
pub fn transition_patterns(history: &[Action], window: usize) -> Vec<Pattern> {
    let mut counts: BTreeMap<&[Action], HashMap<&Action, usize>> = BTreeMap::new();
    for i in window..history.len() {
        *counts
            .entry(&history[i - window..i])
            .or_default()
            .entry(&history[i])
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter_map(|(context, follow_ups)| {
            let total = follow_ups.values().sum();
            let (likely, count) = follow_ups
                .into_iter()
                .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))?;
            Some(Pattern {
                context: context.to_vec(),
                likely: likely.clone(),
                count,
                total,
            })
        })
        .collect()
}
