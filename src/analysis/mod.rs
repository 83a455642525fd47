//! Looking back at a human's play
//!
//! [`patterns`] summarises what the human tends to play after a given run of
//! moves. [`suggestions`] compares the human's recorded choices with the
//! agent's learned greedy policy. [`frequency`] predicts the human's next
//! move from plain move counts, without any learning.

pub mod frequency;
pub mod patterns;
pub mod suggestions;

pub use frequency::FrequencyModel;
pub use patterns::{Pattern, transition_patterns};
pub use suggestions::{Suggestion, suggestions};
