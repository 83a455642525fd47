//! Export of learned tables for inspection outside the crate
//!
//! Currently supports CSV dumps of a Q-table.

mod q_csv;

pub use q_csv::{QValueRecord, q_table_records, write_q_table_csv};
