//! CSV dump of a Q-table: one `state,action,value` row per stored entry

use std::{fs::File, io::Write, path::Path};

use anyhow::{Context, Result};

use crate::q_learning::QLearningAgent;

/// A single row in the Q-table CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct QValueRecord {
    pub state: String,
    pub action: String,
    pub value: f64,
}

/// Stored entries ordered by state key, then action label.
pub fn q_table_records(agent: &QLearningAgent) -> Vec<QValueRecord> {
    let mut records: Vec<QValueRecord> = agent
        .q_table()
        .iter()
        .map(|(state, action, value)| QValueRecord {
            state: state.to_string(),
            action: action.to_string(),
            value,
        })
        .collect();
    records.sort_by(|a, b| a.state.cmp(&b.state).then_with(|| a.action.cmp(&b.action)));
    records
}

fn write_records<W: Write>(writer: W, records: &[QValueRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["state", "action", "value"])?;
    for record in records {
        let value = record.value.to_string();
        csv.write_record([record.state.as_str(), record.action.as_str(), value.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the agent's table to `path`, replacing any existing file.
pub fn write_q_table_csv(agent: &QLearningAgent, path: &Path) -> Result<()> {
    let records = q_table_records(agent);
    let file = File::create(path)
        .with_context(|| format!("failed to create CSV file {}", path.display()))?;
    write_records(file, &records)
        .with_context(|| format!("failed to write Q-table CSV to {}", path.display()))?;
    log::info!("{:<32}{:<32}", "exported q-table", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::QConfig, types::{Action, ActionSpace}};
    use tempfile::TempDir;

    #[test]
    fn test_rows_sorted_and_quoted() {
        let mut agent = QLearningAgent::new(
            ActionSpace::new(["up", "down"]).unwrap(),
            QConfig::default().with_learning_rate(1.0),
        )
        .unwrap();
        agent.update(&(1usize, 0usize), &Action::from("up"), 2.5, None, true).unwrap();
        agent.update(&(0usize, 1usize), &Action::from("up"), -1.0, None, true).unwrap();
        agent.update(&(0usize, 1usize), &Action::from("down"), 3.0, None, true).unwrap();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("q.csv");
        write_q_table_csv(&agent, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "state,action,value",
                "\"[0,1]\",down,3",
                "\"[0,1]\",up,-1",
                "\"[1,0]\",up,2.5",
            ]
        );
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let agent =
            QLearningAgent::new(ActionSpace::new(["a"]).unwrap(), QConfig::default()).unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("q.csv");
        let err = write_q_table_csv(&agent, &path).unwrap_err();
        assert!(err.to_string().contains("q.csv"));
    }
}
