//! `--log-file`: a JSON array of every run made in (and across) sessions.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reactloop_agent::AgentRun;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One logged run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub response: String,
    pub duration_seconds: f64,

    #[serde(flatten)]
    pub run: AgentRun,
}

/// Appends run records to a JSON file, rewriting it after every run.
#[derive(Debug, Default)]
pub struct RunLog {
    path: Option<PathBuf>,
    records: Vec<RunRecord>,
}

impl RunLog {
    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open `path`, keeping any records already in it.
    pub fn open(path: PathBuf) -> io::Result<Self> {
        let records = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: Some(path),
            records,
        })
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Record a finished run and save the file.
    pub fn record(&mut self, query: &str, run: &AgentRun, elapsed: Duration) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        self.records.push(RunRecord {
            timestamp: Utc::now(),
            query: query.to_string(),
            response: run.answer_text().to_string(),
            duration_seconds: elapsed.as_secs_f64(),
            run: run.clone(),
        });

        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), runs = self.records.len(), "Run log saved");
        Ok(())
    }
}
