//! Score persistence at game over.
//!
//! The session hands a [`ScoreRecord`] to a [`ScoreReporter`] and bounds the
//! call with a timeout. Failure is never fatal: the game state only records
//! that the score was not saved.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::core::{level_for_score, title_for_level};

/// Final result of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub nickname: String,
    pub score: u32,
    pub level: u32,
    pub title: String,
    pub recorded_at_ms: u64,
}

impl ScoreRecord {
    pub fn new(nickname: impl Into<String>, score: u32, recorded_at_ms: u64) -> Self {
        let level = level_for_score(score);
        Self {
            nickname: nickname.into(),
            score,
            level,
            title: title_for_level(level).to_string(),
            recorded_at_ms,
        }
    }
}

/// Persistence collaborator
pub trait ScoreReporter: Send + Sync + 'static {
    fn save(&self, record: &ScoreRecord) -> impl Future<Output = Result<()>> + Send;
}

/// Appends one JSON object per line to a local file.
#[derive(Debug, Clone)]
pub struct JsonLinesReporter {
    path: PathBuf,
}

impl JsonLinesReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record in the file. A missing file is empty.
    pub async fn load(&self) -> Result<Vec<ScoreRecord>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };

        text.lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("{} line {}", self.path.display(), i + 1))
            })
            .collect()
    }
}

impl ScoreReporter for JsonLinesReporter {
    async fn save(&self, record: &ScoreRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).context("encoding score record")?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("opening {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        file.flush().await?;
        Ok(())
    }
}

/// In-process reporter for tests and headless runs.
///
/// Can be configured to fail or to stall before answering.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    records: Arc<Mutex<Vec<ScoreRecord>>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every save returns an error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Every save sleeps for `delay` before storing the record.
    pub fn stalled(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub async fn records(&self) -> Vec<ScoreRecord> {
        self.records.lock().await.clone()
    }
}

impl ScoreReporter for MemoryReporter {
    async fn save(&self, record: &ScoreRecord) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            anyhow::bail!("score store unavailable");
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_derives_level_and_title() {
        let record = ScoreRecord::new("ada", 5300, 42);
        assert_eq!(record.level, 5);
        assert_eq!(record.title, "Calculator");
        assert_eq!(record.recorded_at_ms, 42);
    }

    #[tokio::test]
    async fn test_json_lines_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = JsonLinesReporter::new(dir.path().join("scores.jsonl"));
        assert!(reporter.load().await.unwrap().is_empty());

        let first = ScoreRecord::new("ada", 80, 1);
        let second = ScoreRecord::new("bob", 1400, 2);
        reporter.save(&first).await.unwrap();
        reporter.save(&second).await.unwrap();

        assert_eq!(reporter.load().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_json_lines_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = JsonLinesReporter::new(dir.path().join("missing").join("scores.jsonl"));
        let err = reporter.save(&ScoreRecord::new("ada", 0, 0)).await.unwrap_err();
        assert!(format!("{err:#}").contains("opening"));
    }

    #[tokio::test]
    async fn test_memory_reporter_modes() {
        let ok = MemoryReporter::new();
        ok.save(&ScoreRecord::new("ada", 10, 0)).await.unwrap();
        assert_eq!(ok.records().await.len(), 1);

        let failing = MemoryReporter::failing();
        assert!(failing.save(&ScoreRecord::new("ada", 10, 0)).await.is_err());
        assert!(failing.records().await.is_empty());
    }
}
