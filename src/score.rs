//! Final score hand-off
//!
//! Once per game over the session builds a [`GameResult`] and gives it to a
//! [`ScoreSink`]. What the sink does with it (log, keep, forward) is its own
//! business; failures are reported back but never touch the game.

use serde::{Deserialize, Serialize};

/// Maximum number of results a [`MemorySink`] keeps
pub const MAX_HISTORY: usize = 50;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub score: u32,
    /// Seconds left on the clock when the run ended
    pub time_left: f32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
    pub game_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// A sink could not take the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub reason: String,
}

impl SubmitError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "score submission failed: {}", self.reason)
    }
}

impl std::error::Error for SubmitError {}

/// Score delivery collaborator
pub trait ScoreSink {
    fn submit(&mut self, result: &GameResult) -> Result<(), SubmitError>;
}

impl<F> ScoreSink for F
where
    F: FnMut(&GameResult) -> Result<(), SubmitError>,
{
    fn submit(&mut self, result: &GameResult) -> Result<(), SubmitError> {
        self(result)
    }
}

/// Writes each result to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ScoreSink for LogSink {
    fn submit(&mut self, result: &GameResult) -> Result<(), SubmitError> {
        let json = serde_json::to_string(result).map_err(|e| SubmitError::new(e.to_string()))?;
        log::info!(
            "Game ended: score {}, {}s left, user {}",
            result.score,
            result.time_left,
            result.user_id.as_deref().unwrap_or("not set")
        );
        log::info!("Result: {}", json);
        Ok(())
    }
}

/// Keeps recent results in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySink {
    /// Oldest first
    pub history: Vec<GameResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&GameResult> {
        self.history.last()
    }

    /// Best score recorded, 0 if none
    pub fn high_score(&self) -> u32 {
        self.history.iter().map(|r| r.score).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        log::info!("Score history cleared");
    }
}

impl ScoreSink for MemorySink {
    fn submit(&mut self, result: &GameResult) -> Result<(), SubmitError> {
        self.history.push(result.clone());
        if self.history.len() > MAX_HISTORY {
            let overflow = self.history.len() - MAX_HISTORY;
            self.history.drain(..overflow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: u32) -> GameResult {
        GameResult {
            score,
            time_left: 12.0,
            timestamp: 1_700_000_000_000.0,
            game_id: "helix-fall".to_string(),
            user_id: None,
        }
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_string(&result(7)).unwrap();
        assert!(json.contains("\"timeLeft\":12.0"));
        assert!(json.contains("\"gameId\":\"helix-fall\""));
        assert!(!json.contains("userId"));
    }

    #[test]
    fn test_memory_sink_keeps_last_fifty() {
        let mut sink = MemorySink::new();
        for score in 0..60 {
            sink.submit(&result(score)).unwrap();
        }
        assert_eq!(sink.len(), MAX_HISTORY);
        assert_eq!(sink.history[0].score, 10);
        assert_eq!(sink.latest().map(|r| r.score), Some(59));
        assert_eq!(sink.high_score(), 59);

        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.high_score(), 0);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |r: &GameResult| -> Result<(), SubmitError> {
                seen.push(r.score);
                Ok(())
            };
            sink.submit(&result(3)).unwrap();
        }
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn test_log_sink_accepts() {
        assert!(LogSink.submit(&result(1)).is_ok());
    }

    #[test]
    fn test_submit_error_display() {
        let e = SubmitError::new("offline");
        assert_eq!(e.to_string(), "score submission failed: offline");
    }
}
