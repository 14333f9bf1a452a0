//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { root } => {
                info!(root = %root, "Starting preparation");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                info!(
                    phase = %phase,
                    duration_ms = duration.as_millis() as u64,
                    "Phase complete"
                );
            }
            ProgressEvent::CandidatesCollected { candidates } => {
                info!(candidates, "Candidate source files collected");
            }
            ProgressEvent::OrderResolved { units, passes } => {
                info!(units, passes, "Compile order resolved");
            }
            ProgressEvent::Completed { total_time } => {
                info!(
                    total_time_ms = total_time.as_millis() as u64,
                    "Preparation complete"
                );
            }
            ProgressEvent::Failed { phase, error } => {
                error!(phase = %phase, error = %error, "Preparation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                root: "/test".to_string(),
            },
            ProgressEvent::PhaseStarted {
                phase: "collect".to_string(),
            },
            ProgressEvent::PhaseComplete {
                phase: "collect".to_string(),
                duration: Duration::from_millis(5),
            },
            ProgressEvent::CandidatesCollected { candidates: 4 },
            ProgressEvent::OrderResolved { units: 4, passes: 2 },
            ProgressEvent::Completed {
                total_time: Duration::from_secs(1),
            },
            ProgressEvent::Failed {
                phase: "resolve".to_string(),
                error: "cycle".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
