//! Progress hooks called by the orchestrator around each stage.

use super::stage::StageId;
use std::time::Duration;

/// Receives stage start/finish notifications.
///
/// Observers see the run from the orchestrator thread only and cannot
/// affect it.
pub trait PipelineObserver {
    fn stage_started(&self, _stage: StageId, _name: &str) {}

    fn stage_finished(&self, _stage: StageId, _elapsed: Duration) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records the order of notifications, for inspection.
#[derive(Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<(StageId, bool)>>,
}

impl RecordingObserver {
    /// Stages in the order they started.
    pub fn started(&self) -> Vec<StageId> {
        self.events()
            .into_iter()
            .filter(|(_, finished)| !finished)
            .map(|(stage, _)| stage)
            .collect()
    }

    /// `(stage, finished)` pairs in notification order.
    pub fn events(&self) -> Vec<(StageId, bool)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, stage: StageId, finished: bool) {
        if let Ok(mut events) = self.events.lock() {
            events.push((stage, finished));
        }
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage_started(&self, stage: StageId, _name: &str) {
        self.push(stage, false);
    }

    fn stage_finished(&self, stage: StageId, _elapsed: Duration) {
        self.push(stage, true);
    }
}
