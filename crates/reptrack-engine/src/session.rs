//! Per-session tracking and multi-session management.
//!
//! Each active video stream owns exactly one `PushupTracker`; the
//! `SessionManager` hands out isolated trackers so concurrent streams
//! never share counter state and a reset of one session cannot be
//! observed by another.

use std::collections::HashMap;
use tokio::sync::RwLock;

use reptrack_core::{Error, LandmarkSnapshot, Result, SessionId, Timestamp};

use crate::classify::PushupType;
use crate::counter::{process_frame, FrameResult, SessionState, Stage, Thresholds};

/// Single-session push-up tracker.
///
/// Frames are processed strictly sequentially; the tracker carries the
/// counter state between calls and must not be shared across streams.
#[derive(Debug, Clone)]
pub struct PushupTracker {
    id: SessionId,
    thresholds: Thresholds,
    state: SessionState,
    frames_processed: u64,
    started_at: Timestamp,
}

impl PushupTracker {
    pub fn new(thresholds: Thresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            id: SessionId::new(),
            thresholds,
            state: SessionState::new(),
            frames_processed: 0,
            started_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn rep_count(&self) -> u32 {
        self.state.rep_count
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn pushup_type(&self) -> PushupType {
        self.state.pushup_type
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Advance the tracker by one frame (`None` = no person detected)
    pub fn process_frame(
        &mut self,
        snapshot: Option<&LandmarkSnapshot>,
    ) -> Result<FrameResult> {
        let result = process_frame(&mut self.state, snapshot, &self.thresholds)?;
        self.frames_processed += 1;
        Ok(result)
    }

    /// Reinitialize counter state. Idempotent and immediately effective
    /// for the next processed frame.
    pub fn reset(&mut self) {
        tracing::debug!(session = ?self.id, "session reset");
        self.state.reset();
    }

    /// Current outputs without advancing the machine
    pub fn current(&self) -> FrameResult {
        FrameResult {
            rep_count: self.state.rep_count,
            pushup_type: self.state.pushup_type,
            stage: self.state.stage,
            avg_angle: None,
            rep_completed: false,
        }
    }
}

/// Manager owning one isolated tracker per active session
pub struct SessionManager {
    thresholds: Thresholds,
    max_sessions: usize,
    sessions: RwLock<HashMap<SessionId, PushupTracker>>,
}

impl SessionManager {
    pub fn new(thresholds: Thresholds, max_sessions: usize) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            max_sessions,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Create a fresh session with default counter state
    pub async fn create_session(&self) -> Result<SessionId> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_sessions {
            return Err(Error::SessionLimit {
                max: self.max_sessions,
            });
        }

        let tracker = PushupTracker::new(self.thresholds)?;
        let id = tracker.id();
        sessions.insert(id, tracker);
        tracing::info!(session = ?id, active = sessions.len(), "session created");
        Ok(id)
    }

    /// Process one frame for a session
    pub async fn process_frame(
        &self,
        id: SessionId,
        snapshot: Option<&LandmarkSnapshot>,
    ) -> Result<FrameResult> {
        let mut sessions = self.sessions.write().await;
        let tracker = sessions.get_mut(&id).ok_or(Error::SessionNotFound(id))?;
        tracker.process_frame(snapshot)
    }

    /// Reset a session's counter state to defaults
    pub async fn reset_session(&self, id: SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let tracker = sessions.get_mut(&id).ok_or(Error::SessionNotFound(id))?;
        tracker.reset();
        Ok(())
    }

    /// Discard a session entirely (stream ended)
    pub async fn remove_session(&self, id: SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::SessionNotFound(id))
    }

    /// Current outputs for a session without advancing it
    pub async fn current(&self, id: SessionId) -> Result<FrameResult> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(PushupTracker::current)
            .ok_or(Error::SessionNotFound(id))
    }

    pub async fn active_sessions(&self) -> Vec<SessionId> {
        let sessions = self.sessions.read().await;
        sessions.keys().copied().collect()
    }

    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
