// SPDX-License-Identifier: GPL-3.0-only

//! Switcher session: one pipeline at a time, driven by UI commands
//!
//! All operations run synchronously on the caller's thread. The media engine
//! has its own worker threads for frame flow; nothing here blocks on them.
//!
//! ```text
//!            start (validate + build + play)
//!   Stopped ─────────────────────────────────▶ Running
//!      ▲                                          │
//!      └──── stop / close / runtime error ────────┘
//! ```

use crate::backends::media::MediaBackend;
use crate::errors::{SessionError, SessionResult, SwitchError};
use crate::pipelines::switcher::{PipelineGraph, PreviewMode, PreviewOutcome, build_switcher};
use crate::selection::{AccessProbe, Branch, HostAccess, Selection, validate};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Stopped,
    Running,
}

/// Result of a successful start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReport {
    pub preview: PreviewOutcome,
}

impl StartReport {
    /// Status line to show once the pipeline runs (may be empty)
    pub fn status_message(&self) -> &'static str {
        self.preview.status_message()
    }
}

/// Owns the single live pipeline
pub struct SwitcherSession<B: MediaBackend, A: AccessProbe = HostAccess> {
    backend: B,
    access: A,
    pipeline: Option<PipelineGraph<B::Graph>>,
}

impl<B: MediaBackend> SwitcherSession<B, HostAccess> {
    pub fn new(backend: B) -> Self {
        Self::with_access(backend, HostAccess)
    }
}

impl<B: MediaBackend, A: AccessProbe> SwitcherSession<B, A> {
    pub fn with_access(backend: B, access: A) -> Self {
        Self {
            backend,
            access,
            pipeline: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pipeline.is_some() {
            SessionState::Running
        } else {
            SessionState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Branch currently forwarded; None while stopped
    pub fn active_input(&self) -> Option<Branch> {
        self.pipeline.as_ref().map(PipelineGraph::active_branch)
    }

    /// Validate, build and start a pipeline
    ///
    /// Any failure leaves the session Stopped with nothing allocated.
    pub fn start(&mut self, selection: &Selection, preview: &PreviewMode) -> SessionResult<StartReport> {
        if self.pipeline.is_some() {
            return Err(SessionError::AlreadyRunning);
        }

        let validated = validate(selection, &self.access).inspect_err(|e| {
            warn!(error = %e, "Selection rejected");
        })?;

        let mut pipeline = build_switcher(&self.backend, &validated, preview).inspect_err(|e| {
            error!(error = %e, "Failed to build pipeline");
        })?;

        if let Err(e) = pipeline.play() {
            error!(error = %e, "Failed to start pipeline");
            drop(pipeline);
            return Err(SessionError::PipelineStartFailure(e));
        }

        let report = StartReport {
            preview: pipeline.preview(),
        };
        self.pipeline = Some(pipeline);
        info!(active = %Branch::A, "Switcher running");
        Ok(report)
    }

    /// Stop and release the pipeline; returns whether one was running
    pub fn stop(&mut self) -> bool {
        match self.pipeline.take() {
            Some(pipeline) => {
                drop(pipeline);
                info!("Switcher stopped");
                true
            }
            None => false,
        }
    }

    /// Forward `target` instead of the current input
    pub fn switch_to(&mut self, target: Branch) -> Result<(), SwitchError> {
        let pipeline = self
            .pipeline
            .as_mut()
            .ok_or(SwitchError::NoActivePipeline)?;
        pipeline.switch_to(target)
    }

    /// Check the running pipeline for engine errors
    ///
    /// An error stops the session; its text is returned for the status line.
    pub fn poll(&mut self) -> Option<String> {
        let message = self.pipeline.as_mut()?.poll_error()?;
        error!(error = %message, "Pipeline error, stopping");
        self.stop();
        Some(message)
    }
}
