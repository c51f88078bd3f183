// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the video switcher
//!
//! Every error here ends up as a single line in the status bar, so the
//! `Display` output is written for the user rather than for logs.

use crate::selection::{Branch, DeviceRef};
use std::fmt;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Why a device selection may not be started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// One of the three pickers has no device
    IncompleteSelection,
    /// The virtual output is also one of the inputs
    OutputCollidesWithInput,
    /// Both inputs are the same device
    DuplicateInputs,
    /// The output device cannot be opened for writing by this user
    OutputNotWritable(DeviceRef),
}

/// Failure while assembling the switcher graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The media engine could not be initialized
    EngineUnavailable(String),
    /// An element factory is not installed
    ElementUnavailable(String),
    /// The element exists but the graph would not take it
    ElementRejected { name: String, reason: String },
    /// A camera could not be bound to its capture stage
    CaptureDeviceUnavailable { device: DeviceRef, reason: String },
    /// Preview was requested but no preview sink exists
    NoPreviewSinkAvailable,
    /// The virtual output sink could not be created or bound
    OutputSinkUnavailable { device: DeviceRef, reason: String },
    /// Two elements or pads refused to link
    LinkFailure(String),
}

/// Input switch failures; these never disturb a running pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchError {
    /// No pipeline is running
    NoActivePipeline,
    /// The branch was never attached to the selector
    BranchUnavailable(Branch),
}

/// Defaults file could not be read, parsed or written
#[derive(Debug)]
pub enum SettingsError {
    /// Filesystem error
    Io(std::io::Error),
    /// The file is not valid defaults JSON
    Parse(serde_json::Error),
    /// No user configuration directory could be determined
    NoConfigDir,
}

/// Errors reported by [`crate::session::SwitcherSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Validation rejected the selection; nothing was built
    Selection(SelectionError),
    /// Graph construction failed and was rolled back
    Build(BuildError),
    /// The engine refused to start the built graph
    PipelineStartFailure(String),
    /// Start was requested while a pipeline is already live
    AlreadyRunning,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::IncompleteSelection => write!(
                f,
                "Please select two input cameras and one virtual output device."
            ),
            SelectionError::OutputCollidesWithInput => write!(
                f,
                "Virtual output must be a v4l2loopback device (e.g. /dev/video10), not one of the input cameras."
            ),
            SelectionError::DuplicateInputs => {
                write!(f, "Cam 1 and Cam 2 must be different devices.")
            }
            SelectionError::OutputNotWritable(device) => write!(
                f,
                "No write access to {}. Add your user to the 'video' group and re-login.",
                device
            ),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EngineUnavailable(msg) => write!(f, "GStreamer unavailable: {}", msg),
            BuildError::ElementUnavailable(factory) => {
                write!(f, "Missing GStreamer element '{}'.", factory)
            }
            BuildError::ElementRejected { name, reason } => {
                write!(f, "Failed to add '{}' to the pipeline: {}", name, reason)
            }
            BuildError::CaptureDeviceUnavailable { device, reason } => {
                write!(f, "Camera {} unavailable: {}", device, reason)
            }
            BuildError::NoPreviewSinkAvailable => write!(
                f,
                "No preview sink available. Install the GTK4 or GL GStreamer plugins, or disable preview."
            ),
            BuildError::OutputSinkUnavailable { device, reason } => {
                write!(f, "Virtual output {} unavailable: {}", device, reason)
            }
            BuildError::LinkFailure(msg) => write!(f, "Failed to link pipeline: {}", msg),
        }
    }
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchError::NoActivePipeline => write!(f, "No pipeline is running"),
            SwitchError::BranchUnavailable(branch) => {
                write!(f, "{} is not attached to the selector", branch)
            }
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "{}", err),
            SettingsError::Parse(err) => write!(f, "invalid defaults file: {}", err),
            SettingsError::NoConfigDir => write!(f, "no configuration directory available"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Selection(e) => write!(f, "{}", e),
            SessionError::Build(e) => write!(f, "{}", e),
            SessionError::PipelineStartFailure(msg) => {
                write!(f, "Failed to start GStreamer pipeline: {}", msg)
            }
            SessionError::AlreadyRunning => write!(f, "Pipeline is already running; stop it first."),
        }
    }
}

impl std::error::Error for SelectionError {}
impl std::error::Error for BuildError {}
impl std::error::Error for SwitchError {}
impl std::error::Error for SessionError {}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::NoConfigDir => None,
        }
    }
}

impl From<SelectionError> for SessionError {
    fn from(err: SelectionError) -> Self {
        SessionError::Selection(err)
    }
}

impl From<BuildError> for SessionError {
    fn from(err: BuildError) -> Self {
        SessionError::Build(err)
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}
