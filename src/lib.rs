// SPDX-License-Identifier: GPL-3.0-only

//! Video Switcher - two webcams, one virtual camera
//!
//! Feeds one of two V4L2 capture devices into a v4l2loopback output and lets
//! the user flip between them while the pipeline keeps running.
//!
//! # Architecture
//!
//! - [`selection`]: device references and selection validation
//! - [`backends`]: device enumeration and the media engine seam
//! - [`pipelines`]: the switcher graph builder and live graph handle
//! - [`session`]: start/stop/switch lifecycle around one pipeline
//! - [`config`]: saved defaults
//! - [`app`]: control panel logic
//! - [`terminal`]: terminal front end

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod selection;
pub mod session;
pub mod terminal;

// Re-export commonly used types
pub use app::{Message, SwitcherApp};
pub use config::{Defaults, SettingsStore};
pub use constants::SWITCH_VIDEO_CONTRACT;
pub use selection::{Branch, DeviceRef, Selection};
pub use session::SwitcherSession;
