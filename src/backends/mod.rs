// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for devices and the media engine
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Session / Switcher graph          │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐    ┌──────────────────┐   │
//! │  │   Devices   │    │   Media engine   │   │
//! │  │ (/dev, V4L2)│    │   (GStreamer)    │   │
//! │  └─────────────┘    └──────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - [`devices`]: video node enumeration and V4L2 capability lookup
//! - [`media`]: graph-building traits and their GStreamer implementation

pub mod devices;
pub mod media;
