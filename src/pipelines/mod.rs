// SPDX-License-Identifier: GPL-3.0-only

//! Media pipelines
//!
//! - [`switcher`]: two webcams → selector → preview + virtual camera

pub mod switcher;
