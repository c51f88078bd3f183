// SPDX-License-Identifier: GPL-3.0-only

//! Two-camera switcher pipeline
//!
//! Two capture branches feed an input selector; the selector output is split
//! by a tee into an optional preview and the virtual camera sink. Switching
//! cameras only changes the selector's active pad, the graph keeps running.

mod builder;
mod graph;
mod preview;

pub use builder::{GRAPH_NAME, build_switcher};
pub use graph::PipelineGraph;
pub use preview::{
    PreviewCandidate, PreviewMode, PreviewOutcome, PreviewPlacement, PreviewSinkChain,
};
