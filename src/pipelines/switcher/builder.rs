// SPDX-License-Identifier: GPL-3.0-only

//! Switcher graph construction
//!
//! The topology is fixed:
//!
//! ```text
//! v4l2src(cam1) ! videoconvert ! videoscale ! videorate ! capsfilter ! queue ─┐
//!                                                                            input-selector ! tee
//! v4l2src(cam2) ! videoconvert ! videoscale ! videorate ! capsfilter ! queue ─┘            │
//!        ┌──────────────────────────────────────────────────────────────────────────────────┤
//!        ├─ queue ! videoconvert ! <preview sink>            (only with preview)
//!        └─ queue ! videoconvert ! v4l2sink(out)
//! ```
//!
//! Any failure releases the whole graph before the error is returned.

use super::graph::PipelineGraph;
use super::preview::{PreviewMode, PreviewOutcome};
use crate::backends::media::{AddElementError, MediaBackend, MediaGraph};
use crate::constants::SWITCH_VIDEO_CONTRACT;
use crate::constants::factories::{
    CAPS_FILTER, CAPTURE_SOURCE, COLOR_CONVERT, INPUT_SELECTOR, OUTPUT_SINK, QUEUE, RATE, SCALE,
    TEE,
};
use crate::constants::pads::{SELECTOR_SINK_TEMPLATE, TEE_SRC_TEMPLATE};
use crate::errors::BuildError;
use crate::selection::{Branch, DeviceRef, ValidatedSelection};
use tracing::{debug, info, warn};

/// Name given to the engine graph
pub const GRAPH_NAME: &str = "switcher";

/// Build the switcher graph for a validated selection
///
/// On success the graph is fully linked, not yet playing, and branch A is the
/// active selector input. On failure nothing built so far survives.
pub fn build_switcher<B: MediaBackend>(
    backend: &B,
    selection: &ValidatedSelection,
    preview: &PreviewMode,
) -> Result<PipelineGraph<B::Graph>, BuildError> {
    info!(
        cam1 = %selection.camera(Branch::A),
        cam2 = %selection.camera(Branch::B),
        out = %selection.output(),
        preview = preview.is_enabled(),
        contract = %SWITCH_VIDEO_CONTRACT,
        "Building switcher pipeline"
    );

    let mut graph = backend.new_graph(GRAPH_NAME)?;

    match assemble(&mut graph, selection, preview) {
        Ok(parts) => {
            let mut pipeline = PipelineGraph::new(graph, parts.selector, parts.slots, parts.preview);
            // Branch A forwards first
            pipeline.activate_initial_slot();
            info!("Switcher pipeline built");
            Ok(pipeline)
        }
        Err(e) => {
            warn!(error = %e, "Pipeline construction failed, tearing down");
            graph.release();
            Err(e)
        }
    }
}

/// Elements the finished graph needs to keep addressing
struct Assembled<G: MediaGraph> {
    selector: G::Element,
    slots: [Option<G::Pad>; 2],
    preview: PreviewOutcome,
}

/// Preview consumer elements
struct PreviewBranch<E> {
    queue: E,
    convert: E,
    sink: E,
}

fn assemble<G: MediaGraph>(
    graph: &mut G,
    selection: &ValidatedSelection,
    preview: &PreviewMode,
) -> Result<Assembled<G>, BuildError> {
    let selector = require(graph, INPUT_SELECTOR, "isel")?;

    let preview_sink = match preview {
        PreviewMode::Enabled(chain) => Some(chain.instantiate(graph, "preview")?),
        PreviewMode::Disabled => None,
    };

    let out_sink = make_output_sink(graph, selection.output())?;
    let out_convert = require(graph, COLOR_CONVERT, "outconvert")?;

    let tee = require(graph, TEE, "tee")?;
    let out_queue = require(graph, QUEUE, "qout")?;

    let (preview_branch, preview_outcome) = match preview_sink {
        Some((sink, outcome)) => {
            let branch = PreviewBranch {
                queue: require(graph, QUEUE, "qprev")?,
                convert: require(graph, COLOR_CONVERT, "prevconvert")?,
                sink,
            };
            (Some(branch), outcome)
        }
        None => (None, PreviewOutcome::Disabled),
    };

    let mut chains = Vec::with_capacity(Branch::ALL.len());
    for branch in Branch::ALL {
        chains.push(make_input_branch(graph, branch, selection.camera(branch))?);
    }

    let mut slots: [Option<G::Pad>; 2] = [None, None];
    for (branch, chain) in Branch::ALL.into_iter().zip(&chains) {
        slots[branch.slot()] = Some(link_into_selector(graph, &selector, branch, chain)?);
    }

    graph
        .link(&selector, &tee)
        .map_err(|e| BuildError::LinkFailure(format!("selector to tee: {}", e)))?;

    if let Some(branch) = &preview_branch {
        link_tee_branch(graph, &tee, &branch.queue, "preview")?;
    }
    link_tee_branch(graph, &tee, &out_queue, "output")?;

    if let Some(branch) = &preview_branch {
        link_chain(graph, &[&branch.queue, &branch.convert, &branch.sink])
            .map_err(|e| BuildError::LinkFailure(format!("preview branch: {}", e)))?;
    }
    link_chain(graph, &[&out_queue, &out_convert, &out_sink])
        .map_err(|e| BuildError::LinkFailure(format!("output branch: {}", e)))?;

    debug!(elements = graph.element_count(), "Switcher graph linked");

    Ok(Assembled {
        selector,
        slots,
        preview: preview_outcome,
    })
}

/// Add an element that has no fallback
fn require<G: MediaGraph>(
    graph: &mut G,
    factory: &str,
    name: &str,
) -> Result<G::Element, BuildError> {
    graph
        .add_element(factory, name)
        .map_err(|e| element_error(e, factory, name))
}

pub(super) fn element_error(error: AddElementError, factory: &str, name: &str) -> BuildError {
    match error {
        AddElementError::Missing => BuildError::ElementUnavailable(factory.to_string()),
        AddElementError::Rejected(reason) => BuildError::ElementRejected {
            name: name.to_string(),
            reason,
        },
    }
}

fn make_output_sink<G: MediaGraph>(
    graph: &mut G,
    device: &DeviceRef,
) -> Result<G::Element, BuildError> {
    let sink = graph
        .add_element(OUTPUT_SINK, "outsink")
        .map_err(|e| match e {
            AddElementError::Missing => BuildError::OutputSinkUnavailable {
                device: device.clone(),
                reason: format!("missing '{}' element", OUTPUT_SINK),
            },
            rejected => element_error(rejected, OUTPUT_SINK, "outsink"),
        })?;

    graph
        .bind_device(&sink, device)
        .map_err(|reason| BuildError::OutputSinkUnavailable {
            device: device.clone(),
            reason,
        })?;

    Ok(sink)
}

/// capture → convert → scale → rate → caps → queue, in link order
fn make_input_branch<G: MediaGraph>(
    graph: &mut G,
    branch: Branch,
    device: &DeviceRef,
) -> Result<Vec<G::Element>, BuildError> {
    let suffix = branch.element_suffix();

    let source = require(graph, CAPTURE_SOURCE, &format!("src_{}", suffix))?;
    graph
        .bind_device(&source, device)
        .map_err(|reason| BuildError::CaptureDeviceUnavailable {
            device: device.clone(),
            reason,
        })?;

    let convert = require(graph, COLOR_CONVERT, &format!("conv_{}", suffix))?;
    let scale = require(graph, SCALE, &format!("scale_{}", suffix))?;
    let rate = require(graph, RATE, &format!("rate_{}", suffix))?;
    let caps = require(graph, CAPS_FILTER, &format!("caps_{}", suffix))?;
    graph.constrain(&caps, &SWITCH_VIDEO_CONTRACT);
    let queue = require(graph, QUEUE, &format!("q_{}", suffix))?;

    debug!(branch = %branch, device = %device, "Input branch created");
    Ok(vec![source, convert, scale, rate, caps, queue])
}

fn link_chain<G: MediaGraph>(graph: &mut G, elements: &[&G::Element]) -> Result<(), String> {
    for pair in elements.windows(2) {
        graph.link(pair[0], pair[1])?;
    }
    Ok(())
}

/// Link a branch chain and attach its queue to a fresh selector sink pad
fn link_into_selector<G: MediaGraph>(
    graph: &mut G,
    selector: &G::Element,
    branch: Branch,
    chain: &[G::Element],
) -> Result<G::Pad, BuildError> {
    let refs: Vec<&G::Element> = chain.iter().collect();
    link_chain(graph, &refs)
        .map_err(|e| BuildError::LinkFailure(format!("{} branch: {}", branch, e)))?;

    let pad = graph
        .request_pad(selector, SELECTOR_SINK_TEMPLATE)
        .ok_or_else(|| {
            BuildError::LinkFailure(format!("selector refused a sink pad for {}", branch))
        })?;

    let last = chain
        .last()
        .ok_or_else(|| BuildError::LinkFailure(format!("{} branch is empty", branch)))?;
    graph
        .link_into_pad(last, &pad)
        .map_err(|e| BuildError::LinkFailure(format!("{} to selector: {}", branch, e)))?;

    Ok(pad)
}

fn link_tee_branch<G: MediaGraph>(
    graph: &mut G,
    tee: &G::Element,
    queue: &G::Element,
    consumer: &str,
) -> Result<(), BuildError> {
    let pad = graph.request_pad(tee, TEE_SRC_TEMPLATE).ok_or_else(|| {
        BuildError::LinkFailure(format!("tee refused a src pad for {}", consumer))
    })?;

    graph
        .link_from_pad(&pad, queue)
        .map_err(|e| BuildError::LinkFailure(format!("tee to {}: {}", consumer, e)))
}
