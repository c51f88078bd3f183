// SPDX-License-Identifier: GPL-3.0-only

//! Media engine abstraction
//!
//! The switcher only ever needs a handful of graph operations: create an
//! element by factory name, bind it to a device, link elements and pads, flip
//! the selector's active pad, and start or release the whole graph. Those are
//! captured by [`MediaGraph`] so the graph shape can be assembled and tested
//! without a real engine; [`gst::GstBackend`] is the production
//! implementation.

pub mod gst;

pub use self::gst::{GstBackend, GstGraph};

use crate::constants::VideoContract;
use crate::errors::BuildError;
use crate::selection::DeviceRef;
use std::fmt;

/// Why an element could not be added to a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddElementError {
    /// The factory is not installed
    Missing,
    /// The element was created but the graph refused it
    Rejected(String),
}

/// Factory for empty graphs
pub trait MediaBackend {
    type Graph: MediaGraph;

    /// Create an empty graph, nothing added yet
    fn new_graph(&self, name: &str) -> Result<Self::Graph, BuildError>;
}

/// A graph under construction or running
///
/// Elements are added to the graph as they are created, so releasing the graph
/// releases everything that was built so far. `release` must be idempotent.
pub trait MediaGraph {
    /// Handle to an element owned by the graph
    type Element: Clone + fmt::Debug;
    /// Handle to a request pad obtained from an element
    type Pad: Clone + fmt::Debug;

    /// Instantiate an element and add it to the graph
    ///
    /// Nothing is added on error.
    fn add_element(&mut self, factory: &str, name: &str) -> Result<Self::Element, AddElementError>;

    /// Point a source or sink element at a device node
    fn bind_device(&mut self, element: &Self::Element, device: &DeviceRef) -> Result<(), String>;

    /// Pin a caps filter to the given raw video format
    fn constrain(&mut self, filter: &Self::Element, contract: &VideoContract);

    /// Link the src pad of one element to the sink pad of the next
    fn link(&mut self, src: &Self::Element, sink: &Self::Element) -> Result<(), String>;

    /// Request a new pad from a request-pad template (e.g. `sink_%u`)
    fn request_pad(&mut self, element: &Self::Element, template: &str) -> Option<Self::Pad>;

    /// Link an element's src pad into a requested sink pad
    fn link_into_pad(&mut self, src: &Self::Element, sink_pad: &Self::Pad)
    -> Result<(), String>;

    /// Link a requested src pad into an element's sink pad
    fn link_from_pad(&mut self, src_pad: &Self::Pad, sink: &Self::Element)
    -> Result<(), String>;

    /// Make `pad` the selector's forwarded input
    fn set_active_pad(&mut self, selector: &Self::Element, pad: &Self::Pad);

    /// Move the graph to the playing state
    fn play(&mut self) -> Result<(), String>;

    /// Next error posted by the running graph, if any
    fn poll_error(&mut self) -> Option<String>;

    /// Stop the graph and drop every element in it
    fn release(&mut self);

    /// Number of elements currently held by the graph
    fn element_count(&self) -> usize;
}
