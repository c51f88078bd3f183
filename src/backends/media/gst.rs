// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer implementation of the media graph

use super::{AddElementError, MediaBackend, MediaGraph};
use crate::constants::VideoContract;
use crate::errors::BuildError;
use crate::selection::DeviceRef;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_video::{VideoCapsBuilder, VideoFormat};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Creates `gst::Pipeline`-backed graphs
#[derive(Debug)]
pub struct GstBackend {
    _private: (),
}

impl GstBackend {
    /// Initialize GStreamer
    pub fn new() -> Result<Self, BuildError> {
        gst::init().map_err(|e| BuildError::EngineUnavailable(e.to_string()))?;
        debug!(version = %gst::version_string(), "GStreamer initialized");
        Ok(Self { _private: () })
    }
}

impl MediaBackend for GstBackend {
    type Graph = GstGraph;

    fn new_graph(&self, name: &str) -> Result<GstGraph, BuildError> {
        Ok(GstGraph {
            pipeline: gst::Pipeline::with_name(name),
            released: false,
        })
    }
}

/// A `gst::Pipeline` and everything added to it
pub struct GstGraph {
    pipeline: gst::Pipeline,
    released: bool,
}

impl MediaGraph for GstGraph {
    type Element = gst::Element;
    type Pad = gst::Pad;

    fn add_element(
        &mut self,
        factory: &str,
        name: &str,
    ) -> Result<gst::Element, AddElementError> {
        let element = gst::ElementFactory::make(factory)
            .name(name)
            .build()
            .map_err(|e| {
                debug!(factory, name, error = %e, "Element factory unavailable");
                AddElementError::Missing
            })?;

        self.pipeline.add(&element).map_err(|e| {
            warn!(factory, name, error = %e, "Failed to add element to pipeline");
            AddElementError::Rejected(e.to_string())
        })?;

        Ok(element)
    }

    fn bind_device(&mut self, element: &gst::Element, device: &DeviceRef) -> Result<(), String> {
        if element.find_property("device").is_none() {
            return Err(format!("{} has no device property", element.name()));
        }
        if !Path::new(device.as_str()).exists() {
            return Err(format!("{} does not exist", device));
        }

        element.set_property("device", device.as_str());
        debug!(element = %element.name(), device = %device, "Bound device");
        Ok(())
    }

    fn constrain(&mut self, filter: &gst::Element, contract: &VideoContract) {
        let caps = VideoCapsBuilder::new()
            .format(VideoFormat::from_string(contract.format))
            .width(contract.width as i32)
            .height(contract.height as i32)
            .framerate(gst::Fraction::new(contract.framerate as i32, 1))
            .build();
        filter.set_property("caps", &caps);
    }

    fn link(&mut self, src: &gst::Element, sink: &gst::Element) -> Result<(), String> {
        src.link(sink)
            .map_err(|e| format!("{} -> {}: {}", src.name(), sink.name(), e))
    }

    fn request_pad(&mut self, element: &gst::Element, template: &str) -> Option<gst::Pad> {
        element.request_pad_simple(template)
    }

    fn link_into_pad(&mut self, src: &gst::Element, sink_pad: &gst::Pad) -> Result<(), String> {
        let src_pad = src
            .static_pad("src")
            .ok_or_else(|| format!("{} has no src pad", src.name()))?;
        src_pad
            .link(sink_pad)
            .map(|_| ())
            .map_err(|e| format!("{} -> {}: {:?}", src.name(), sink_pad.name(), e))
    }

    fn link_from_pad(&mut self, src_pad: &gst::Pad, sink: &gst::Element) -> Result<(), String> {
        let sink_pad = sink
            .static_pad("sink")
            .ok_or_else(|| format!("{} has no sink pad", sink.name()))?;
        src_pad
            .link(&sink_pad)
            .map(|_| ())
            .map_err(|e| format!("{} -> {}: {:?}", src_pad.name(), sink.name(), e))
    }

    fn set_active_pad(&mut self, selector: &gst::Element, pad: &gst::Pad) {
        selector.set_property("active-pad", pad);
    }

    fn play(&mut self) -> Result<(), String> {
        self.pipeline
            .set_state(gst::State::Playing)
            .map(|_| ())
            .map_err(|e| e.to_string())?;
        info!(pipeline = %self.pipeline.name(), "Pipeline playing");
        Ok(())
    }

    fn poll_error(&mut self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        while let Some(msg) = bus.pop_filtered(&[gst::MessageType::Error]) {
            if let gst::MessageView::Error(err) = msg.view() {
                let source = err
                    .src()
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| "pipeline".to_string());
                error!(
                    error = %err.error(),
                    debug = ?err.debug(),
                    source = %source,
                    "GStreamer error"
                );
                return Some(format!("{}: {}", source, err.error()));
            }
        }
        None
    }

    fn release(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.pipeline.set_state(gst::State::Null) {
            error!(?e, "Failed to set pipeline to Null");
        }

        let children = self.pipeline.children();
        if !children.is_empty()
            && let Err(e) = self.pipeline.remove_many(&children)
        {
            warn!(error = %e, "Failed to remove elements from pipeline");
        }

        self.released = true;
        debug!(pipeline = %self.pipeline.name(), "Pipeline released");
    }

    fn element_count(&self) -> usize {
        self.pipeline.children().len()
    }
}

impl Drop for GstGraph {
    fn drop(&mut self) {
        self.release();
    }
}
