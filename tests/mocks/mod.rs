// SPDX-License-Identifier: GPL-3.0-only

//! Recording media backend for tests
//!
//! Elements are plain names, pads are `"<element>.<template-prefix><n>"`.
//! Every call is appended to a shared log so tests can inspect the graph
//! after the pipeline handle is gone.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use video_switcher::backends::media::{AddElementError, MediaBackend, MediaGraph};
use video_switcher::constants::VideoContract;
use video_switcher::errors::BuildError;
use video_switcher::selection::DeviceRef;

/// Everything the mock graphs did
#[derive(Debug, Default)]
pub struct Recorder {
    pub graphs_created: usize,
    /// (factory, name) in creation order, for the latest graph
    pub elements: Vec<(String, String)>,
    /// Elements alive across all graphs
    pub live_elements: usize,
    /// (element, device)
    pub bindings: Vec<(String, String)>,
    /// (caps filter, caps string)
    pub constraints: Vec<(String, String)>,
    /// (src, sink) by element or pad name
    pub links: Vec<(String, String)>,
    /// Pads set active on the selector, in order
    pub active_pads: Vec<String>,
    pub plays: usize,
    pub releases: usize,
}

impl Recorder {
    pub fn element_names(&self) -> Vec<&str> {
        self.elements.iter().map(|(_, n)| n.as_str()).collect()
    }

    pub fn has_link(&self, src: &str, sink: &str) -> bool {
        self.links.iter().any(|(s, d)| s == src && d == sink)
    }

    pub fn factory_of(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(_, n)| n == name)
            .map(|(f, _)| f.as_str())
    }
}

/// Knobs for injecting failures
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// Factories that are not installed
    pub missing_factories: HashSet<String>,
    /// Element names the graph refuses to add
    pub rejected_elements: HashSet<String>,
    /// Devices that cannot be opened
    pub missing_devices: HashSet<String>,
    /// Links whose sink matches this name fail
    pub failing_link_sinks: HashSet<String>,
    /// play() fails with this message
    pub play_error: Option<String>,
    /// poll_error() returns this once after play
    pub runtime_error: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub config: MockConfig,
    pub recorder: Rc<RefCell<Recorder>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            recorder: Rc::default(),
        }
    }

    pub fn without_factories(factories: &[&str]) -> Self {
        Self::with_config(MockConfig {
            missing_factories: factories.iter().map(|f| f.to_string()).collect(),
            ..MockConfig::default()
        })
    }

    pub fn recorder(&self) -> std::cell::Ref<'_, Recorder> {
        self.recorder.borrow()
    }
}

impl MediaBackend for MockBackend {
    type Graph = MockGraph;

    fn new_graph(&self, _name: &str) -> Result<MockGraph, BuildError> {
        let mut recorder = self.recorder.borrow_mut();
        recorder.graphs_created += 1;
        recorder.elements.clear();
        recorder.links.clear();
        recorder.active_pads.clear();
        drop(recorder);

        Ok(MockGraph {
            config: self.config.clone(),
            recorder: Rc::clone(&self.recorder),
            elements: Vec::new(),
            pad_counters: Vec::new(),
            playing: false,
            released: false,
        })
    }
}

pub struct MockGraph {
    config: MockConfig,
    recorder: Rc<RefCell<Recorder>>,
    elements: Vec<String>,
    pad_counters: Vec<(String, usize)>,
    playing: bool,
    released: bool,
}

impl MediaGraph for MockGraph {
    type Element = String;
    type Pad = String;

    fn add_element(&mut self, factory: &str, name: &str) -> Result<String, AddElementError> {
        if self.config.missing_factories.contains(factory) {
            return Err(AddElementError::Missing);
        }
        if self.config.rejected_elements.contains(name) {
            return Err(AddElementError::Rejected(format!("name '{}' is taken", name)));
        }
        self.elements.push(name.to_string());
        let mut recorder = self.recorder.borrow_mut();
        recorder
            .elements
            .push((factory.to_string(), name.to_string()));
        recorder.live_elements += 1;
        Ok(name.to_string())
    }

    fn bind_device(&mut self, element: &String, device: &DeviceRef) -> Result<(), String> {
        if self.config.missing_devices.contains(device.as_str()) {
            return Err(format!("{} does not exist", device));
        }
        self.recorder
            .borrow_mut()
            .bindings
            .push((element.clone(), device.to_string()));
        Ok(())
    }

    fn constrain(&mut self, filter: &String, contract: &VideoContract) {
        self.recorder
            .borrow_mut()
            .constraints
            .push((filter.clone(), contract.caps_string()));
    }

    fn link(&mut self, src: &String, sink: &String) -> Result<(), String> {
        self.record_link(src, sink)
    }

    fn request_pad(&mut self, element: &String, template: &str) -> Option<String> {
        let prefix = template.trim_end_matches("%u");
        let index = match self.pad_counters.iter_mut().find(|(e, _)| e == element) {
            Some((_, next)) => {
                *next += 1;
                *next - 1
            }
            None => {
                self.pad_counters.push((element.clone(), 1));
                0
            }
        };
        Some(format!("{}.{}{}", element, prefix, index))
    }

    fn link_into_pad(&mut self, src: &String, sink_pad: &String) -> Result<(), String> {
        self.record_link(src, sink_pad)
    }

    fn link_from_pad(&mut self, src_pad: &String, sink: &String) -> Result<(), String> {
        self.record_link(src_pad, sink)
    }

    fn set_active_pad(&mut self, _selector: &String, pad: &String) {
        self.recorder.borrow_mut().active_pads.push(pad.clone());
    }

    fn play(&mut self) -> Result<(), String> {
        if let Some(message) = &self.config.play_error {
            return Err(message.clone());
        }
        self.playing = true;
        self.recorder.borrow_mut().plays += 1;
        Ok(())
    }

    fn poll_error(&mut self) -> Option<String> {
        if !self.playing {
            return None;
        }
        self.config.runtime_error.take()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.playing = false;
        let mut recorder = self.recorder.borrow_mut();
        recorder.live_elements -= self.elements.len();
        recorder.releases += 1;
        self.elements.clear();
    }

    fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl MockGraph {
    fn record_link(&mut self, src: &str, sink: &str) -> Result<(), String> {
        let sink_element = sink.split('.').next().unwrap_or(sink);
        if self.config.failing_link_sinks.contains(sink_element) {
            return Err(format!("{} refused the link", sink_element));
        }
        self.recorder
            .borrow_mut()
            .links
            .push((src.to_string(), sink.to_string()));
        Ok(())
    }
}

impl Drop for MockGraph {
    fn drop(&mut self) {
        self.release();
    }
}

/// Access probe that treats every device as writable
pub fn all_writable(_: &DeviceRef) -> bool {
    true
}
