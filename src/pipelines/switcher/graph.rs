// SPDX-License-Identifier: GPL-3.0-only

//! The assembled switcher graph and live input switching

use super::preview::PreviewOutcome;
use crate::backends::media::MediaGraph;
use crate::errors::SwitchError;
use crate::selection::Branch;
use tracing::{debug, info};

/// A fully linked switcher graph
///
/// Only the builder creates one, and only after every link succeeded. Dropping
/// it stops the graph and releases all of its elements.
pub struct PipelineGraph<G: MediaGraph> {
    graph: G,
    selector: G::Element,
    /// Selector sink pads indexed by [`Branch::slot`]
    slots: [Option<G::Pad>; 2],
    active: Branch,
    preview: PreviewOutcome,
    running: bool,
}

impl<G: MediaGraph> PipelineGraph<G> {
    pub(crate) fn new(
        graph: G,
        selector: G::Element,
        slots: [Option<G::Pad>; 2],
        preview: PreviewOutcome,
    ) -> Self {
        Self {
            graph,
            selector,
            slots,
            active: Branch::A,
            preview,
            running: false,
        }
    }

    pub(crate) fn activate_initial_slot(&mut self) {
        if let Some(pad) = &self.slots[Branch::A.slot()] {
            self.graph.set_active_pad(&self.selector, pad);
        }
        self.active = Branch::A;
    }

    /// Branch the selector currently forwards
    pub fn active_branch(&self) -> Branch {
        self.active
    }

    pub fn preview(&self) -> PreviewOutcome {
        self.preview
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Underlying engine graph
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Start frame flow
    pub fn play(&mut self) -> Result<(), String> {
        self.graph.play()?;
        self.running = true;
        Ok(())
    }

    /// Repoint the selector at `target`
    ///
    /// A single property change on the running selector; nothing is paused or
    /// relinked. Switching to the branch already active does nothing.
    pub fn switch_to(&mut self, target: Branch) -> Result<(), SwitchError> {
        if !self.running {
            return Err(SwitchError::NoActivePipeline);
        }

        let pad = self.slots[target.slot()]
            .as_ref()
            .ok_or(SwitchError::BranchUnavailable(target))?;

        if self.active == target {
            debug!(branch = %target, "Already active");
            return Ok(());
        }

        self.graph.set_active_pad(&self.selector, pad);
        self.active = target;
        info!(branch = %target, "Switched input");
        Ok(())
    }

    /// Next runtime error posted by the engine
    pub fn poll_error(&mut self) -> Option<String> {
        self.graph.poll_error()
    }
}

impl<G: MediaGraph> Drop for PipelineGraph<G> {
    fn drop(&mut self) {
        debug!("Releasing switcher graph");
        self.running = false;
        self.graph.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::media::AddElementError;
    use crate::constants::VideoContract;
    use crate::selection::DeviceRef;

    /// Graph that only records selector activations
    #[derive(Default)]
    struct SelectorOnly {
        active_pads: Vec<&'static str>,
    }

    impl MediaGraph for SelectorOnly {
        type Element = &'static str;
        type Pad = &'static str;

        fn add_element(&mut self, _: &str, _: &str) -> Result<&'static str, AddElementError> {
            Err(AddElementError::Missing)
        }
        fn bind_device(&mut self, _: &&'static str, _: &DeviceRef) -> Result<(), String> {
            Ok(())
        }
        fn constrain(&mut self, _: &&'static str, _: &VideoContract) {}
        fn link(&mut self, _: &&'static str, _: &&'static str) -> Result<(), String> {
            Ok(())
        }
        fn request_pad(&mut self, _: &&'static str, _: &str) -> Option<&'static str> {
            None
        }
        fn link_into_pad(&mut self, _: &&'static str, _: &&'static str) -> Result<(), String> {
            Ok(())
        }
        fn link_from_pad(&mut self, _: &&'static str, _: &&'static str) -> Result<(), String> {
            Ok(())
        }
        fn set_active_pad(&mut self, _: &&'static str, pad: &&'static str) {
            self.active_pads.push(pad);
        }
        fn play(&mut self) -> Result<(), String> {
            Ok(())
        }
        fn poll_error(&mut self) -> Option<String> {
            None
        }
        fn release(&mut self) {}
        fn element_count(&self) -> usize {
            0
        }
    }

    fn half_attached() -> PipelineGraph<SelectorOnly> {
        let mut pipeline = PipelineGraph::new(
            SelectorOnly::default(),
            "isel",
            [Some("isel.sink_0"), None],
            PreviewOutcome::Disabled,
        );
        pipeline.activate_initial_slot();
        pipeline
    }

    #[test]
    fn test_switch_to_unattached_branch_is_rejected() {
        let mut pipeline = half_attached();
        pipeline.play().unwrap();

        assert_eq!(
            pipeline.switch_to(Branch::B),
            Err(SwitchError::BranchUnavailable(Branch::B))
        );
        assert_eq!(pipeline.active_branch(), Branch::A);
        assert_eq!(pipeline.graph().active_pads, ["isel.sink_0"]);
    }

    #[test]
    fn test_switch_before_play_needs_running_graph() {
        let mut pipeline = half_attached();

        assert_eq!(
            pipeline.switch_to(Branch::A),
            Err(SwitchError::NoActivePipeline)
        );
        assert!(!pipeline.is_running());
    }
}
