// SPDX-License-Identifier: GPL-3.0-only

//! Preview sink selection
//!
//! Preview sinks are optional plugins, so the sink is picked from an ordered
//! list of candidates: the first factory that instantiates wins.

use super::builder::element_error;
use crate::backends::media::{AddElementError, MediaGraph};
use crate::constants::factories::{AUTO_PREVIEW_SINK, EMBEDDED_PREVIEW_SINK, GL_PREVIEW_SINK};
use crate::errors::BuildError;
use tracing::{debug, info};

/// Where a preview sink draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPlacement {
    /// Rendered into a surface owned by the host window
    Embedded,
    /// Opens its own window
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCandidate {
    pub factory: &'static str,
    pub placement: PreviewPlacement,
}

/// Ordered preview sink candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSinkChain {
    candidates: Vec<PreviewCandidate>,
}

impl Default for PreviewSinkChain {
    /// GTK4 paintable, then GL, then whatever `autovideosink` finds
    fn default() -> Self {
        Self::new(vec![
            PreviewCandidate {
                factory: EMBEDDED_PREVIEW_SINK,
                placement: PreviewPlacement::Embedded,
            },
            PreviewCandidate {
                factory: GL_PREVIEW_SINK,
                placement: PreviewPlacement::Window,
            },
            PreviewCandidate {
                factory: AUTO_PREVIEW_SINK,
                placement: PreviewPlacement::Window,
            },
        ])
    }
}

impl PreviewSinkChain {
    pub fn new(candidates: Vec<PreviewCandidate>) -> Self {
        Self { candidates }
    }

    /// Only sinks that open their own window, for hosts without a GTK surface
    pub fn windowed() -> Self {
        Self::new(
            Self::default()
                .candidates
                .into_iter()
                .filter(|c| c.placement == PreviewPlacement::Window)
                .collect(),
        )
    }

    pub fn candidates(&self) -> &[PreviewCandidate] {
        &self.candidates
    }

    /// Try each candidate in order and add the first that exists
    pub(crate) fn instantiate<G: MediaGraph>(
        &self,
        graph: &mut G,
        name: &str,
    ) -> Result<(G::Element, PreviewOutcome), BuildError> {
        for (index, candidate) in self.candidates.iter().enumerate() {
            let element = match graph.add_element(candidate.factory, name) {
                Ok(element) => element,
                Err(AddElementError::Missing) => {
                    debug!(factory = candidate.factory, "Preview sink unavailable, trying next");
                    continue;
                }
                Err(e) => return Err(element_error(e, candidate.factory, name)),
            };

            let outcome = match candidate.placement {
                PreviewPlacement::Embedded => PreviewOutcome::Embedded,
                PreviewPlacement::Window => PreviewOutcome::Window {
                    fallback: self.candidates[..index]
                        .iter()
                        .any(|c| c.placement == PreviewPlacement::Embedded),
                },
            };
            info!(factory = candidate.factory, ?outcome, "Selected preview sink");
            return Ok((element, outcome));
        }

        Err(BuildError::NoPreviewSinkAvailable)
    }
}

/// Whether and how the preview is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewMode {
    Disabled,
    Enabled(PreviewSinkChain),
}

impl PreviewMode {
    /// Enabled with the default sink chain, or disabled
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            PreviewMode::Enabled(PreviewSinkChain::default())
        } else {
            PreviewMode::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, PreviewMode::Enabled(_))
    }
}

/// Preview result of a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Disabled,
    Embedded,
    /// Separate window; `fallback` is set when an embedded sink was wanted
    Window { fallback: bool },
}

impl PreviewOutcome {
    /// Status line shown after a successful start
    pub fn status_message(&self) -> &'static str {
        match self {
            PreviewOutcome::Disabled => "Preview disabled.",
            PreviewOutcome::Embedded => "",
            PreviewOutcome::Window { fallback: true } => {
                "Preview opens in a separate window (GTK4 sink missing)"
            }
            PreviewOutcome::Window { fallback: false } => "Preview opens in a separate window.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chain_order() {
        let factories: Vec<_> = PreviewSinkChain::default()
            .candidates()
            .iter()
            .map(|c| c.factory)
            .collect();
        assert_eq!(factories, ["gtk4paintablesink", "glimagesink", "autovideosink"]);
    }

    #[test]
    fn test_windowed_chain_skips_embedded() {
        let chain = PreviewSinkChain::windowed();
        assert_eq!(chain.candidates().len(), 2);
        assert!(
            chain
                .candidates()
                .iter()
                .all(|c| c.placement == PreviewPlacement::Window)
        );
    }

    #[test]
    fn test_preview_mode_from_flag() {
        assert!(PreviewMode::from_flag(true).is_enabled());
        assert_eq!(PreviewMode::from_flag(false), PreviewMode::Disabled);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(PreviewOutcome::Disabled.status_message(), "Preview disabled.");
        assert!(PreviewOutcome::Embedded.status_message().is_empty());
        assert!(
            PreviewOutcome::Window { fallback: true }
                .status_message()
                .contains("GTK4 sink missing")
        );
    }
}
