// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Raw video format every input branch is normalized to before the selector
///
/// Both cameras must reach the selector with identical caps, otherwise the
/// selector renegotiates on every switch and the virtual device stalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoContract {
    /// GStreamer raw video format name (e.g. "YUY2")
    pub format: &'static str,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frames per second (denominator is always 1)
    pub framerate: u32,
}

impl VideoContract {
    /// Caps description in GStreamer's textual form
    pub fn caps_string(&self) -> String {
        format!(
            "video/x-raw,format={},framerate={}/1,width={},height={}",
            self.format, self.framerate, self.width, self.height
        )
    }
}

impl std::fmt::Display for VideoContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}@{}fps {}",
            self.width, self.height, self.framerate, self.format
        )
    }
}

/// The format/resolution/frame-rate pinned on both input branches
pub const SWITCH_VIDEO_CONTRACT: VideoContract = VideoContract {
    format: "YUY2",
    width: 1280,
    height: 720,
    framerate: 30,
};

/// Device node discovery
pub mod devices {
    /// Directory scanned for video device nodes
    pub const DEVICE_DIR: &str = "/dev";

    /// File name prefix of V4L2 video nodes
    pub const VIDEO_NODE_PREFIX: &str = "video";
}

/// GStreamer element factories used by the switcher graph
pub mod factories {
    pub const INPUT_SELECTOR: &str = "input-selector";
    pub const TEE: &str = "tee";
    pub const QUEUE: &str = "queue";
    pub const CAPTURE_SOURCE: &str = "v4l2src";
    pub const COLOR_CONVERT: &str = "videoconvert";
    pub const SCALE: &str = "videoscale";
    pub const RATE: &str = "videorate";
    pub const CAPS_FILTER: &str = "capsfilter";
    pub const OUTPUT_SINK: &str = "v4l2sink";

    /// Preview sink rendered into a host widget (GTK4 paintable)
    pub const EMBEDDED_PREVIEW_SINK: &str = "gtk4paintablesink";
    /// GPU-accelerated preview sink with its own window
    pub const GL_PREVIEW_SINK: &str = "glimagesink";
    /// Best-effort preview sink picked by GStreamer
    pub const AUTO_PREVIEW_SINK: &str = "autovideosink";
}

/// Pad templates on request-pad elements
pub mod pads {
    pub const SELECTOR_SINK_TEMPLATE: &str = "sink_%u";
    pub const TEE_SRC_TEMPLATE: &str = "src_%u";
}

/// Persisted defaults location
pub mod settings {
    /// Directory name under the user config dir
    pub const CONFIG_DIR_NAME: &str = "video-switcher";

    /// Defaults file name
    pub const DEFAULTS_FILE_NAME: &str = "defaults.json";

    /// Log file written while the terminal panel owns the screen
    pub const TERMINAL_LOG_FILE_NAME: &str = "terminal.log";
}

pub mod timing {
    use super::Duration;

    /// Terminal UI input poll interval, doubles as the bus polling tick
    pub const UI_TICK: Duration = Duration::from_millis(100);
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caps_string_matches_gstreamer_syntax() {
        assert_eq!(
            SWITCH_VIDEO_CONTRACT.caps_string(),
            "video/x-raw,format=YUY2,framerate=30/1,width=1280,height=720"
        );
    }

    #[test]
    fn test_contract_display() {
        assert_eq!(SWITCH_VIDEO_CONTRACT.to_string(), "1280x720@30fps YUY2");
    }
}
