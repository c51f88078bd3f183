// SPDX-License-Identifier: GPL-3.0-only

//! Video device node enumeration
//!
//! Lists `/dev/video*` nodes fresh on every call. Capture cameras and
//! v4l2loopback outputs both show up here; telling them apart is left to the
//! user (the `list` command prints V4L2 capabilities to help).

use crate::constants::devices::{DEVICE_DIR, VIDEO_NODE_PREFIX};
use crate::selection::DeviceRef;
use std::path::Path;
use tracing::debug;
use v4l::capability::Flags;

/// V4L2 identity of a device node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device path (e.g., /dev/video0)
    pub path: String,
    /// Name of the device (V4L2 card)
    pub card: String,
    /// Driver name (v4l2 loopback devices report "v4l2 loopback")
    pub driver: String,
    /// Node can capture video
    pub capture: bool,
    /// Node accepts video output
    pub output: bool,
}

/// List video device nodes on the host, sorted lexicographically
///
/// An empty list is a normal result on machines without cameras.
pub fn list_devices() -> Vec<DeviceRef> {
    list_devices_in(Path::new(DEVICE_DIR))
}

/// List `video*` entries of `dir` as full paths, sorted as plain strings
///
/// String order puts `/dev/video10` before `/dev/video2`; the pickers show
/// devices in exactly that order.
pub fn list_devices_in(dir: &Path) -> Vec<DeviceRef> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Cannot read device directory");
            return Vec::new();
        }
    };

    let mut devices: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with(VIDEO_NODE_PREFIX) {
                Some(dir.join(name_str.as_ref()).to_string_lossy().to_string())
            } else {
                None
            }
        })
        .collect();

    devices.sort();
    debug!(count = devices.len(), "Enumerated video devices");

    devices.into_iter().map(DeviceRef::from).collect()
}

/// Query V4L2 capabilities of a device node
///
/// Returns None if the device cannot be opened or the ioctl fails.
pub fn describe(device: &DeviceRef) -> Option<DeviceInfo> {
    let dev = match v4l::Device::with_path(device.as_str()) {
        Ok(dev) => dev,
        Err(e) => {
            debug!(device = %device, error = %e, "Cannot open device");
            return None;
        }
    };

    let caps = match dev.query_caps() {
        Ok(caps) => caps,
        Err(e) => {
            debug!(device = %device, error = %e, "VIDIOC_QUERYCAP failed");
            return None;
        }
    };

    Some(DeviceInfo {
        path: device.to_string(),
        card: caps.card.trim().to_string(),
        driver: caps.driver.trim().to_string(),
        capture: caps.capabilities.contains(Flags::VIDEO_CAPTURE),
        output: caps.capabilities.contains(Flags::VIDEO_OUTPUT),
    })
}
