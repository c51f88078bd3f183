// SPDX-License-Identifier: GPL-3.0-only

//! Device selection and the rules deciding whether it may be started

use crate::errors::SelectionError;
use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::fmt;
use tracing::debug;

/// Opaque device identifier (a device node path such as `/dev/video0`)
///
/// Compared byte for byte; the path is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRef(String);

impl DeviceRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceRef {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for DeviceRef {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// One of the two input branches feeding the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// First camera, selector slot 0, active after start
    A,
    /// Second camera, selector slot 1
    B,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::A, Branch::B];

    /// Selector slot the branch is linked into
    pub fn slot(self) -> usize {
        match self {
            Branch::A => 0,
            Branch::B => 1,
        }
    }

    /// Suffix used in element names (`src_cam1`, `q_cam2`, ...)
    pub fn element_suffix(self) -> &'static str {
        match self {
            Branch::A => "cam1",
            Branch::B => "cam2",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::A => write!(f, "Cam 1"),
            Branch::B => write!(f, "Cam 2"),
        }
    }
}

/// Raw picker state; any device may be unset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub cam1: Option<DeviceRef>,
    pub cam2: Option<DeviceRef>,
    pub out: Option<DeviceRef>,
}

impl Selection {
    pub fn new(
        cam1: Option<impl Into<DeviceRef>>,
        cam2: Option<impl Into<DeviceRef>>,
        out: Option<impl Into<DeviceRef>>,
    ) -> Self {
        Self {
            cam1: cam1.map(Into::into),
            cam2: cam2.map(Into::into),
            out: out.map(Into::into),
        }
    }
}

/// A selection that passed every rule; only [`validate`] creates one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSelection {
    cam1: DeviceRef,
    cam2: DeviceRef,
    out: DeviceRef,
}

impl ValidatedSelection {
    pub fn camera(&self, branch: Branch) -> &DeviceRef {
        match branch {
            Branch::A => &self.cam1,
            Branch::B => &self.cam2,
        }
    }

    pub fn output(&self) -> &DeviceRef {
        &self.out
    }
}

/// Answers whether the current user may write to a device node
pub trait AccessProbe {
    fn is_writable(&self, device: &DeviceRef) -> bool;
}

/// Asks the kernel via `access(2)` on the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAccess;

impl AccessProbe for HostAccess {
    fn is_writable(&self, device: &DeviceRef) -> bool {
        let Ok(path) = CString::new(device.as_str()) else {
            return false;
        };
        let result = unsafe { libc::access(path.as_ptr(), libc::W_OK) };
        result == 0
    }
}

impl<F> AccessProbe for F
where
    F: Fn(&DeviceRef) -> bool,
{
    fn is_writable(&self, device: &DeviceRef) -> bool {
        self(device)
    }
}

/// Check a selection against the start rules
///
/// Rules are checked in a fixed order and the first failure wins, so when
/// several hold at once the user sees exactly one message:
/// 1. all three devices set
/// 2. output differs from both inputs
/// 3. inputs differ from each other
/// 4. output writable
pub fn validate(
    selection: &Selection,
    access: &impl AccessProbe,
) -> Result<ValidatedSelection, SelectionError> {
    let (Some(cam1), Some(cam2), Some(out)) = (
        selection.cam1.as_ref(),
        selection.cam2.as_ref(),
        selection.out.as_ref(),
    ) else {
        return Err(SelectionError::IncompleteSelection);
    };

    if out == cam1 || out == cam2 {
        return Err(SelectionError::OutputCollidesWithInput);
    }

    if cam1 == cam2 {
        return Err(SelectionError::DuplicateInputs);
    }

    if !access.is_writable(out) {
        return Err(SelectionError::OutputNotWritable(out.clone()));
    }

    debug!(cam1 = %cam1, cam2 = %cam2, out = %out, "Selection validated");

    Ok(ValidatedSelection {
        cam1: cam1.clone(),
        cam2: cam2.clone(),
        out: out.clone(),
    })
}
