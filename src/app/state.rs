// SPDX-License-Identifier: GPL-3.0-only

//! Control panel state: device pickers, option toggles, focus

use crate::config::Defaults;
use crate::selection::{DeviceRef, Selection};

/// The three device pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    Cam1,
    Cam2,
    Out,
}

impl Picker {
    pub const ALL: [Picker; 3] = [Picker::Cam1, Picker::Cam2, Picker::Out];

    pub fn label(&self) -> &'static str {
        match self {
            Picker::Cam1 => "Cam 1:",
            Picker::Cam2 => "Cam 2:",
            Picker::Out => "Virtual Out:",
        }
    }

    fn index(self) -> usize {
        match self {
            Picker::Cam1 => 0,
            Picker::Cam2 => 1,
            Picker::Out => 2,
        }
    }
}

/// Focusable rows of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Picker(Picker),
    Preview,
    Autoload,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Picker(Picker::Cam1),
        Field::Picker(Picker::Cam2),
        Field::Picker(Picker::Out),
        Field::Preview,
        Field::Autoload,
    ];
}

/// Everything the user can set before pressing Start
#[derive(Debug, Clone)]
pub struct ControlPanel {
    devices: Vec<DeviceRef>,
    /// Index into `devices` per picker
    selected: [Option<usize>; 3],
    /// Show the preview window
    pub preview: bool,
    /// Apply saved defaults on launch
    pub autoload: bool,
    focus: usize,
}

impl ControlPanel {
    pub fn new(devices: Vec<DeviceRef>) -> Self {
        let mut panel = Self {
            devices: Vec::new(),
            selected: [None; 3],
            preview: true,
            autoload: false,
            focus: 0,
        };
        panel.refresh(devices);
        panel
    }

    pub fn devices(&self) -> &[DeviceRef] {
        &self.devices
    }

    /// Replace the device list
    ///
    /// Each picker keeps its device if it is still present; otherwise it falls
    /// back to the first device, or nothing when the list is empty.
    pub fn refresh(&mut self, devices: Vec<DeviceRef>) {
        let previous: Vec<Option<DeviceRef>> = Picker::ALL
            .iter()
            .map(|p| self.selected_device(*p).cloned())
            .collect();

        self.devices = devices;

        for (picker, previous) in Picker::ALL.into_iter().zip(previous) {
            let kept = previous.and_then(|d| self.position(&d));
            self.selected[picker.index()] =
                kept.or(if self.devices.is_empty() { None } else { Some(0) });
        }
    }

    pub fn selected_device(&self, picker: Picker) -> Option<&DeviceRef> {
        self.selected[picker.index()].and_then(|i| self.devices.get(i))
    }

    /// Select `device` in `picker` if it is currently listed
    pub fn select(&mut self, picker: Picker, device: &DeviceRef) -> bool {
        match self.position(device) {
            Some(index) => {
                self.selected[picker.index()] = Some(index);
                true
            }
            None => false,
        }
    }

    /// Step a picker through the device list, wrapping around
    pub fn cycle(&mut self, picker: Picker, delta: isize) {
        let len = self.devices.len();
        if len == 0 {
            return;
        }
        let current = self.selected[picker.index()].unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.selected[picker.index()] = Some(next);
    }

    pub fn selection(&self) -> Selection {
        Selection {
            cam1: self.selected_device(Picker::Cam1).cloned(),
            cam2: self.selected_device(Picker::Cam2).cloned(),
            out: self.selected_device(Picker::Out).cloned(),
        }
    }

    /// Preselect saved devices that are still listed and restore the toggles
    pub fn apply_defaults(&mut self, defaults: &Defaults) {
        let saved = [&defaults.cam1, &defaults.cam2, &defaults.out];
        for (picker, device) in Picker::ALL.into_iter().zip(saved) {
            if let Some(device) = device {
                self.select(picker, device);
            }
        }
        self.preview = defaults.preview;
        self.autoload = defaults.autoload;
    }

    pub fn defaults(&self) -> Defaults {
        Defaults::from_selection(&self.selection(), self.preview, self.autoload)
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    /// Left/right on the focused row: cycle a picker or flip a toggle
    pub fn adjust(&mut self, delta: isize) {
        match self.focused() {
            Field::Picker(picker) => self.cycle(picker, delta),
            Field::Preview => self.preview = !self.preview,
            Field::Autoload => self.autoload = !self.autoload,
        }
    }

    fn position(&self, device: &DeviceRef) -> Option<usize> {
        self.devices.iter().position(|d| d == device)
    }
}
