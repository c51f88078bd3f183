// SPDX-License-Identifier: GPL-3.0-only

//! Application logic behind the control panel
//!
//! [`SwitcherApp`] turns user [`Message`]s into session and settings calls and
//! keeps the one-line status the shell displays. It has no rendering code; the
//! terminal shell draws it.

mod state;

pub use state::{ControlPanel, Field, Picker};

use crate::backends::devices;
use crate::backends::media::MediaBackend;
use crate::config::SettingsStore;
use crate::pipelines::switcher::{PreviewMode, PreviewSinkChain};
use crate::selection::{AccessProbe, Branch, DeviceRef, HostAccess};
use crate::session::SwitcherSession;
use tracing::{debug, info};

/// User interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    RefreshDevices,
    Start,
    Stop,
    SwitchTo(Branch),
    SaveDefaults,
    ClearDefaults,
    /// Window closing; stops the pipeline
    Close,
}

pub struct SwitcherApp<B: MediaBackend, A: AccessProbe = HostAccess> {
    pub panel: ControlPanel,
    session: SwitcherSession<B, A>,
    store: Option<SettingsStore>,
    preview_sinks: PreviewSinkChain,
    enumerate: fn() -> Vec<DeviceRef>,
    status: String,
    preview_note: String,
}

impl<B: MediaBackend> SwitcherApp<B, HostAccess> {
    /// App over host devices
    pub fn new(backend: B, store: Option<SettingsStore>) -> Self {
        Self::with_parts(
            SwitcherSession::new(backend),
            store,
            devices::list_devices,
        )
    }
}

impl<B: MediaBackend, A: AccessProbe> SwitcherApp<B, A> {
    pub fn with_parts(
        session: SwitcherSession<B, A>,
        store: Option<SettingsStore>,
        enumerate: fn() -> Vec<DeviceRef>,
    ) -> Self {
        Self {
            panel: ControlPanel::new(enumerate()),
            session,
            store,
            preview_sinks: PreviewSinkChain::default(),
            enumerate,
            status: String::new(),
            preview_note: String::new(),
        }
    }

    /// Preview sinks tried when preview is on
    pub fn set_preview_sinks(&mut self, chain: PreviewSinkChain) {
        self.preview_sinks = chain;
    }

    /// Refresh devices and restore saved pickers and toggles
    pub fn launch(&mut self) {
        self.refresh();
        let Some(store) = &self.store else {
            return;
        };

        match store.load() {
            Ok(Some(defaults)) => {
                info!(autoload = defaults.autoload, "Applying saved defaults");
                self.panel.apply_defaults(&defaults);
            }
            Ok(None) => {}
            Err(e) => self.set_status(format!("Failed to load defaults: {}", e)),
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::RefreshDevices => self.refresh(),
            Message::Start => self.start(),
            Message::Stop => {
                self.session.stop();
                self.preview_note.clear();
            }
            Message::SwitchTo(branch) => match self.session.switch_to(branch) {
                Ok(()) => self.status = format!("{} active", branch),
                Err(e) => debug!(error = %e, "Switch ignored"),
            },
            Message::SaveDefaults => self.save_defaults(),
            Message::ClearDefaults => self.clear_defaults(),
            Message::Close => {
                self.session.stop();
            }
        }
    }

    /// Surface runtime pipeline errors; call on every UI tick
    pub fn tick(&mut self) {
        if let Some(message) = self.session.poll() {
            self.preview_note.clear();
            self.set_status(message);
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Where the preview went, empty while stopped
    pub fn preview_note(&self) -> &str {
        &self.preview_note
    }

    pub fn session(&self) -> &SwitcherSession<B, A> {
        &self.session
    }

    pub fn can_start(&self) -> bool {
        !self.session.is_running()
    }

    pub fn can_stop(&self) -> bool {
        self.session.is_running()
    }

    pub fn can_switch(&self) -> bool {
        self.session.is_running()
    }

    fn refresh(&mut self) {
        let devices = (self.enumerate)();
        if devices.is_empty() {
            self.set_status("No video devices found.");
        }
        self.panel.refresh(devices);
    }

    fn start(&mut self) {
        let preview = if self.panel.preview {
            PreviewMode::Enabled(self.preview_sinks.clone())
        } else {
            PreviewMode::Disabled
        };

        match self.session.start(&self.panel.selection(), &preview) {
            Ok(report) => {
                self.preview_note = report.status_message().to_string();
                self.status.clear();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn save_defaults(&mut self) {
        let Some(store) = &self.store else {
            self.set_status("Failed to save defaults: no configuration directory");
            return;
        };

        match store.save(&self.panel.defaults()) {
            Ok(()) => self.set_status("Defaults saved."),
            Err(e) => self.set_status(format!("Failed to save defaults: {}", e)),
        }
    }

    fn clear_defaults(&mut self) {
        let Some(store) = &self.store else {
            self.set_status("Failed to clear defaults: no configuration directory");
            return;
        };

        match store.clear() {
            Ok(()) => self.set_status("Defaults cleared."),
            Err(e) => self.set_status(format!("Failed to clear defaults: {}", e)),
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        info!(status = %self.status, "Status updated");
    }
}
