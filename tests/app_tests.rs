// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for control panel logic

mod mocks;

use mocks::{MockBackend, MockConfig, all_writable};
use tempfile::TempDir;
use video_switcher::app::{Message, Picker, SwitcherApp};
use video_switcher::config::{Defaults, SettingsStore};
use video_switcher::selection::{Branch, DeviceRef};
use video_switcher::session::SwitcherSession;

type App = SwitcherApp<MockBackend, fn(&DeviceRef) -> bool>;

fn three_devices() -> Vec<DeviceRef> {
    ["/dev/video0", "/dev/video2", "/dev/video10"]
        .into_iter()
        .map(DeviceRef::from)
        .collect()
}

fn no_devices() -> Vec<DeviceRef> {
    Vec::new()
}

fn app(backend: &MockBackend, store: Option<SettingsStore>) -> App {
    let session = SwitcherSession::with_access(
        backend.clone(),
        all_writable as fn(&DeviceRef) -> bool,
    );
    SwitcherApp::with_parts(session, store, three_devices)
}

/// cam1 → video0, cam2 → video2, out → video10
fn pick_distinct(app: &mut App) {
    app.panel.select(Picker::Cam2, &DeviceRef::from("/dev/video2"));
    app.panel.select(Picker::Out, &DeviceRef::from("/dev/video10"));
}

#[test]
fn test_start_and_switch() {
    let backend = MockBackend::new();
    let mut app = app(&backend, None);
    app.panel.preview = false;
    pick_distinct(&mut app);

    assert!(app.can_start());
    app.update(Message::Start);

    assert!(app.can_stop());
    assert!(app.can_switch());
    assert_eq!(app.preview_note(), "Preview disabled.");

    app.update(Message::SwitchTo(Branch::B));
    assert_eq!(app.status(), "Cam 2 active");
    assert_eq!(app.session().active_input(), Some(Branch::B));

    app.update(Message::Stop);
    assert!(app.can_start());
    assert!(app.preview_note().is_empty());
}

#[test]
fn test_invalid_selection_shown_in_status() {
    let backend = MockBackend::new();
    // All pickers start on the first device
    let mut app = app(&backend, None);

    app.update(Message::Start);

    assert!(app.can_start());
    assert_eq!(
        app.status(),
        "Virtual output must be a v4l2loopback device (e.g. /dev/video10), not one of the input cameras."
    );
    assert_eq!(backend.recorder().graphs_created, 0);
}

#[test]
fn test_switch_while_stopped_is_silent() {
    let backend = MockBackend::new();
    let mut app = app(&backend, None);

    app.update(Message::SwitchTo(Branch::B));

    assert!(app.status().is_empty());
    assert!(app.can_start());
}

#[test]
fn test_runtime_error_surfaces_on_tick() {
    let backend = MockBackend::with_config(MockConfig {
        runtime_error: Some("Internal data stream error.".to_string()),
        ..MockConfig::default()
    });
    let mut app = app(&backend, None);
    pick_distinct(&mut app);
    app.update(Message::Start);
    assert!(app.can_stop());

    app.tick();

    assert_eq!(app.status(), "Internal data stream error.");
    assert!(app.can_start());
    assert_eq!(backend.recorder().live_elements, 0);
}

#[test]
fn test_close_stops_pipeline() {
    let backend = MockBackend::new();
    let mut app = app(&backend, None);
    pick_distinct(&mut app);
    app.update(Message::Start);

    app.update(Message::Close);

    assert!(!app.session().is_running());
    assert_eq!(backend.recorder().live_elements, 0);
}

#[test]
fn test_save_and_clear_defaults() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("defaults.json"));
    let backend = MockBackend::new();
    let mut app = app(&backend, Some(store.clone()));
    pick_distinct(&mut app);
    app.panel.autoload = true;

    app.update(Message::SaveDefaults);
    assert_eq!(app.status(), "Defaults saved.");

    let saved = store.load().unwrap().expect("defaults should be saved");
    assert_eq!(saved.cam2, Some(DeviceRef::from("/dev/video2")));
    assert_eq!(saved.out, Some(DeviceRef::from("/dev/video10")));
    assert!(saved.autoload);

    app.update(Message::ClearDefaults);
    assert_eq!(app.status(), "Defaults cleared.");
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_launch_restores_defaults_without_autoload() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("defaults.json"));
    store
        .save(&Defaults {
            cam1: Some(DeviceRef::from("/dev/video2")),
            cam2: Some(DeviceRef::from("/dev/video0")),
            out: Some(DeviceRef::from("/dev/video10")),
            preview: false,
            autoload: false,
        })
        .unwrap();

    let backend = MockBackend::new();
    let mut app = app(&backend, Some(store));
    app.launch();

    assert_eq!(
        app.panel.selected_device(Picker::Cam1),
        Some(&DeviceRef::from("/dev/video2"))
    );
    assert_eq!(
        app.panel.selected_device(Picker::Cam2),
        Some(&DeviceRef::from("/dev/video0"))
    );
    assert!(!app.panel.preview, "Saved preview toggle should be restored");
    assert!(!app.panel.autoload);
}

#[test]
fn test_launch_restores_autoload_toggle() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("defaults.json"));
    store
        .save(&Defaults {
            cam1: Some(DeviceRef::from("/dev/video0")),
            cam2: Some(DeviceRef::from("/dev/video2")),
            out: Some(DeviceRef::from("/dev/video10")),
            preview: true,
            autoload: true,
        })
        .unwrap();

    let backend = MockBackend::new();
    let mut app = app(&backend, Some(store));
    app.launch();

    assert_eq!(
        app.panel.selected_device(Picker::Out),
        Some(&DeviceRef::from("/dev/video10"))
    );
    assert!(app.panel.preview);
    assert!(app.panel.autoload);
}

#[test]
fn test_launch_without_saved_defaults_keeps_panel_defaults() {
    let dir = TempDir::new().unwrap();
    let backend = MockBackend::new();
    let mut app = app(&backend, Some(SettingsStore::new(dir.path().join("defaults.json"))));
    app.launch();

    assert!(app.panel.preview);
    assert!(!app.panel.autoload);
    assert!(app.status().is_empty());
}

#[test]
fn test_launch_reports_unreadable_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.json");
    std::fs::write(&path, "{ \"cam1\": ").unwrap();

    let backend = MockBackend::new();
    let mut app = app(&backend, Some(SettingsStore::new(path)));
    app.launch();

    assert!(app.status().starts_with("Failed to load defaults: "));
}

#[test]
fn test_refresh_with_no_devices() {
    let backend = MockBackend::new();
    let session = SwitcherSession::with_access(
        backend.clone(),
        all_writable as fn(&DeviceRef) -> bool,
    );
    let mut app: App = SwitcherApp::with_parts(session, None, no_devices);

    app.update(Message::RefreshDevices);

    assert_eq!(app.status(), "No video devices found.");
    assert!(app.panel.selected_device(Picker::Cam1).is_none());
}
