// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! - Listing video devices
//! - Running the switcher headless, driven from stdin
//! - Managing saved defaults

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use video_switcher::backends::devices::{describe, list_devices};
use video_switcher::backends::media::GstBackend;
use video_switcher::config::{Defaults, SettingsStore};
use video_switcher::pipelines::switcher::{PreviewMode, PreviewSinkChain};
use video_switcher::selection::{Branch, DeviceRef, Selection};
use video_switcher::session::SwitcherSession;

/// List all video nodes with their V4L2 capabilities
pub fn list_video_devices() -> Result<(), Box<dyn std::error::Error>> {
    let devices = list_devices();

    if devices.is_empty() {
        println!("No video devices found.");
        return Ok(());
    }

    println!("Video devices:");
    println!();
    for device in &devices {
        match describe(device) {
            Some(info) => {
                let mut roles = Vec::new();
                if info.capture {
                    roles.push("capture");
                }
                if info.output {
                    roles.push("output");
                }
                println!("  {}  {} ({})", info.path, info.card, info.driver);
                if !roles.is_empty() {
                    println!("      Roles: {}", roles.join(", "));
                }
            }
            None => println!("  {}", device),
        }
    }

    Ok(())
}

enum Command {
    Switch(Branch),
    Quit,
}

/// Run the switcher without a UI
///
/// Reads `1`/`a` and `2`/`b` from stdin to switch inputs, `q` or Ctrl+C to
/// stop.
pub fn run_headless(
    cam1: Option<PathBuf>,
    cam2: Option<PathBuf>,
    out: Option<PathBuf>,
    no_preview: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Flags win over saved defaults
    let saved = match SettingsStore::user_default() {
        Ok(store) => store.load().unwrap_or_else(|e| {
            eprintln!("Ignoring saved defaults: {}", e);
            None
        }),
        Err(_) => None,
    }
    .unwrap_or_default();

    let selection = Selection {
        cam1: to_device_ref(cam1).or(saved.cam1),
        cam2: to_device_ref(cam2).or(saved.cam2),
        out: to_device_ref(out).or(saved.out),
    };
    let preview = if saved.preview && !no_preview {
        PreviewMode::Enabled(PreviewSinkChain::windowed())
    } else {
        PreviewMode::Disabled
    };

    let mut session = SwitcherSession::new(GstBackend::new()?);
    let report = session.start(&selection, &preview)?;

    println!("Switcher running: {} active", Branch::A);
    if !report.status_message().is_empty() {
        println!("{}", report.status_message());
    }
    println!("Press 1/2 to switch inputs, q or Ctrl+C to stop");

    let (sender, receiver) = mpsc::channel();

    let ctrlc_sender = sender.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_sender.send(Command::Quit);
    })?;

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = match line.trim() {
                "1" | "a" => Command::Switch(Branch::A),
                "2" | "b" => Command::Switch(Branch::B),
                "q" => Command::Quit,
                _ => continue,
            };
            if sender.send(command).is_err() {
                return;
            }
        }
        // stdin closed
        let _ = sender.send(Command::Quit);
    });

    loop {
        if let Some(message) = session.poll() {
            return Err(message.into());
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(Command::Switch(branch)) => match session.switch_to(branch) {
                Ok(()) => println!("{} active", branch),
                Err(e) => eprintln!("{}", e),
            },
            Ok(Command::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }

    println!("Stopping...");
    session.stop();
    Ok(())
}

fn to_device_ref(path: Option<PathBuf>) -> Option<DeviceRef> {
    path.map(|p| DeviceRef::new(p.to_string_lossy().into_owned()))
}

fn store() -> Result<SettingsStore, Box<dyn std::error::Error>> {
    Ok(SettingsStore::user_default()?)
}

/// Print saved defaults
pub fn show_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let store = store()?;
    match store.load()? {
        Some(defaults) => {
            println!("Defaults ({}):", store.path().display());
            print_device("Cam 1", defaults.cam1.as_ref());
            print_device("Cam 2", defaults.cam2.as_ref());
            print_device("Virtual Out", defaults.out.as_ref());
            println!("  Preview:     {}", defaults.preview);
            println!("  Auto-load:   {}", defaults.autoload);
        }
        None => println!("No defaults saved."),
    }
    Ok(())
}

fn print_device(label: &str, device: Option<&DeviceRef>) {
    let label = format!("{}:", label);
    match device {
        Some(device) => println!("  {:<12} {}", label, device),
        None => println!("  {:<12} (none)", label),
    }
}

/// Save defaults given on the command line
pub fn save_defaults(
    cam1: Option<PathBuf>,
    cam2: Option<PathBuf>,
    out: Option<PathBuf>,
    preview: bool,
    autoload: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = Defaults {
        cam1: to_device_ref(cam1),
        cam2: to_device_ref(cam2),
        out: to_device_ref(out),
        preview,
        autoload,
    };

    let store = store()?;
    store.save(&defaults)?;
    println!("Defaults saved to {}", store.path().display());
    Ok(())
}

pub fn clear_defaults() -> Result<(), Box<dyn std::error::Error>> {
    store()?.clear()?;
    println!("Defaults cleared.");
    Ok(())
}
