// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use video_switcher::config;

mod cli;

#[derive(Parser)]
#[command(name = "video-switcher")]
#[command(about = "Switch between two webcams on a virtual camera")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the control panel in the terminal (default)
    Terminal,

    /// List video devices
    List,

    /// Run the switcher without a UI; 1/2 on stdin switch inputs
    ///
    /// Devices not given on the command line come from saved defaults.
    Run {
        /// First camera (e.g. /dev/video0)
        #[arg(long)]
        cam1: Option<PathBuf>,

        /// Second camera
        #[arg(long)]
        cam2: Option<PathBuf>,

        /// Virtual camera output (v4l2loopback node)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Do not open a preview window
        #[arg(long)]
        no_preview: bool,
    },

    /// Manage saved defaults
    Defaults {
        #[command(subcommand)]
        action: DefaultsAction,
    },
}

#[derive(Subcommand)]
enum DefaultsAction {
    /// Print saved defaults
    Show,

    /// Save device defaults
    Save {
        #[arg(long)]
        cam1: Option<PathBuf>,

        #[arg(long)]
        cam2: Option<PathBuf>,

        #[arg(long)]
        out: Option<PathBuf>,

        /// Save with preview turned off
        #[arg(long)]
        no_preview: bool,

        /// Apply these defaults when the control panel opens
        #[arg(long)]
        autoload: bool,
    },

    /// Delete saved defaults
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The control panel owns the screen, so its logs go to a file
    let interactive = matches!(cli.command, None | Some(Commands::Terminal));
    if !interactive {
        init_logging();
    } else if std::env::var_os("RUST_LOG").is_some() {
        match init_file_logging() {
            Ok(path) => eprintln!("Logging to {}", path.display()),
            Err(e) => eprintln!("Logging disabled: {}", e),
        }
    }

    match cli.command {
        Some(Commands::Terminal) | None => video_switcher::terminal::run(),
        Some(Commands::List) => cli::list_video_devices(),
        Some(Commands::Run {
            cam1,
            cam2,
            out,
            no_preview,
        }) => cli::run_headless(cam1, cam2, out, no_preview),
        Some(Commands::Defaults { action }) => match action {
            DefaultsAction::Show => cli::show_defaults(),
            DefaultsAction::Save {
                cam1,
                cam2,
                out,
                no_preview,
                autoload,
            } => cli::save_defaults(cam1, cam2, out, !no_preview, autoload),
            DefaultsAction::Clear => cli::clear_defaults(),
        },
    }
}

// Set RUST_LOG to control log level
// Examples: RUST_LOG=debug, RUST_LOG=video_switcher=debug, RUST_LOG=info
fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn init_file_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = config::terminal_log_path()?;
    let file = config::open_log_file(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(path)
}
