// SPDX-License-Identifier: GPL-3.0-only

//! Terminal control panel
//!
//! Draws the device pickers, option toggles and action hints, one row each,
//! with a status line at the bottom. The preview, when enabled, opens in its
//! own window since a terminal cannot host an embedded video surface.

use crate::app::{Field, Message, Picker, SwitcherApp};
use crate::backends::media::{GstBackend, MediaBackend};
use crate::config::SettingsStore;
use crate::constants::{SWITCH_VIDEO_CONTRACT, app_info, timing};
use crate::pipelines::switcher::PreviewSinkChain;
use crate::selection::{AccessProbe, Branch};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use tracing::{info, warn};

/// Run the terminal control panel
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let backend = GstBackend::new()?;
    let store = SettingsStore::user_default()
        .inspect_err(|e| warn!(error = %e, "Defaults unavailable"))
        .ok();

    let mut app = SwitcherApp::new(backend, store);
    app.set_preview_sinks(PreviewSinkChain::windowed());
    app.launch();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Pipeline goes down before the terminal is restored
    app.update(Message::Close);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: MediaBackend, A: AccessProbe>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut SwitcherApp<B, A>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(devices = app.panel.devices().len(), "Control panel ready");

    loop {
        app.tick();

        terminal.draw(|f| {
            let area = f.area();

            let panel_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            f.render_widget(PanelWidget { app: &*app }, panel_area);

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            let message = if app.status().is_empty() {
                app.preview_note()
            } else {
                app.status()
            };
            f.render_widget(StatusBar { message }, status_area);
        })?;

        if event::poll(timing::UI_TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Tab | KeyCode::Down => app.panel.focus_next(),
                KeyCode::BackTab | KeyCode::Up => app.panel.focus_prev(),
                KeyCode::Left => app.panel.adjust(-1),
                KeyCode::Right | KeyCode::Char(' ') => app.panel.adjust(1),
                KeyCode::Char('r') => app.update(Message::RefreshDevices),
                KeyCode::Char('s') | KeyCode::Enter if app.can_start() => {
                    app.update(Message::Start)
                }
                KeyCode::Char('x') if app.can_stop() => app.update(Message::Stop),
                KeyCode::Char('1') if app.can_switch() => app.update(Message::SwitchTo(Branch::A)),
                KeyCode::Char('2') if app.can_switch() => app.update(Message::SwitchTo(Branch::B)),
                KeyCode::Char('d') => app.update(Message::SaveDefaults),
                KeyCode::Char('c') => app.update(Message::ClearDefaults),
                _ => {}
            }
        }
    }

    Ok(())
}

struct PanelWidget<'a, B: MediaBackend, A: AccessProbe> {
    app: &'a SwitcherApp<B, A>,
}

impl<B: MediaBackend, A: AccessProbe> Widget for PanelWidget<'_, B, A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let panel = &self.app.panel;
        let normal = Style::default();
        let focused = Style::default().add_modifier(Modifier::REVERSED);
        let dim = Style::default().fg(Color::DarkGray);

        let mut lines: Vec<(String, Style)> = vec![
            (
                format!("Video Switcher {}", app_info::version()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            (format!("Output format: {}", SWITCH_VIDEO_CONTRACT), dim),
            (String::new(), normal),
        ];

        for field in Field::ALL {
            let text = match field {
                Field::Picker(picker) => {
                    let device = panel
                        .selected_device(picker)
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "(none)".to_string());
                    format!("{:<13} < {} >", picker.label(), device)
                }
                Field::Preview => format!("{:<13} [{}]", "Preview:", check(panel.preview)),
                Field::Autoload => {
                    format!("{:<13} [{}]", "Auto-load:", check(panel.autoload))
                }
            };
            let style = if panel.focused() == field {
                focused
            } else {
                normal
            };
            lines.push((text, style));
        }

        lines.push((String::new(), normal));
        lines.push((state_line(self.app), normal));
        lines.push((String::new(), normal));
        lines.push((hint_line(self.app), dim));
        lines.push((
            "d save defaults | c clear defaults | r refresh | q quit".to_string(),
            dim,
        ));

        for (row, (text, style)) in lines.iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.y + area.height {
                break;
            }
            buf.set_stringn(area.x + 1, y, text, area.width.saturating_sub(1) as usize, *style);
        }
    }
}

fn check(on: bool) -> char {
    if on { 'x' } else { ' ' }
}

fn state_line<B: MediaBackend, A: AccessProbe>(app: &SwitcherApp<B, A>) -> String {
    match app.session().active_input() {
        Some(branch) => {
            let device = match branch {
                Branch::A => app.panel.selected_device(Picker::Cam1),
                Branch::B => app.panel.selected_device(Picker::Cam2),
            };
            match device {
                Some(device) => format!("Running: {} ({})", branch, device),
                None => format!("Running: {}", branch),
            }
        }
        None => "Stopped".to_string(),
    }
}

fn hint_line<B: MediaBackend, A: AccessProbe>(app: &SwitcherApp<B, A>) -> String {
    if app.can_switch() {
        "1 Cam 1 | 2 Cam 2 | x stop".to_string()
    } else {
        "Tab/Up/Down move | Left/Right change | Space toggle | s start".to_string()
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
