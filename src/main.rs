//! Pollmeter - input device polling rate and latency monitor
//!
//! One sampler thread per enumerated device measures event throughput over
//! rolling windows; this frontend polls the collector on its own cadence and
//! renders a panel per device.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode as CtKeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pollmeter::{
    config::Config,
    device::{enumerate_sources, DeviceError},
    engine::Supervisor,
    ui::{App, AppState, DevicePanel, GuidePanel, StatusBar, ThemeColors},
};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load().unwrap_or_default();

    // Enumerate once and spin up one sampler per device before touching the
    // terminal, so a deviceless start exits with a plain message.
    let sources = enumerate_sources(&config.sampling);
    let supervisor = match Supervisor::start(sources, &config.sampling) {
        Ok(supervisor) => supervisor,
        Err(DeviceError::NoDevicesFound) => {
            println!("No input devices found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let collector = supervisor.collector();

    // SIGINT flips a flag so the main loop can restore the terminal and stop
    // the samplers instead of dying inside the alternate screen
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::Relaxed))?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), supervisor.devices());
    let colors = ThemeColors::from_theme(config.ui.theme);
    let tick_rate = config.refresh_interval();

    loop {
        // Pull the latest window per device; samplers publish at most one per
        // window so this stays cheap at any refresh rate
        for device_index in 0..app.panels.len() {
            if let Some(measurement) = collector.poll(device_index) {
                app.apply_measurement(measurement);
            }
        }

        // Surface terminal per-device conditions without touching siblings
        while let Some(notice) = supervisor.try_notice() {
            app.mark_lost(notice.device_index);
            app.set_status(notice.error.to_string());
        }

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            let mut constraints: Vec<Constraint> =
                app.panels.iter().map(|_| Constraint::Length(7)).collect();
            let guide_slot = constraints.len();
            if app.show_guide {
                constraints.push(Constraint::Length(15));
            }
            constraints.push(Constraint::Min(0));
            constraints.push(Constraint::Length(1)); // Status bar

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(size);

            for (i, panel) in app.panels.iter().enumerate() {
                frame.render_widget(DevicePanel::new(panel, &colors), chunks[i]);
            }

            if app.show_guide {
                frame.render_widget(GuidePanel::new(&colors), chunks[guide_slot]);
            }

            let state_str = match app.state {
                AppState::Running => "RUNNING",
                AppState::Quitting => "QUITTING",
            };
            let elapsed = app.elapsed_formatted();
            let status = StatusBar::new(state_str, app.panels.len(), &elapsed, app.windows_received)
                .message(app.get_status());
            frame.render_widget(status, chunks[chunks.len() - 1]);
        })?;

        // Handle terminal events (for navigation/control)
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    CtKeyCode::Char('q') | CtKeyCode::Esc => app.quit(),
                    CtKeyCode::Char('g') => app.toggle_guide(),
                    CtKeyCode::Char('r') => {
                        app.reset_peaks();
                        app.set_status("Session peaks reset".to_string());
                    }
                    CtKeyCode::Char('e') => {
                        let filename = format!(
                            "pollmeter_snapshot_{}.json",
                            chrono::Utc::now().format("%Y%m%d_%H%M%S")
                        );
                        match app.export_snapshot(filename.as_ref()) {
                            Ok(()) => {}
                            Err(e) => app.set_status(format!("Export failed: {}", e)),
                        }
                    }
                    _ => {}
                }
            }
        }

        if interrupted.load(Ordering::Relaxed) {
            app.quit();
        }

        if app.state == AppState::Quitting {
            break;
        }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Returns only after every sampler has stopped and released its device
    supervisor.shutdown();

    println!("\nPollmeter session complete.");
    println!("Devices monitored: {}", app.panels.len());
    println!("Measurement windows received: {}", app.windows_received);
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}
