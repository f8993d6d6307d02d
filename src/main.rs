use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use scry::ui::{Action, App};
use scry::{config::Config, monitor::MetricKind, theme, upgrade, Cli};

enum Outcome {
    Quit,
    Upgrade,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli)?;
    let Some(theme) = theme::lookup(&config.theme) else {
        eprintln!("The theme '{}' does not exist.", config.theme);
        eprintln!("Available themes: {}", theme::available());
        std::process::exit(1);
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), theme);
    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(Outcome::Upgrade) => {
            if let Err(err) = upgrade::install(&config.theme) {
                eprintln!("Upgrade failed: {err}");
            }
        }
        Ok(Outcome::Quit) => {}
        Err(err) => println!("{:?}", err),
    }

    Ok(())
}

/// The single serializing task: every timer callback and input handler
/// runs to completion here, one at a time, so the shared state needs no
/// locking. The event wait is bounded by the earliest pending deadline.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<Outcome> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    if app.config.upgrade_check {
        upgrade::spawn_check(tx.clone());
    }

    app.monitor.poll_all();
    app.set_area(terminal.size()?);

    loop {
        let now = Instant::now();

        if app.scheduler.quit_due(now) {
            app.scheduler.cancel_all();
            return Ok(Outcome::Quit);
        }

        // Results from the background version probe apply serially here.
        while let Ok(version) = rx.try_recv() {
            app.set_upgrade_notice(version);
        }

        for kind in MetricKind::ALL {
            if app.scheduler.poll_due(kind, now) {
                app.monitor.poll(kind);
            }
        }

        if app.scheduler.upgrade_check_due(now) {
            upgrade::spawn_check(tx.clone());
        }

        if app.scheduler.selection_reset_due(now) {
            app.reset_selection();
        }

        if app.scheduler.redraw_due(now) {
            app.on_redraw(now);
            terminal.draw(|frame| app.render(frame))?;
        }

        let timeout = app
            .scheduler
            .next_deadline(now)
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_millis(50));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match app.handle_key(key, Instant::now()) {
                    Action::Quit => return Ok(Outcome::Quit),
                    Action::Upgrade => return Ok(Outcome::Upgrade),
                    Action::None => {}
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                Event::Resize(width, height) => {
                    // Geometry is derived from the area, so a resize only
                    // needs a synchronous repaint with the new size.
                    app.set_area(Rect::new(0, 0, width, height));
                    app.on_redraw(Instant::now());
                    terminal.draw(|frame| app.render(frame))?;
                }
                _ => {}
            }
        }
    }
}
