pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fitlog_core::time::today;
use fitlog_core::{FileEntryRepository, Preferences};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::App;

pub fn run(repo: FileEntryRepository, prefs: Preferences) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(repo, prefs, today());
    app.reload();
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.poll_loads();
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Left | KeyCode::Char('h') => app.previous_day(),
                    KeyCode::Right | KeyCode::Char('l') => app.next_day(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_week(),
                    KeyCode::Down | KeyCode::Char('j') => app.next_week(),
                    KeyCode::Char('[') => app.previous_month(),
                    KeyCode::Char(']') => app.next_month(),
                    KeyCode::Char('t') => app.jump_to_today(),
                    KeyCode::Char('r') => app.reload(),
                    _ => {}
                }
            }
        }
    }
}
