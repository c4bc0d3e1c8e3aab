mod cli;
mod columns;
mod data;
mod detail;
mod filter;
mod float;
mod geo;
mod hint;
mod location;
mod logging;
mod picker;
mod quit;
mod sort;
mod state;
mod table;
mod terminal_check;
mod theme;
mod view;

use crate::{
    cli::{Args, LocationMode},
    location::LocationSettings,
    state::{App, LocationState},
};
use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    style::Stylize,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::stdout;

#[tokio::main]
async fn main() -> Result<()> {
    let args = <Args as clap::Parser>::parse();
    let (file, location_mode) = match args.resolve() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("\n{e}");
            std::process::exit(1);
        }
    };

    let _log_guard = args.log_file.as_deref().map(logging::init).transpose()?;

    let dataset = match data::load_dataset(&file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{} {e:#}", "[ERROR]".red().bold());
            std::process::exit(1);
        }
    };
    tracing::info!(
        cities = dataset.cities.len(),
        provinces = dataset.provinces.len(),
        file = %file.display(),
        "dataset loaded"
    );

    // Start the lookup before the terminal takes over, so the answer is
    // often already waiting when the first frames render.
    let (location, location_rx) = match location_mode {
        LocationMode::Lookup => (
            LocationState::Pending,
            Some(location::spawn_lookup(LocationSettings::default())),
        ),
        LocationMode::Fixed(coord) => (LocationState::Known(coord), None),
        LocationMode::Disabled => (LocationState::Unavailable, None),
    };

    // --- setup terminal
    let mut out = stdout();
    out.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut term = Terminal::new(CrosstermBackend::new(out))?;
    term.clear()?;

    let mut app = App::new(dataset, file, location, location_rx);
    let res = app.run(&mut term);

    // restore terminal
    disable_raw_mode()?;
    let backend = term.backend_mut();
    backend.execute(LeaveAlternateScreen)?;
    term.show_cursor()?;

    res
}
