use std::fs::File;
use std::io::{self, Write};
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

use scripture_tui::api::{BibleClient, BlockingClient};
use scripture_tui::app::App;
use scripture_tui::config::Config;
use scripture_tui::event::TerminalEvents;
use scripture_tui::render::driver::{restore_terminal, ring_bell};
use scripture_tui::render::TerminalSurface;

const LOG_ENV: &str = "SCRIPTURE_TUI_LOG";
const DEFAULT_LOG_PATH: &str = "/tmp/scripture-tui.log";

fn main() -> ExitCode {
    if let Err(err) = setup_log() {
        eprintln!("logging disabled: {err:#}");
    }

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            restore_terminal();
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07").and_then(|()| stdout.flush());
            log::error!("{err:#}");
            eprintln!("scripture-tui: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// The terminal belongs to the UI, so logs go to a file.
fn setup_log() -> Result<()> {
    let path = std::env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run() -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load(&config_path)?;
    log::info!("starting at {} {} ({})", config.book, config.chapter, config.translation);

    let client = BibleClient::public()
        .context("building http client")?
        .on_throttle(ring_bell);
    let content = BlockingClient::new(client).context("starting runtime")?;
    let surface = TerminalSurface::open().context("opening terminal")?;

    let mut app = App::new(surface, content, config, Some(config_path));
    app.start();
    let result = app.run(&mut TerminalEvents);

    app.into_surface().close().context("restoring terminal")?;
    result?;
    Ok(())
}
