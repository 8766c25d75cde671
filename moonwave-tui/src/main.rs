//! moonwave-tui - terminal demo for Moonwave
//!
//! Mounts the demo application onto the terminal and feeds it keyboard input
//! until the user quits.

use std::io::Stdout;
use std::process;

use anyhow::Context;
use clap::Parser;
use libmoonwave::Moonwave;
use ratatui::backend::CrosstermBackend;
use tokio::task::LocalSet;
use tracing::{error, info};

use moonwave_tui::{
    cli::Cli,
    demo,
    error::{Result, TuiError},
    event::EventHandler,
    root,
    terminal::{install_panic_hook, restore_terminal, setup_terminal},
    Root,
};

const POLL_INTERVAL_MS: u64 = 10;

type TerminalRoot = Root<CrosstermBackend<Stdout>>;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("Error: {:#}", e);
        let code = e.downcast_ref::<TuiError>().map(TuiError::exit_code).unwrap_or(1);
        process::exit(code);
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(LocalSet::new().run_until(run(cli)))?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;
    cli.init_logging(&settings)?;

    // Settings problems surface before the terminal is taken over
    let builder = demo::app().with_settings(&settings)?;

    install_panic_hook();
    let terminal: TerminalRoot = root(setup_terminal()?);

    let result = drive(builder, &terminal).await;

    restore_terminal(&mut terminal.borrow_mut())?;
    if let Err(e) = &result {
        error!("Demo exited with error: {}", e);
    }
    result
}

async fn drive(builder: Moonwave<TerminalRoot>, terminal: &TerminalRoot) -> Result<()> {
    let app = builder.mount(terminal.clone())?;
    let events = EventHandler::new(POLL_INTERVAL_MS);

    loop {
        let event = events.next().await?;
        let command = match demo::command_for(&event) {
            Some(command) => command,
            None => continue,
        };

        match demo::apply(&app, command) {
            Ok(true) => {}
            Ok(false) => break,
            // A bad navigation or action should not tear the demo down
            Err(e) => error!("Command failed: {}", e),
        }
    }

    app.unmount()?;
    info!("Goodbye");
    Ok(())
}
