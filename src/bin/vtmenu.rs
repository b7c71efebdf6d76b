// src/bin/vtmenu.rs

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::*;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use vtmenu::{
    CancellationToken,
    cli::{
        Cli,
        controller::{MenuContext, MenuController},
        input::EditorLines,
        render,
    },
    core::{config_loader, paths},
    system::executor::SystemLauncher,
    t,
};

/// Sets up logging, parses arguments, runs the menu, and reports any fatal error.
fn main() {
    env_logger::init();
    let cancellation_token: CancellationToken = Arc::new(AtomicBool::new(false));

    if let Err(e) = run_cli(Cli::parse(), cancellation_token) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli, cancellation_token: CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let settings_path = paths::resolve_settings_path(cli.settings.as_deref())?;
    let report = config_loader::load_menu_file(&settings_path)?.into_report();

    for skipped in &report.skipped {
        eprintln!(
            "{}",
            format!(
                t!("load.skipped"),
                title = skipped.title,
                reason = skipped.source
            )
            .yellow()
        );
    }
    if cli.check || !report.skipped.is_empty() {
        eprintln!(
            t!("load.summary"),
            loaded = report.menu.len(),
            total = report.total
        );
    }

    let context = MenuContext {
        title: cli.effective_title(report.title.as_deref()),
        menu: report.menu,
        columns: cli.columns,
    };

    if context.menu.is_empty() {
        bail!("{}", format!(t!("load.nothing"), path = settings_path.display()));
    }

    if cli.check {
        let mut stdout = io::stdout().lock();
        render::render_menu(&mut stdout, &context.title, &context.menu, context.columns)?;
        return Ok(());
    }

    // At the prompt the line editor reports Ctrl+C itself. While a child runs, the
    // child sees the interrupt and the menu only takes note.
    let token = cancellation_token.clone();
    ctrlc::set_handler(move || {
        token.store(true, Ordering::SeqCst);
    })
    .context("Failed to install the Ctrl+C handler")?;

    let lines = EditorLines::new().context("Failed to start the line editor")?;
    let mut controller = MenuController::new(context, lines, io::stdout(), SystemLauncher)
        .with_interrupt(cancellation_token);
    controller.run().context("Lost contact with the terminal")?;
    Ok(())
}
