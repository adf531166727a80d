//! yeet - move files into a holding bin, restore them, or let them expire.

mod cli;
mod prompt;

use std::process::ExitCode;

use anyhow::Context;
use yeet_core::config::CONFIG_ENV;
use yeet_core::layout::HOME_ENV;
use yeet_core::listing::render_listing;
use yeet_core::logging::init_logging;
use yeet_core::{BinLayout, Clock, Config, SystemClock, TrashBin};

use crate::cli::Invocation;

fn main() -> ExitCode {
    let mut command = cli::build_command();
    let matches = command.get_matches_mut();
    let invocation = Invocation::from_matches(&matches);

    if invocation == Invocation::Usage {
        println!("{}", command.render_usage());
        return ExitCode::SUCCESS;
    }

    match run(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation) -> anyhow::Result<()> {
    let config = Config::load()?;
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("warning: {e}");
    }
    tracing::debug!(
        config_override = ?std::env::var(CONFIG_ENV).ok(),
        ?invocation,
        "Starting yeet"
    );

    let home_override = std::env::var(HOME_ENV).ok();
    let layout = BinLayout::resolve(&config, home_override.as_deref())?;

    // One clock read per invocation; the sweep and the operation share it.
    let now = SystemClock.now();
    let bin = TrashBin::open(layout, now)?;

    let report = bin.sweep()?;
    for name in &report.expired {
        println!("[!] File '{name}' has expired and has been deleted.");
    }

    match invocation {
        Invocation::Usage => {}
        Invocation::Yeet { file } => {
            let cwd = std::env::current_dir().context("Failed to determine current directory")?;
            if let Some(outcome) = user_facing(bin.yeet(&cwd, &file))? {
                println!(
                    "Yeeted {} to {}",
                    outcome.name,
                    bin.layout().holding_dir.display()
                );
            }
        }
        Invocation::Restore { file, assume_yes } => {
            let question = format!("Are you sure you want to restore {file}?");
            if !assume_yes && !prompt::confirm_on_terminal(&question)? {
                println!("Aborted.");
                return Ok(());
            }
            if let Some(outcome) = user_facing(bin.restore(&file))? {
                println!(
                    "Restored {} to {}",
                    outcome.name,
                    outcome.destination.display()
                );
            }
        }
        Invocation::List => {
            print!("{}", render_listing(&bin.records()?));
        }
        Invocation::Empty { assume_yes } => {
            if !assume_yes
                && !prompt::confirm_on_terminal("Are you sure you want to empty the yeet bin?")?
            {
                println!("Aborted.");
                return Ok(());
            }
            bin.empty()?;
            println!("Yeet bin emptied.");
        }
    }

    Ok(())
}

/// Print user mistakes and carry on; anything else is fatal.
fn user_facing<T>(result: yeet_core::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_user_facing() => {
            tracing::debug!(error = %err, "Operation refused");
            println!("{err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn report_fatal(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
    if let Some(remediation) = err
        .downcast_ref::<yeet_core::Error>()
        .and_then(yeet_core::Error::remediation)
    {
        eprint!("\n{}", remediation.render_plain());
    }
}
