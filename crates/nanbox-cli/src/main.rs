// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT
//
// main.rs:

mod command;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use command::{evaluate, parse_line, resolve_radix, Kind, Radix, Request};
use config::Config;
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Box values into 64-bit words and decode words back.
///
/// Settings are read from `NANBOX_RADIX` (`hex` or `bin`) and `NANBOX_HISTORY`
/// (REPL history file).
#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    #[clap(long, value_enum)]
    radix: Option<Radix>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Box a value and print its word
    Encode {
        #[clap(value_enum)]
        kind: Kind,
        value: Option<String>,
    },
    /// Decode a word (`0x` hex, `0b` binary, or decimal)
    Decode { word: String },
    /// Interactive prompt
    Repl,
}

fn setting(settings: &Config, key: &str) -> Option<String> {
    settings.get_string(key).ok()
}

fn run(request: &Request, radix: Radix) -> Result<()> {
    debug!(?request, "evaluating");
    let report = evaluate(request)?;
    println!("{}", report.display(radix));
    Ok(())
}

fn repl(radix: Radix, history: Option<String>) -> Result<()> {
    println!(
        "{} © 2025 Huly Labs • {}",
        "NaNBox".bold(),
        "https://hulylabs.com".underline()
    );
    println!("Type {} or press Ctrl+D to exit\n", ":quit".red().bold());

    let mut rl = DefaultEditor::new()?;
    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            debug!(%path, "no previous history");
        }
    }

    loop {
        match rl.readline("nanbox ❯ ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str())?;
                if line.trim() == ":quit" {
                    break;
                }

                match parse_line(&line).and_then(|request| {
                    debug!(?request, "evaluating");
                    evaluate(&request)
                }) {
                    Ok(report) => println!("{}: {}", "OK".green(), report.display(radix)),
                    Err(err) => eprintln!("{}: {:#}", "ERR".red().bold(), err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(path) = &history {
        rl.save_history(path)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let settings = Config::builder()
        .add_source(config::Environment::with_prefix("NANBOX"))
        .build()?;

    let radix = resolve_radix(args.radix, setting(&settings, "radix").as_deref())?;

    match args.command.unwrap_or(Command::Repl) {
        Command::Encode { kind, value } => run(&Request::Encode { kind, value }, radix),
        Command::Decode { word } => run(&Request::Decode { word }, radix),
        Command::Repl => repl(radix, setting(&settings, "history")),
    }
}
