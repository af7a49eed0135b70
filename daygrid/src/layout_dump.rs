//! daygrid-layout - print the computed day grid without a terminal UI
//!
//! Useful for scripting and for checking how a session file will be laid out.

mod input;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use daygrid_core::{build_day, build_week, time::to_time_string, DayModel};

use crate::input::InputArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "daygrid-layout")]
#[command(about = "Print the positioned sessions for a day or week")]
#[command(version)]
struct Args {
    #[command(flatten)]
    input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print seven days starting at the selected date
    #[arg(long)]
    week: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = args.input.load_config()?;

    // Initialize logging
    let _log_guard =
        daygrid_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let loaded = args.input.load(config)?;
    let projection = loaded
        .config
        .layout
        .projection()
        .context("invalid layout configuration")?;

    let days = if args.week {
        build_week(&loaded.sessions, loaded.date, &projection)
    } else {
        build_day(&loaded.sessions, loaded.date, &projection).map(|day| vec![day])
    }
    .context("failed to lay out sessions")?;

    match args.format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&days).context("failed to serialize layout")?;
            println!("{}", json);
        }
        Format::Text => {
            for day in &days {
                print_day(day);
            }
        }
    }

    Ok(())
}

fn print_day(day: &DayModel) {
    println!("{}", day.date.format("%A %Y-%m-%d"));

    if day.model.is_empty() {
        println!("  (no sessions)");
        return;
    }

    for positioned in day.model.iter() {
        // Mark sessions laid out with a stretched end time
        let marker = if positioned.span.normalized { "*" } else { "" };
        println!(
            "  {:<16} {}-{}{:<2} col {}/{}  top {:>7.1}  height {:>6.1}  {}",
            positioned.id().as_str(),
            positioned.session.start_time,
            to_time_string(i64::from(positioned.span.end)),
            marker,
            positioned.offset + 1,
            positioned.group_size,
            positioned.geometry.top,
            positioned.geometry.height,
            positioned.session.display.title,
        );
    }
}
