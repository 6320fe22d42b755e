// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use segue::markers::{self, project};
use segue::{format_time, Setlist, StubTransport, Switcher, SwitcherState};

fn print_usage() {
    println!("SEGUE - Live Setlist Auto-Switcher");
    println!();
    println!("Usage: segue [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --check <setlist.json>            Validate a setlist and list its songs");
    println!("  --end-point <project-file>        Locate the End region in a project file");
    println!("  --simulate <setlist.json> [RATE]  Play a setlist on the simulated transport");
    println!("                                    at RATE x real time (default 60)");
    println!("  --help                            Show this help message");
}

fn check_setlist(path: &Path) -> Result<()> {
    let setlist = Setlist::load(path)?;

    println!(
        "Setlist OK: {} songs, base path {}",
        setlist.len(),
        setlist.base_path.display()
    );
    for (i, entry) in setlist.entries.iter().enumerate() {
        let resolved = setlist.resolve(&entry.path);
        let missing = if resolved.exists() { ' ' } else { '!' };
        println!("{missing} {:2}. {}  [{}]", i + 1, entry.name, resolved.display());
    }
    Ok(())
}

fn show_end_point(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)?;

    match project::find_region(&text, markers::END_MARKER_NAME) {
        Some(position) => println!("End region at {} ({position:.3}s)", format_time(position)),
        None => println!("No 'End' region found in {}", path.display()),
    }
    Ok(())
}

fn simulate(path: &Path, rate: f64) -> Result<()> {
    let transport = StubTransport::new();
    let mut switcher = Switcher::from_file(transport.clone(), path)?;

    switcher.load(0)?;
    switcher.play()?;

    println!(
        "Simulating {} songs at {rate}x real time (tick every 100ms)...",
        switcher.setlist().len()
    );
    println!("{}", switcher.status());

    let tick = Duration::from_millis(100);
    let mut last_seen = (switcher.current_index(), switcher.is_playing());
    loop {
        transport.advance(tick.as_secs_f64() * rate);
        switcher.tick()?;

        let seen = (switcher.current_index(), switcher.is_playing());
        if seen != last_seen {
            println!("{}", switcher.status());
            last_seen = seen;
        }

        if switcher.state() == SwitcherState::Finished {
            println!("Setlist complete");
            break;
        }
        if switcher.error().is_some() {
            break;
        }
        if switcher.end_position().is_none() {
            println!("Current song has no End region; stopping simulation");
            break;
        }
        thread::sleep(tick);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "segue=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("SEGUE - Live Setlist Auto-Switcher");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--check" => {
            if args.len() < 3 {
                eprintln!("Error: --check requires a setlist path");
                std::process::exit(1);
            }
            check_setlist(Path::new(&args[2]))?;
        }
        "--end-point" => {
            if args.len() < 3 {
                eprintln!("Error: --end-point requires a project file path");
                std::process::exit(1);
            }
            show_end_point(Path::new(&args[2]))?;
        }
        "--simulate" => {
            if args.len() < 3 {
                eprintln!("Error: --simulate requires a setlist path");
                std::process::exit(1);
            }
            let rate: f64 = if args.len() >= 4 {
                args[3].parse().unwrap_or(60.0)
            } else {
                60.0
            };
            simulate(Path::new(&args[2]), rate)?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
