use std::io::{self, BufRead, Write};

use anyhow::Result;
use tribunal_core::{config::Config, CaseRecord, SimulationMode};

use crate::{
    output::{self, Color, Palette},
    session,
};

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn choose_mode(p: &Palette) -> Result<Option<SimulationMode>> {
    println!("\n{}", p.paint("Simulation Modes:", Color::Blue));
    println!("1. Quick (up to 8 rounds)");
    println!("2. Standard (up to 15 rounds)");
    println!("3. Comprehensive (up to 25 rounds)");
    let Some(choice) = prompt("Select mode (1-3): ")? else {
        return Ok(None);
    };
    let mode = match choice.as_str() {
        "1" => SimulationMode::Quick,
        "2" | "" => SimulationMode::Standard,
        "3" => SimulationMode::Comprehensive,
        _ => {
            println!("{}", p.paint("❌ Invalid mode selection", Color::Red));
            return Ok(None);
        },
    };
    Ok(Some(mode))
}

/// Menu loop; returns when the user exits or stdin closes.
pub async fn run(config: &Config, palette: Palette, catalog: &[CaseRecord]) -> Result<()> {
    loop {
        println!("\n{}", "=".repeat(60));
        println!("{}", palette.paint("INTERACTIVE MODE", Color::Bold));
        println!("{}", "=".repeat(60));
        println!("\n{}", palette.paint("Available Options:", Color::Blue));
        println!("1. List available cases");
        println!("2. Run simulation");
        println!("3. Check system status");
        println!("4. View configuration");
        println!("5. Exit");

        let Some(choice) = prompt("\nSelect option (1-5): ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => output::case_list(&palette, catalog),
            "2" => {
                let Some(case_id) = prompt("Enter case ID: ")? else {
                    return Ok(());
                };
                if let Err(e) = tribunal_cases::find_case(catalog, &case_id) {
                    println!("{}", palette.paint(&format!("❌ {e}"), Color::Red));
                    continue;
                }
                let Some(mode) = choose_mode(&palette)? else {
                    continue;
                };
                session::run_simulation(config, palette, catalog, &case_id, mode, None).await?;
            },
            "3" => output::status(&palette, config),
            "4" => output::config_summary(&palette, config),
            "5" => {
                println!("{}", palette.paint("👋 Goodbye!", Color::Green));
                return Ok(());
            },
            _ => println!("{}", palette.paint("❌ Invalid option", Color::Red)),
        }
    }
}
