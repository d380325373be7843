// Console entry point: scan every display and print the size report.
//
// `--json` switches to machine-readable output. RUST_LOG=debug shows the
// per-source query trail.

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let json = std::env::args().any(|arg| arg == "--json");

    let reports = truedpi::report::scan_displays()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("=== MONITOR PHYSICAL SIZE REPORT ===");
    println!();
    for report in &reports {
        print!("{report}");
    }
    Ok(())
}

#[cfg(not(windows))]
fn main() {
    eprintln!("truedpi queries Windows display APIs and only runs on Windows.");
    std::process::exit(1);
}
