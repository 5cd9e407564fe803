//! `choreo-cli` – interactive gesture console.
//!
//! This binary is the front end for the choreography engine. It:
//!
//! 1. Loads `~/.choreo/config.toml` (writing defaults on first run).
//! 2. Connects to the robot — the only fatal failure point; on error the
//!    process exits non-zero without attempting any gesture.
//! 3. Powers on, goes to the home posture, and drops into the single-key
//!    command loop.
//! 4. Intercepts **Ctrl-C** to cancel any in-flight gesture and exit
//!    through the supervisor's shutdown path, so the robot is never left
//!    powered and abandoned.

mod config;
mod console;

use choreo_engine::choreographer::abort_channel;
use choreo_engine::{library, ConnectionSupervisor};
use choreo_hal::sim::SimDriver;
use colored::Colorize;
use tracing::warn;

#[tokio::main]
async fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set CHOREO_LOG_FORMAT=json to emit newline-delimited JSON logs.
    // The console's user-facing output still uses println! for UX.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("CHOREO_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  First run – defaults written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Could not write config".red(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {} – using defaults", "Config error".red(), e);
            config::Config::default()
        }
    };

    // ── Abort flag + Ctrl-C handler ───────────────────────────────────────
    let (abort_tx, mut abort_rx) = abort_channel();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!(
            "{}",
            "⚠  Ctrl-C received – cancelling and shutting down …".yellow().bold()
        );
        let _ = abort_tx.send(true);
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler; graceful abort unavailable");
    }

    // ── Connect ───────────────────────────────────────────────────────────
    if !cfg.sim {
        println!(
            "  {} No hardware driver is built in; using the simulated robot.",
            "Note:".yellow()
        );
    }
    let driver = SimDriver::full_with_time_scale(cfg.time_scale);
    let mut supervisor = ConnectionSupervisor::new(Box::new(driver));

    print!("  Connecting to {} … ", cfg.address.dimmed());
    match supervisor.connect(&cfg.address).await {
        Ok(()) => {
            println!("{}", "connected".green());
            if let Some(registry) = supervisor.registry() {
                println!(
                    "  Channels present: {}",
                    registry.present_channels().join(", ").bold()
                );
            }
        }
        Err(e) => {
            println!("{}", "failed".red());
            eprintln!("\n{}: {}", "Connection error".red().bold(), e);
            eprintln!("  No gestures were attempted.");
            std::process::exit(1);
        }
    }

    // ── Start in the home posture ─────────────────────────────────────────
    if let Err(e) = supervisor.power_on().await {
        println!("{}: {}", "Power-on failed".red(), e);
    } else if let Ok(report) = supervisor.run_gesture(&library::home(), &mut abort_rx).await {
        if !report.aborted {
            println!("  {} Home position.", "✓".green());
        }
    }

    // ── Command loop ──────────────────────────────────────────────────────
    console::run(&mut supervisor, &mut abort_rx).await;

    // ── Shutdown path: every exit routes through disconnect ───────────────
    supervisor.disconnect().await;
    println!("\n{}", "✓ Robot released and disconnected. Goodbye.".green());
}

fn print_banner() {
    println!();
    println!("{}", r#"       __                        "#.bold().cyan());
    println!("{}", r#"  ____/ /  ___  _______ ___      "#.bold().cyan());
    println!("{}", r#" / __/ _ \/ _ \/ __/ -_) _ \     "#.bold().cyan());
    println!("{}", r#" \__/_//_/\___/_/  \__/\___/     "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Choreo".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Motion choreography console for expressive robots");
    println!();
}
