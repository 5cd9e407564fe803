//! Single-key command console.
//!
//! Maps one key to exactly one named gesture or a utility action:
//!
//!   1 = slump → attention opener sequence
//!   2 = attention          3 = boring meeting    4 = pointing
//!   5 = nod                6 = shrug             7 = curious
//!   8 = defeated           9 = excited           0 = listening
//!   H = home posture       W = goodbye wave
//!   R = reset (release motors)                   Q = quit
//!
//! Unrecognized input is rejected without side effects and the help screen
//! is reprinted. The loop exits on `Q`, EOF, or the shared abort flag
//! (Ctrl-C); the caller always routes the exit through `disconnect`.

use std::io::Write;
use std::time::Duration;

use choreo_engine::{library, ConnectionSupervisor};
use choreo_types::{ChoreoError, GestureDefinition};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::warn;

/// Entry point for the interactive console.
///
/// `cancel` doubles as shutdown signal: when the flag is set the loop (and
/// any in-flight gesture) stops and control returns to the caller.
pub async fn run(supervisor: &mut ConnectionSupervisor, cancel: &mut watch::Receiver<bool>) {
    print_controls();

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        if *cancel.borrow() {
            break;
        }

        print!("\n{} ", "choreo>".bold().cyan());
        std::io::stdout().flush().ok();

        let line = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => {
                    eprintln!("{}: {}", "Read error".red(), e);
                    break;
                }
            },
            _ = flag_raised(cancel.clone()) => break,
        };

        let key = line.trim().to_uppercase();
        if key.is_empty() {
            continue;
        }

        match key.as_str() {
            "1" => opener_sequence(supervisor, cancel).await,
            "2" => perform(supervisor, cancel, library::attention()).await,
            "3" => perform(supervisor, cancel, library::boring_meeting()).await,
            "4" => perform(supervisor, cancel, library::pointing()).await,
            "5" => perform(supervisor, cancel, library::nod()).await,
            "6" => perform(supervisor, cancel, library::shrug()).await,
            "7" => perform(supervisor, cancel, library::curious()).await,
            "8" => perform(supervisor, cancel, library::defeated()).await,
            "9" => perform(supervisor, cancel, library::excited()).await,
            "0" => perform(supervisor, cancel, library::listening()).await,
            "H" => perform(supervisor, cancel, library::home()).await,
            "W" => perform(supervisor, cancel, library::goodbye_wave()).await,
            "R" => reset(supervisor).await,
            "Q" => {
                println!("{}", "Standing down.".green());
                break;
            }
            other => {
                println!(
                    "{} '{}'. One key per command.",
                    "Unknown command:".red(),
                    other.yellow()
                );
                print_controls();
            }
        }

        // A gesture aborted by Ctrl-C means the operator wants out.
        if *cancel.borrow() {
            break;
        }
    }
}

/// The full opener: slump, presenter cue, snap to attention.
async fn opener_sequence(
    supervisor: &mut ConnectionSupervisor,
    cancel: &mut watch::Receiver<bool>,
) {
    perform(supervisor, cancel, library::slump()).await;
    println!(
        "  {} {}",
        "[CUE]".bold().yellow(),
        "\"Everyone's worried about AI replacing them...\"".dimmed()
    );
    if !pause(Duration::from_secs(3), cancel).await {
        return;
    }
    println!(
        "  {} {}",
        "[CUE]".bold().yellow(),
        "Wave your hand: \"Stand at attention!\"".dimmed()
    );
    if !pause(Duration::from_secs(1), cancel).await {
        return;
    }
    perform(supervisor, cancel, library::attention()).await;
}

/// Power on if needed, run one gesture, report the outcome.
async fn perform(
    supervisor: &mut ConnectionSupervisor,
    cancel: &mut watch::Receiver<bool>,
    gesture: GestureDefinition,
) {
    if let Err(e) = supervisor.power_on().await {
        println!("{}: {}", "Cannot power on".red(), e);
        return;
    }

    println!("  {} {}", "▶".cyan(), gesture.name.bold());
    match supervisor.run_gesture(&gesture, cancel).await {
        Ok(report) if report.aborted => {
            println!("  {} {} interrupted", "⚠".yellow(), gesture.name);
        }
        Ok(report) => {
            let mut summary = format!("{} applied", report.applied);
            if report.skipped > 0 {
                summary.push_str(&format!(", {} skipped (absent limbs)", report.skipped));
            }
            if report.failed > 0 {
                summary.push_str(&format!(", {} failed", report.failed));
            }
            println!("  {} {} complete ({})", "✓".green(), gesture.name, summary.dimmed());
        }
        Err(e @ ChoreoError::NotPoweredOn(_)) | Err(e @ ChoreoError::NotConnected) => {
            println!("{}: {}", "Gesture refused".red(), e);
        }
        Err(e) => {
            warn!(error = %e, "unexpected gesture error");
            println!("{}: {}", "Gesture error".red(), e);
        }
    }
}

/// Release the motors; the robot goes limp but stays connected.
async fn reset(supervisor: &mut ConnectionSupervisor) {
    match supervisor.power_off_smoothly().await {
        Ok(()) => println!("  {} Motors released; robot is compliant.", "✓".green()),
        Err(e) => println!("{}: {}", "Reset failed".red(), e),
    }
}

/// Cancellable presentation pause. Returns `false` when the abort flag was
/// raised during the wait.
async fn pause(duration: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = flag_raised(cancel.clone()) => false,
    }
}

/// Resolves when the abort flag becomes `true`; never resolves if the
/// sender side is gone.
async fn flag_raised(mut rx: watch::Receiver<bool>) {
    if rx.wait_for(|flag| *flag).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn print_controls() {
    println!();
    println!("{}", "Choreo Commands".bold().underline());
    println!("  {}  opener sequence (slump → attention)", "1".bold().cyan());
    println!("  {}  snap to attention", "2".bold().cyan());
    println!("  {}  boring meeting reaction", "3".bold().cyan());
    println!("  {}  pointing at the screen", "4".bold().cyan());
    println!("  {}  nodding in agreement", "5".bold().cyan());
    println!("  {}  shrug", "6".bold().cyan());
    println!("  {}  curious", "7".bold().cyan());
    println!("  {}  defeated", "8".bold().cyan());
    println!("  {}  excited", "9".bold().cyan());
    println!("  {}  listening", "0".bold().cyan());
    println!("  {}  home posture", "H".bold().cyan());
    println!("  {}  goodbye wave", "W".bold().cyan());
    println!("  {}  reset (release motors)", "R".bold().cyan());
    println!("  {}  quit", "Q".bold().cyan());
}
