//! Countdown timer commands for CLI.

use clap::Subcommand;
use momentum_core::{Coordinator, Event, TimerState};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a micro-action countdown in the foreground
    Run {
        /// Outcome to mint today's action for (defaults to today's open action)
        #[arg(long)]
        outcome_id: Option<String>,
    },
    /// Run the wind-down countdown in the foreground
    WindDown,
    /// Print the current ritual and timer snapshot as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::open()?;
    let now = chrono::Local::now().naive_local();

    match action {
        TimerAction::Run { outcome_id } => {
            let events = match outcome_id {
                Some(outcome_id) => {
                    let (minted, events) = coordinator.start_micro_action(&outcome_id, now)?;
                    println!("Micro-action minted: {}", minted.label);
                    events
                }
                None => {
                    let open = coordinator
                        .db()
                        .open_action_on(now.date())?
                        .ok_or("no open micro-action today")?;
                    println!("Resuming: {}", open.label);
                    coordinator.start_action_timer(&open, now)
                }
            };
            print_events(&events)?;
            run_countdown(&mut coordinator)?;
        }
        TimerAction::WindDown => {
            if let Some(event) = coordinator.start_wind_down_timer(now) {
                print_events(&[event])?;
            }
            run_countdown(&mut coordinator)?;
        }
        TimerAction::Status => {
            // Touch the clock first so the snapshot is current
            let events = coordinator.step(now);
            print_events(&events)?;
            let snapshot = coordinator.scheduler().snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    coordinator.shutdown()?;
    Ok(())
}

/// Drive the clock once a second until the countdown leaves the
/// running/paused states.
fn run_countdown(coordinator: &mut Coordinator) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
        let now = chrono::Local::now().naive_local();
        let events = coordinator.step(now);
        print_events(&events)?;

        match coordinator.scheduler().timer().state() {
            TimerState::Running | TimerState::Paused => {}
            _ => break,
        }
    }
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}
