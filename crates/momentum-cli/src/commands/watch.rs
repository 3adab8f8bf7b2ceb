//! Foreground clock loop for CLI.

use momentum_core::Coordinator;

/// Step the coordinator once a second, printing every event. Runs until
/// interrupted, or for `ticks` steps when a cap is given.
pub fn run(ticks: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let mut coordinator = Coordinator::open()?;
    let mut stepped = 0u64;

    loop {
        let now = chrono::Local::now().naive_local();
        for event in coordinator.step(now) {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        stepped += 1;
        if let Some(limit) = ticks {
            if stepped >= limit {
                break;
            }
        }
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    coordinator.shutdown()?;
    Ok(())
}
