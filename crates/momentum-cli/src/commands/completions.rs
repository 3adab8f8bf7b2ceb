//! Shell completion generation for CLI.

use clap::CommandFactory;

pub fn run(shell: clap_complete::Shell) -> Result<(), Box<dyn std::error::Error>> {
    let mut command = crate::Cli::command();
    clap_complete::generate(shell, &mut command, "momentum-cli", &mut std::io::stdout());
    Ok(())
}
