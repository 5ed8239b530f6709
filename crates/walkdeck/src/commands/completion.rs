use clap::CommandFactory;

use crate::cli::{Cli, Shell};

pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    match shell {
        Shell::Bash => {
            clap_complete::generate(
                clap_complete::shells::Bash,
                &mut cmd,
                name,
                &mut std::io::stdout(),
            );
        }
        Shell::Zsh => {
            clap_complete::generate(
                clap_complete::shells::Zsh,
                &mut cmd,
                name,
                &mut std::io::stdout(),
            );
        }
        Shell::Fish => {
            clap_complete::generate(
                clap_complete::shells::Fish,
                &mut cmd,
                name,
                &mut std::io::stdout(),
            );
        }
        Shell::Powershell => {
            clap_complete::generate(
                clap_complete::shells::PowerShell,
                &mut cmd,
                name,
                &mut std::io::stdout(),
            );
        }
    }
}
