use clap::CommandFactory;
use clap_complete::shells;

use crate::cli::{Cli, Shell};

pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    let mut out = std::io::stdout();
    match shell {
        Shell::Bash => clap_complete::generate(shells::Bash, &mut cmd, "glimmer", &mut out),
        Shell::Zsh => clap_complete::generate(shells::Zsh, &mut cmd, "glimmer", &mut out),
        Shell::Fish => clap_complete::generate(shells::Fish, &mut cmd, "glimmer", &mut out),
        Shell::Powershell => {
            clap_complete::generate(shells::PowerShell, &mut cmd, "glimmer", &mut out)
        }
    }
}
