//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use apigen_core::cli::ExitCode;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use apigen_cli::commands::completions;
/// use clap::Command;
/// use clap_complete::Shell;
///
/// let mut cmd = Command::new("apigen").subcommand(Command::new("generate"));
/// let mut script = Vec::new();
/// completions::write_completions(Shell::Bash, &mut cmd, &mut script);
/// assert!(String::from_utf8(script).unwrap().contains("apigen"));
/// ```
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature uniform across commands.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("Generating {shell} completions");
    write_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut cmd = Command::new("apigen")
            .subcommand(Command::new("generate"))
            .subcommand(Command::new("inspect"));
        let mut out = Vec::new();
        write_completions(shell, &mut cmd, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("generate"));
        assert!(bash.contains("inspect"));
    }

    #[test]
    fn test_other_shells_produce_output() {
        for shell in [Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            assert!(!script(shell).is_empty());
        }
    }
}
