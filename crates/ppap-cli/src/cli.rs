//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

const ABOUT: &str = "This is a CLI program that creates a ZIP file with a password.";

const AFTER_HELP: &str = "\
Without -p the password is read from ~/.ppaprc (key `password`), or a
random one is generated and printed.

Please report issues at https://github.com/satosystems/ppap/issues";

#[derive(Parser, Debug)]
#[command(name = "ppap")]
#[command(about = ABOUT, after_help = AFTER_HELP)]
#[command(override_usage = "ppap [-h] [-p] [-v] FILE/DIR [FILE/DIR ...]")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Input password interactively
    #[arg(short, long)]
    pub password: bool,

    /// Show version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Files and directories to archive
    #[arg(value_name = "FILE/DIR")]
    pub paths: Vec<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags_and_paths() {
        let cli = Cli::try_parse_from(["ppap", "-p", "a.txt", "dir"]).unwrap();
        assert!(cli.password);
        assert!(!cli.version);
        assert_eq!(cli.paths, vec![PathBuf::from("a.txt"), PathBuf::from("dir")]);
    }

    #[test]
    fn test_paths_are_optional() {
        let cli = Cli::try_parse_from(["ppap"]).unwrap();
        assert!(cli.paths.is_empty());
    }

    #[test]
    fn test_long_version_flag() {
        let cli = Cli::try_parse_from(["ppap", "--version"]).unwrap();
        assert!(cli.version);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Cli::try_parse_from(["ppap", "--bogus"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
