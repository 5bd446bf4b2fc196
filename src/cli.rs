// src/cli.rs
//! CLI definitions for depmatrix
//!
//! Every option also reads the environment variable a GitHub Action passes
//! its inputs through, so the binary runs unchanged as an action entrypoint.
//! The command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use depmatrix::RawInputs;

#[derive(Parser)]
#[command(name = "depmatrix")]
#[command(author = "Depmatrix Contributors")]
#[command(version)]
#[command(about = "Generate test matrices over the compatible versions of Python dependencies", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub inputs: InputArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options for case generation
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Project directory holding pyproject.toml or setup.py
    #[arg(short, long, env = "INPUT_PATH")]
    pub path: Option<String>,

    /// Maximum number of cases to emit (0 or empty for no limit)
    #[arg(short, long, env = "INPUT_MAX_CASES")]
    pub max_cases: Option<String>,

    /// Candidate selection: "full" or "first-last"
    #[arg(long, env = "INPUT_MODE")]
    pub mode: Option<String>,

    /// Seed for reproducible case sampling
    #[arg(long, env = "INPUT_SEED")]
    pub seed: Option<String>,

    /// Base URL of a PyPI-compatible JSON API
    #[arg(long, env = "INPUT_INDEX_URL")]
    pub index_url: Option<String>,

    /// File receiving the case list as a step output
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<String>,
}

impl From<InputArgs> for RawInputs {
    fn from(args: InputArgs) -> Self {
        RawInputs {
            path: args.path,
            max_cases: args.max_cases,
            mode: args.mode,
            seed: args.seed,
            index_url: args.index_url,
            output_file: args.output_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_inputs() {
        let cli = Cli::try_parse_from([
            "depmatrix",
            "--path",
            "proj",
            "--max-cases",
            "5",
            "--mode",
            "first-last",
            "--seed",
            "7",
        ])
        .unwrap();
        assert!(cli.command.is_none());

        let raw = RawInputs::from(cli.inputs);
        assert_eq!(raw.path.as_deref(), Some("proj"));
        assert_eq!(raw.max_cases.as_deref(), Some("5"));
        assert_eq!(raw.mode.as_deref(), Some("first-last"));
        assert_eq!(raw.seed.as_deref(), Some("7"));
    }

    const ENV_CHILD: &str = "DEPMATRIX_CLI_ENV_CHILD";

    /// Action inputs arrive as environment variables; the assertions run in a
    /// child copy of this test binary so the parent environment is untouched.
    #[test]
    fn test_inputs_from_action_environment() {
        if std::env::var_os(ENV_CHILD).is_some() {
            let cli = Cli::try_parse_from(["depmatrix", "--seed", "3"]).unwrap();
            let raw = RawInputs::from(cli.inputs);
            assert_eq!(raw.max_cases.as_deref(), Some("4"));
            assert_eq!(raw.mode.as_deref(), Some("first-last"));
            assert_eq!(raw.output_file.as_deref(), Some("/tmp/github_output"));
            // Flags win over the environment
            assert_eq!(raw.seed.as_deref(), Some("3"));
            assert_eq!(raw.path, None);
            return;
        }

        let output = std::process::Command::new(std::env::current_exe().unwrap())
            .args([
                "cli::tests::test_inputs_from_action_environment",
                "--exact",
                "--test-threads=1",
            ])
            .env(ENV_CHILD, "1")
            .env("INPUT_MAX_CASES", "4")
            .env("INPUT_MODE", "first-last")
            .env("INPUT_SEED", "11")
            .env("GITHUB_OUTPUT", "/tmp/github_output")
            .env_remove("INPUT_PATH")
            .output()
            .unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "{}", stdout);
        assert!(stdout.contains("1 passed"), "{}", stdout);
    }

    #[test]
    fn test_completions_subcommand() {
        let cli = Cli::try_parse_from(["depmatrix", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }
}
