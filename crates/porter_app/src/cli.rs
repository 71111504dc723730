use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use porter_core::JobKind;

use crate::platform::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "porter")]
#[command(about = "Submit GitHub repositories for AngularJS conversion or Razor Pages analysis", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Path to the RON config file (default: ./porter.ron)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Base address of the processing service, e.g. http://localhost:5000
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory downloaded artifacts are saved into
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, global = true)]
    pub log: Option<LogDestination>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit one repository, wait for the result and optionally download the artifact
    Run {
        /// Operation: convert or analyse
        kind: JobKind,

        /// GitHub repository URL, e.g. https://github.com/owner/repo
        url: String,

        /// Download the artifact after a successful job
        #[arg(long)]
        download: bool,
    },

    /// Interactive session driving both job kinds
    Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_global_flags() {
        let cli = Cli::try_parse_from([
            "porter",
            "run",
            "convert",
            "https://github.com/acme/widget",
            "--download",
            "--base-url",
            "http://svc:9000",
        ])
        .unwrap();

        assert_eq!(cli.global.base_url.as_deref(), Some("http://svc:9000"));
        match cli.command {
            Command::Run {
                kind,
                url,
                download,
            } => {
                assert_eq!(kind, JobKind::Convert);
                assert_eq!(url, "https://github.com/acme/widget");
                assert!(download);
            }
            Command::Shell => panic!("expected run"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["porter", "run", "migrate", "https://github.com/a/b"]).is_err());
    }

    #[test]
    fn parses_shell_with_log_destination() {
        let cli = Cli::try_parse_from(["porter", "--log", "both", "shell"]).unwrap();
        assert_eq!(cli.global.log, Some(LogDestination::Both));
        assert!(matches!(cli.command, Command::Shell));
    }
}
