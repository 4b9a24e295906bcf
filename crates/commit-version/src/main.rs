//! CLI entry point for commit-version.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commit_version_app::{ConfigOverrides, InspectorBackend, ManifestFormat, VersionService};

mod commands;

/// Versions derived from commit count, checked against the project manifest.
#[derive(Parser, Debug)]
#[command(
    name = "commit-version",
    version,
    about = "commit-version: derive 0.<commits/10>.<commits%10> and compare it with the manifest"
)]
struct Cli {
    /// Path to repo or any subdir (defaults to current).
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Manifest to read instead of the configured one.
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Format of `--manifest` when its extension is ambiguous.
    #[arg(long, global = true, value_enum, requires = "manifest")]
    manifest_format: Option<ManifestKind>,

    /// History backend: libgit2 or git-cli.
    #[arg(long, global = true)]
    backend: Option<InspectorBackend>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the calculated version with the manifest (exit 1 on mismatch).
    Check {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the manifest version and the last commit.
    Info {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the version for an explicit commit count.
    Calc {
        /// Number of commits.
        count: u64,
    },

    /// Print the number of commits reachable from HEAD.
    Count,

    /// Write the calculated version into the manifest.
    Stamp {
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Rendering of command output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ManifestKind {
    Json,
    Toml,
}

impl From<ManifestKind> for ManifestFormat {
    fn from(kind: ManifestKind) -> Self {
        match kind {
            ManifestKind::Json => Self::Json,
            ManifestKind::Toml => Self::Toml,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    install_tracing();

    let repo_path = cli.repo.clone().unwrap_or_else(|| PathBuf::from("."));
    execute_command(&repo_path, cli)
}

fn execute_command(repo_path: &Path, cli: Cli) -> Result<ExitCode> {
    if let Command::Calc { count } = cli.cmd {
        let mut out = std::io::stdout().lock();
        commands::render_calc(&mut out, count)?;
        return Ok(ExitCode::SUCCESS);
    }

    let overrides = overrides_from(&cli)?;
    let service = VersionService::open(repo_path, &overrides)?;
    tracing::debug!(
        workdir = %service.workdir().display(),
        inspector = service.resolver().inspector().name(),
        "Opened project"
    );
    commands::run(cli.cmd, &service)
}

fn overrides_from(cli: &Cli) -> Result<ConfigOverrides> {
    // Paths on the command line are relative to the shell, not the working tree.
    let manifest = cli
        .manifest
        .as_deref()
        .map(std::path::absolute)
        .transpose()
        .context("failed to resolve --manifest path")?;
    Ok(ConfigOverrides {
        manifest,
        manifest_format: cli.manifest_format.map(Into::into),
        backend: cli.backend,
    })
}

fn install_tracing() {
    // RUST_LOG overrides the default, which keeps stdout reports free of noise.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_command() {
        let cli = Cli::parse_from(["commit-version", "--repo", "web", "check", "--format", "json"]);

        assert_eq!(cli.repo, Some(PathBuf::from("web")));
        match cli.cmd {
            Command::Check { format } => assert_eq!(format, OutputFormat::Json),
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn parse_info_defaults_to_text() {
        let cli = Cli::parse_from(["commit-version", "info"]);
        match cli.cmd {
            Command::Info { format } => assert_eq!(format, OutputFormat::Text),
            _ => panic!("expected info command"),
        }
    }

    #[test]
    fn parse_calc_command() {
        let cli = Cli::parse_from(["commit-version", "calc", "109"]);
        match cli.cmd {
            Command::Calc { count } => assert_eq!(count, 109),
            _ => panic!("expected calc command"),
        }
    }

    #[test]
    fn parse_global_overrides_after_subcommand() {
        let cli = Cli::parse_from([
            "commit-version",
            "stamp",
            "--dry-run",
            "--manifest",
            "meta/version",
            "--manifest-format",
            "json",
            "--backend",
            "git-cli",
        ]);

        assert_eq!(cli.manifest, Some(PathBuf::from("meta/version")));
        assert_eq!(cli.manifest_format, Some(ManifestKind::Json));
        assert_eq!(cli.backend, Some(InspectorBackend::GitCli));
        match cli.cmd {
            Command::Stamp { dry_run } => assert!(dry_run),
            _ => panic!("expected stamp command"),
        }
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["commit-version", "--backend", "svn", "count"]).is_err());
    }

    #[test]
    fn manifest_format_requires_manifest() {
        assert!(Cli::try_parse_from(["commit-version", "--manifest-format", "toml", "count"]).is_err());
    }

    #[test]
    fn overrides_make_manifest_absolute() -> Result<()> {
        let cli = Cli::parse_from(["commit-version", "--manifest", "package.json", "check"]);
        let overrides = overrides_from(&cli)?;
        let Some(manifest) = overrides.manifest else {
            panic!("manifest override");
        };
        assert!(manifest.is_absolute());
        assert!(manifest.ends_with("package.json"));
        Ok(())
    }
}
