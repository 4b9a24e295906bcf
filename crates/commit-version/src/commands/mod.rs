use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use commit_version_app::{StampOutcome, VersionService};
use commit_version_core::{CommitCount, CommitInfo, ConsistencyResult, ManifestVersion, VersionReport, calculate_version};
use serde_json::json;

use crate::{Command, OutputFormat};

const MISMATCH_EXIT: u8 = 1;

/// Execute a subcommand against the configured service.
pub fn run(command: Command, service: &VersionService) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    match command {
        Command::Check { format } => {
            let report = service.report();
            render_report(&mut out, &report, format)?;
            Ok(ExitCode::from(check_status(&report.consistency)))
        }
        Command::Info { format } => {
            let resolver = service.resolver();
            render_info(&mut out, &resolver.manifest_version(), &resolver.last_commit_info(), format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Calc { count } => {
            render_calc(&mut out, count)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Count => {
            writeln!(out, "{}", service.resolver().commit_count())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Stamp { dry_run } => {
            let outcome = service.stamp(dry_run)?;
            render_stamp(&mut out, &outcome)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Process status for `check`: zero only when the versions agree.
const fn check_status(consistency: &ConsistencyResult) -> u8 {
    match consistency {
        ConsistencyResult::Match => 0,
        ConsistencyResult::Mismatch { .. } => MISMATCH_EXIT,
    }
}

pub fn render_calc(out: &mut impl Write, count: u64) -> io::Result<()> {
    writeln!(out, "{}", calculate_version(CommitCount(count)))
}

fn render_report(out: &mut impl Write, report: &VersionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(report)?)?,
        OutputFormat::Text => {
            writeln!(out, "Commit count: {}", report.commit_count)?;
            writeln!(out, "Calculated version: {}", report.calculated)?;
            writeln!(out, "Manifest version: {}", report.manifest)?;
            writeln!(out, "Last commit: \"{}\"", report.last_commit.message)?;
            writeln!(out, "By: {}", report.last_commit.author)?;
            match &report.consistency {
                ConsistencyResult::Match => writeln!(out, "Status: match")?,
                ConsistencyResult::Mismatch { calculated, manifest } => writeln!(
                    out,
                    "Status: mismatch (calculated {calculated}, manifest {manifest})"
                )?,
            }
        }
    }
    Ok(())
}

fn render_info(
    out: &mut impl Write,
    version: &ManifestVersion,
    commit: &CommitInfo,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "version": version,
                "message": commit.message,
                "author": commit.author,
                "committed_at": commit.committed_at,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Version: {version}")?;
            writeln!(out, "Last commit: \"{}\"", commit.message)?;
            writeln!(out, "By: {}", commit.author)?;
        }
    }
    Ok(())
}

fn render_stamp(out: &mut impl Write, outcome: &StampOutcome) -> io::Result<()> {
    let previous = outcome.previous.as_deref().unwrap_or(commit_version_core::NOT_AVAILABLE);
    let verb = if outcome.written { "stamped" } else { "would stamp" };
    writeln!(
        out,
        "{verb} {}: {previous} -> {}",
        outcome.path.display(),
        outcome.version
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use commit_version_core::CalculatedVersion;
    use std::path::PathBuf;

    fn rendered<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        if let Err(err) = f(&mut buf) {
            panic!("render failed: {err:#}");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn report(manifest: &str) -> VersionReport {
        let calculated = calculate_version(CommitCount(23));
        let manifest = ManifestVersion::from_field(Some(manifest.to_owned()));
        VersionReport {
            commit_count: CommitCount(23),
            calculated,
            consistency: ConsistencyResult::compare(&calculated, &manifest),
            manifest,
            last_commit: CommitInfo {
                message: "Fix login flow".into(),
                author: "sam".into(),
                committed_at: None,
            },
        }
    }

    #[test]
    fn check_fails_only_on_mismatch() {
        assert_eq!(check_status(&report("0.2.3").consistency), 0);
        assert_eq!(check_status(&report("0.1.9").consistency), 1);
        assert_eq!(check_status(&report("").consistency), 1);
    }

    #[test]
    fn calc_prints_dotted_version() {
        let out = rendered(|buf| Ok(render_calc(buf, 109)?));
        assert_eq!(out, "0.10.9\n");
    }

    #[test]
    fn text_report_shows_mismatch() {
        let out = rendered(|buf| render_report(buf, &report("0.1.9"), OutputFormat::Text));
        assert_eq!(
            out,
            "Commit count: 23\nCalculated version: 0.2.3\nManifest version: 0.1.9\nLast commit: \"Fix login flow\"\nBy: sam\nStatus: mismatch (calculated 0.2.3, manifest 0.1.9)\n"
        );
    }

    #[test]
    fn json_report_is_machine_readable() -> Result<()> {
        let out = rendered(|buf| render_report(buf, &report("0.2.3"), OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&out)?;
        assert_eq!(value["consistency"]["status"], "match");
        assert_eq!(value["calculated"], "0.2.3");
        Ok(())
    }

    #[test]
    fn info_mirrors_version_script_output() {
        let out = rendered(|buf| {
            render_info(
                buf,
                &ManifestVersion::NotAvailable,
                &CommitInfo::not_available(),
                OutputFormat::Text,
            )
        });
        assert_eq!(out, "Version: N/A\nLast commit: \"N/A\"\nBy: N/A\n");
    }

    #[test]
    fn stamp_reports_previous_value() {
        let outcome = StampOutcome {
            path: PathBuf::from("/work/package.json"),
            previous: None,
            version: CalculatedVersion {
                major: 0,
                minor: 2,
                patch: 3,
            },
            written: false,
        };
        let out = rendered(|buf| Ok(render_stamp(buf, &outcome)?));
        assert_eq!(out, "would stamp /work/package.json: N/A -> 0.2.3\n");
    }
}
