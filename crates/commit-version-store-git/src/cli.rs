//! History inspection through the `git` executable.

use std::path::PathBuf;
use std::process::Command;

use commit_version_core::RepositoryInspector;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::{InspectError, Result};

/// Inspector that shells out to `git` in a working directory.
#[derive(Debug, Clone)]
pub struct GitCliInspector {
    program: PathBuf,
    workdir: PathBuf,
}

impl GitCliInspector {
    /// Run `git` found on `PATH` inside `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self::with_program("git", workdir)
    }

    /// Run an explicit git executable inside `workdir`.
    pub fn with_program(program: impl Into<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }

    /// Command line as shown in logs and errors.
    fn render(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }

    /// Run `git <args>` and return trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let command = self.render(args);
        debug!(%command, workdir = %self.workdir.display(), "Running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| InspectError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(InspectError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

impl RepositoryInspector for GitCliInspector {
    type Error = InspectError;

    fn commit_count(&self) -> Result<u64> {
        let args = ["rev-list", "--count", "HEAD"];
        let output = self.run(&args)?;
        output.parse().map_err(|_| InspectError::UnexpectedOutput {
            command: self.render(&args),
            output,
        })
    }

    fn last_commit_message(&self) -> Result<String> {
        self.run(&["log", "-1", "--pretty=%B"])
    }

    fn last_commit_author(&self) -> Result<String> {
        self.run(&["log", "-1", "--pretty=%an"])
    }

    fn last_commit_time(&self) -> Result<Option<String>> {
        let raw = self.run(&["log", "-1", "--pretty=%cI"])?;
        // Re-render so both backends agree on `Z` versus `+00:00`.
        let parsed = OffsetDateTime::parse(&raw, &Rfc3339)
            .map_err(|err| InspectError::InvalidTime(format!("{raw}: {err}")))?;
        let rendered = parsed
            .format(&Rfc3339)
            .map_err(|err| InspectError::InvalidTime(err.to_string()))?;
        Ok(Some(rendered))
    }
}
