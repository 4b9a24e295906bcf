use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result, bail};
pub use commit_version_manifest::ManifestFormat;
use serde::Deserialize;

const CONFIG_DIR: &str = ".commit-version";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_MANIFEST: &str = "package.json";
const DEFAULT_GIT_BINARY: &str = "git";

/// Top-level project configuration loaded from `.commit-version/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub inspector: InspectorConfig,
}

impl ProjectConfig {
    /// Load configuration from a known working tree directory.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let config_path = workdir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(path) = &overrides.manifest {
            self.manifest.path.clone_from(path);
            // A path given on the command line carries its own extension.
            self.manifest.format = overrides.manifest_format;
        }
        if let Some(backend) = overrides.backend {
            self.inspector.backend = backend;
        }
        self
    }

    /// Check invariants that deserialization alone cannot express.
    pub fn validate(&self) -> Result<()> {
        self.manifest.ensure_path()?;
        self.manifest.resolve_format()?;
        self.inspector.ensure_binary()
    }
}

/// Values supplied on the command line that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Manifest path; absolute, or relative to the working tree.
    pub manifest: Option<PathBuf>,
    /// Format for an overridden manifest path.
    pub manifest_format: Option<ManifestFormat>,
    /// History backend.
    pub backend: Option<InspectorBackend>,
}

/// Where the project version is recorded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Manifest path, relative to the working tree unless absolute.
    pub path: PathBuf,
    /// Explicit format; inferred from the extension when absent.
    pub format: Option<ManifestFormat>,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST),
            format: None,
        }
    }
}

impl ManifestConfig {
    /// Absolute manifest location for the given working tree.
    pub fn location(&self, workdir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            workdir.join(&self.path)
        }
    }

    /// Configured format, or the one implied by the file extension.
    pub fn resolve_format(&self) -> Result<ManifestFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        let Some(format) = ManifestFormat::from_path(&self.path) else {
            bail!(
                "cannot infer manifest format from '{}'; set manifest.format to \"json\" or \"toml\"",
                self.path.display()
            );
        };
        Ok(format)
    }

    fn ensure_path(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            bail!("manifest path must not be empty");
        }
        Ok(())
    }
}

/// How commit history is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub backend: InspectorBackend,
    /// Executable used by the `git-cli` backend.
    pub git_binary: PathBuf,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            backend: InspectorBackend::default(),
            git_binary: PathBuf::from(DEFAULT_GIT_BINARY),
        }
    }
}

impl InspectorConfig {
    fn ensure_binary(&self) -> Result<()> {
        if self.backend == InspectorBackend::GitCli && self.git_binary.as_os_str().is_empty() {
            bail!("inspector.git_binary must not be empty when backend is \"git-cli\"");
        }
        Ok(())
    }
}

/// Commit history backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectorBackend {
    /// Read history in-process through libgit2.
    #[default]
    Libgit2,
    /// Spawn the `git` executable.
    GitCli,
}

impl InspectorBackend {
    /// Name used in configuration files and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Libgit2 => "libgit2",
            Self::GitCli => "git-cli",
        }
    }
}

impl fmt::Display for InspectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised backend name.
#[derive(Debug, thiserror::Error)]
#[error("unknown inspector backend '{0}' (expected \"libgit2\" or \"git-cli\")")]
pub struct UnknownBackend(String);

impl FromStr for InspectorBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "libgit2" => Ok(Self::Libgit2),
            "git-cli" | "git" => Ok(Self::GitCli),
            _ => Err(UnknownBackend(s.to_owned())),
        }
    }
}
