//! Configuration file and settings resolution
//!
//! Command-line flags win over environment variables, which win over the
//! optional config file, which wins over built-in defaults.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use ksec_edit::FzfSelector;
use ksec_k8s::KubeconfigSource;
use ksec_types::{Error, Result};

/// Namespace used when neither `-n` nor the config file sets one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Contents of `config.toml`
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub namespace: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    /// Editor used when `EDITOR` is unset
    pub editor: Option<String>,
    /// Always back up before applying an edit
    pub backup: bool,
    pub backup_dir: Option<PathBuf>,
    pub selector: SelectorConfig,
}

/// `[selector]` table
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    pub prompt: Option<String>,
    pub height: Option<String>,
}

impl FileConfig {
    /// `<config_dir>/ksec/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ksec").join("config.toml"))
    }

    /// Load an explicitly named file, or the default file if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config file");
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub namespace: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

/// Fully resolved settings handed to the commands
#[derive(Debug)]
pub struct Settings {
    pub namespace: String,
    pub kubeconfig: KubeconfigSource,
    pub context: Option<String>,
    pub editor: Option<String>,
    pub backup: bool,
    pub backup_dir: PathBuf,
    pub selector_prompt: String,
    pub selector_height: String,
}

impl Settings {
    /// Merge flags, the `KUBECONFIG` value and the config file
    pub fn resolve(
        overrides: Overrides,
        kubeconfig_env: Option<&OsStr>,
        file: FileConfig,
    ) -> Result<Self> {
        let kubeconfig = KubeconfigSource::resolve(
            overrides.kubeconfig.as_deref(),
            kubeconfig_env,
            file.kubeconfig.as_deref(),
        )?;

        Ok(Self {
            namespace: overrides
                .namespace
                .or(file.namespace)
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            kubeconfig,
            context: overrides.context.or(file.context),
            editor: file.editor,
            backup: file.backup,
            backup_dir: file.backup_dir.unwrap_or_else(|| PathBuf::from(".")),
            selector_prompt: file
                .selector
                .prompt
                .unwrap_or_else(|| FzfSelector::DEFAULT_PROMPT.to_string()),
            selector_height: file
                .selector
                .height
                .unwrap_or_else(|| FzfSelector::DEFAULT_HEIGHT.to_string()),
        })
    }
}
