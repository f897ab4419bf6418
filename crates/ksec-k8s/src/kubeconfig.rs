use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use kube::config::Kubeconfig;
use tracing::debug;

use ksec_types::{Error, Result};

/// Where the kubeconfig comes from, after flag/env/config-file resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KubeconfigSource {
    paths: Vec<PathBuf>,
}

impl KubeconfigSource {
    /// Resolve the kubeconfig location
    ///
    /// The `--kubeconfig` flag takes precedence over the `KUBECONFIG`
    /// environment value, which takes precedence over the config file.
    pub fn resolve(
        flag: Option<&Path>,
        env: Option<&OsStr>,
        config_file: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = flag {
            return Ok(Self::single(path));
        }

        if let Some(value) = env {
            let paths: Vec<PathBuf> = std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !paths.is_empty() {
                return Ok(Self { paths });
            }
        }

        if let Some(path) = config_file {
            return Ok(Self::single(path));
        }

        Err(Error::CredentialsMissing)
    }

    fn single(path: &Path) -> Self {
        Self {
            paths: vec![path.to_path_buf()],
        }
    }

    /// Files that make up this kubeconfig, in merge order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Read and merge every file; earlier files win on conflicting entries
    pub fn load(&self) -> Result<Kubeconfig> {
        let mut merged: Option<Kubeconfig> = None;

        for path in &self.paths {
            debug!(path = %path.display(), "Reading kubeconfig");
            let next = Kubeconfig::read_from(path).map_err(|e| {
                Error::Config(format!("failed to read kubeconfig {}: {}", path.display(), e))
            })?;

            merged = Some(match merged {
                Some(current) => current
                    .merge(next)
                    .map_err(|e| Error::Config(format!("failed to merge kubeconfig: {}", e)))?,
                None => next,
            });
        }

        merged.ok_or(Error::CredentialsMissing)
    }
}
