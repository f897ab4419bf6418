use std::io;
use std::path::PathBuf;

/// Errors surfaced by ksec operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("kubeconfig is not provided: pass --kubeconfig or set KUBECONFIG")]
    CredentialsMissing,

    #[error("secret '{name}' not found in namespace '{namespace}'")]
    NotFound { namespace: String, name: String },

    #[error("secret '{name}' in '{namespace}' was modified concurrently, re-run the command")]
    Conflict { namespace: String, name: String },

    #[error("secret name is required when fzf is not installed")]
    MissingSecretName,

    #[error("no secrets found in namespace {0}")]
    EmptyNamespace(String),

    #[error("secret selection cancelled")]
    SelectionCancelled,

    #[error("nothing to select from")]
    NoCandidates,

    #[error("invalid line {line} in secret data: {content}")]
    Parse { line: usize, content: String },

    #[error("editor '{editor}' failed: {reason}")]
    EditorFailed { editor: String, reason: String },

    #[error("backup failed: could not write {}", .path.display())]
    BackupWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("temporary file error")]
    TempFile(#[source] io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("kubernetes API error: {0}")]
    Remote(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
