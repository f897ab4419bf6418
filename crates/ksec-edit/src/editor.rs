use std::path::Path;
use std::process::Command;

use tracing::debug;

use ksec_types::{Error, Result};

/// Editor used when neither `EDITOR` nor the config file names one
pub const DEFAULT_EDITOR: &str = "vim";

/// Opens a file for interactive editing
pub trait Editor {
    /// Block until the user is done editing `path`
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Runs an external editor program in the foreground
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Parse an editor command line such as `vim` or `code --wait`
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| DEFAULT_EDITOR.to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }

    /// Resolve from the `EDITOR` value, then `fallback`, then `vim`
    pub fn resolve(env: Option<&str>, fallback: Option<&str>) -> Self {
        let command = env
            .filter(|e| !e.trim().is_empty())
            .or(fallback.filter(|f| !f.trim().is_empty()))
            .unwrap_or(DEFAULT_EDITOR);
        Self::new(command)
    }

    /// Resolve using the current process environment
    pub fn from_env(fallback: Option<&str>) -> Self {
        let env = std::env::var("EDITOR").ok();
        Self::resolve(env.as_deref(), fallback)
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        debug!(editor = %self.program, path = %path.display(), "Launching editor");

        // stdio is inherited so the editor owns the terminal
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|e| Error::EditorFailed {
                editor: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::EditorFailed {
                editor: self.program.clone(),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_env() {
        let editor = ExternalEditor::resolve(Some("nvim"), Some("nano"));
        assert_eq!(editor.program, "nvim");
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(ExternalEditor::resolve(None, Some("nano")).program, "nano");
        assert_eq!(ExternalEditor::resolve(Some("  "), None).program, DEFAULT_EDITOR);
        assert_eq!(ExternalEditor::resolve(None, None).program, "vim");
    }

    #[test]
    fn test_command_with_arguments() {
        let editor = ExternalEditor::new("code --wait");
        assert_eq!(editor.program, "code");
        assert_eq!(editor.args, vec!["--wait".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_editor() {
        let file = tempfile::NamedTempFile::new().unwrap();
        ExternalEditor::new("true").edit(file.path()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ExternalEditor::new("false").edit(file.path()).unwrap_err();
        assert!(matches!(err, Error::EditorFailed { ref editor, .. } if editor == "false"));
    }

    #[test]
    fn test_missing_program_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = ExternalEditor::new("ksec-no-such-editor")
            .edit(file.path())
            .unwrap_err();
        assert!(matches!(err, Error::EditorFailed { .. }));
    }
}
