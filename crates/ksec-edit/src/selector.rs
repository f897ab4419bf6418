use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use ksec_types::{Error, Result};

/// Picks one name out of a list
pub trait Selector {
    fn select(&self, names: &[String]) -> Result<String>;
}

/// Interactive selection through the `fzf` fuzzy finder
#[derive(Clone, Debug)]
pub struct FzfSelector {
    program: PathBuf,
    prompt: String,
    height: String,
}

impl FzfSelector {
    pub const DEFAULT_PROMPT: &'static str = "Select secret: ";
    pub const DEFAULT_HEIGHT: &'static str = "60%";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            prompt: Self::DEFAULT_PROMPT.to_string(),
            height: Self::DEFAULT_HEIGHT.to_string(),
        }
    }

    /// Locate `fzf` on `PATH`, returning `None` when it is not installed
    pub fn detect() -> Option<Self> {
        match which::which("fzf") {
            Ok(path) => Some(Self::new(path)),
            Err(e) => {
                debug!(error = %e, "fzf not available");
                None
            }
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_height(mut self, height: impl Into<String>) -> Self {
        self.height = height.into();
        self
    }

    fn args(&self) -> Vec<String> {
        vec![
            format!("--height={}", self.height),
            "--reverse".to_string(),
            format!("--prompt={}", self.prompt),
        ]
    }
}

impl Selector for FzfSelector {
    fn select(&self, names: &[String]) -> Result<String> {
        if names.is_empty() {
            return Err(Error::NoCandidates);
        }

        debug!(candidates = names.len(), "Launching fzf");

        // fzf draws on /dev/tty, so only stdin and stdout are wired up
        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                debug!(error = %e, "Failed to start fzf");
                Error::SelectionCancelled
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let input: String = names.iter().map(|n| format!("{}\n", n)).collect();
            // fzf may exit before reading everything, which surfaces below
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                debug!(error = %e, "Failed to feed fzf");
            }
        }

        let output = child.wait_with_output().map_err(|e| {
            debug!(error = %e, "Failed to wait for fzf");
            Error::SelectionCancelled
        })?;

        if !output.status.success() {
            debug!(status = %output.status, "fzf exited without a selection");
            return Err(Error::SelectionCancelled);
        }

        let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if selected.is_empty() {
            return Err(Error::SelectionCancelled);
        }

        Ok(selected)
    }
}
