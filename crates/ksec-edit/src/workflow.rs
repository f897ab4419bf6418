use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};

use ksec_k8s::SecretStore;
use ksec_types::{Error, Result};

use crate::backup;
use crate::codec;
use crate::editor::Editor;

/// Options for an edit session
#[derive(Clone, Debug)]
pub struct EditOptions {
    /// Snapshot the pre-edit data before applying changes
    pub backup: bool,

    /// Directory backups are written to
    pub backup_dir: PathBuf,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            backup: false,
            backup_dir: PathBuf::from("."),
        }
    }
}

/// How an edit session ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The editor left the file untouched; nothing was sent to the store
    Unchanged,

    /// The secret was replaced with the edited data
    Updated { backup: Option<PathBuf> },
}

/// Fetch a secret, let the user edit it as text, and write it back
pub struct EditWorkflow<'a, S, E> {
    store: &'a S,
    editor: &'a E,
    options: EditOptions,
}

impl<'a, S, E> EditWorkflow<'a, S, E>
where
    S: SecretStore,
    E: Editor,
{
    pub fn new(store: &'a S, editor: &'a E, options: EditOptions) -> Self {
        Self {
            store,
            editor,
            options,
        }
    }

    /// Run one edit session, writing progress messages to `out`
    pub async fn run<W: Write>(
        &self,
        namespace: &str,
        name: &str,
        out: &mut W,
    ) -> Result<EditOutcome> {
        let mut secret = self.store.get(namespace, name).await?;
        let original = secret.data();

        let staged = StagedFile::create(&codec::encode(&original))?;
        let before = staged.modified()?;
        debug!(path = %staged.path().display(), "Secret staged for editing");

        self.editor.edit(staged.path())?;

        let after = staged.modified()?;
        if before == after {
            info!(namespace, name, "Edited file not modified");
            writeln!(out, "No changes detected. Secret not updated.")?;
            return Ok(EditOutcome::Unchanged);
        }

        let backup = if self.options.backup {
            let path = backup::write_backup(&self.options.backup_dir, name, namespace, &original)?;
            writeln!(out, "Backup created: {}", path.display())?;
            Some(path)
        } else {
            None
        };

        let edited = codec::decode(&staged.read()?)?;

        writeln!(out, "Updating secret {} in namespace {}", name, namespace)?;
        secret.set_data(edited);
        self.store.update(&secret).await?;

        Ok(EditOutcome::Updated { backup })
    }
}

/// Scratch file holding the secret while the editor runs
///
/// Removed on drop so every exit path cleans up. A failed removal is only
/// logged since the command itself already succeeded or failed by then.
struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    fn create(contents: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("ksec-edit-")
            .suffix(".yaml")
            .tempfile()
            .map_err(Error::TempFile)?;
        file.write_all(contents.as_bytes()).map_err(Error::TempFile)?;

        // Take over removal from tempfile so failures can be reported
        let (file, path) = file.keep().map_err(|e| Error::TempFile(e.error))?;
        drop(file);

        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Result<SystemTime> {
        fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(Error::TempFile)
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(Error::TempFile)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Could not remove temporary file");
        }
    }
}
