//! Command handlers
//!
//! Each handler takes its collaborators explicitly so tests can swap the
//! store, the selector and the terminal streams.

pub mod edit;
pub mod read;
pub mod write;

use tracing::debug;

use ksec_edit::Selector;
use ksec_k8s::SecretStore;
use ksec_types::{Error, Result};

/// Use the given name, or let the user pick one from the namespace
///
/// `selector` is `None` when fzf is not installed, in which case a name is
/// mandatory.
pub async fn resolve_secret_name<S, L>(
    store: &S,
    namespace: &str,
    name: Option<String>,
    selector: Option<&L>,
) -> Result<String>
where
    S: SecretStore,
    L: Selector,
{
    if let Some(name) = name {
        return Ok(name);
    }

    let selector = selector.ok_or(Error::MissingSecretName)?;

    let names = store.list(namespace).await?;
    if names.is_empty() {
        return Err(Error::EmptyNamespace(namespace.to_string()));
    }

    let selected = selector.select(&names)?;
    debug!(namespace, name = %selected, "Secret selected");
    Ok(selected)
}
