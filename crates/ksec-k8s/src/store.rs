use ksec_types::{Result, Secret};

/// Typed access to secrets held by a remote store
///
/// Every call goes to the store; nothing is cached between calls.
#[allow(async_fn_in_trait)]
pub trait SecretStore {
    /// Fetch a secret, failing with `Error::NotFound` if it does not exist
    async fn get(&self, namespace: &str, name: &str) -> Result<Secret>;

    /// Names of all secrets in a namespace
    async fn list(&self, namespace: &str) -> Result<Vec<String>>;

    /// Write a secret back, guarded by its resource version
    ///
    /// A stale version fails with `Error::Conflict`. Callers must not retry
    /// blindly since that would overwrite a concurrent edit.
    async fn update(&self, secret: &Secret) -> Result<Secret>;
}
