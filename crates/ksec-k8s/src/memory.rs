use std::collections::BTreeMap;

use parking_lot::{Mutex, MutexGuard};

use ksec_types::{Error, Result, Secret, SecretData};

use crate::store::SecretStore;

type UpdateHook = Box<dyn Fn(&Secret) + Send + Sync>;

/// In-memory secret store for tests
///
/// Tracks resource versions like the API server does and records every
/// successful update.
#[derive(Default)]
pub struct MemoryStore {
    secrets: Mutex<BTreeMap<(String, String), Secret>>,
    updates: Mutex<Vec<Secret>>,
    on_update: Option<UpdateHook>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret at resource version "1"
    pub fn with_secret(self, namespace: &str, name: &str, data: SecretData) -> Self {
        let mut secret = Secret::new(namespace, name, data);
        secret.set_resource_version("1");
        self.lock_secrets()
            .insert((namespace.to_string(), name.to_string()), secret);
        self
    }

    /// Run `hook` right before an update is committed
    pub fn with_update_hook(mut self, hook: impl Fn(&Secret) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    /// Every secret passed to a successful `update`, oldest first
    pub fn updates(&self) -> Vec<Secret> {
        self.updates.lock().clone()
    }

    /// Bump the stored version as if someone else had written the secret
    pub fn touch(&self, namespace: &str, name: &str) {
        if let Some(secret) = self
            .lock_secrets()
            .get_mut(&(namespace.to_string(), name.to_string()))
        {
            let next = next_version(secret.resource_version());
            secret.set_resource_version(next);
        }
    }

    fn lock_secrets(&self) -> MutexGuard<'_, BTreeMap<(String, String), Secret>> {
        self.secrets.lock()
    }
}

fn next_version(current: Option<&str>) -> String {
    let current: u64 = current.and_then(|v| v.parse().ok()).unwrap_or(0);
    (current + 1).to_string()
}

impl SecretStore for MemoryStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Secret> {
        self.lock_secrets()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn list(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .lock_secrets()
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect())
    }

    async fn update(&self, secret: &Secret) -> Result<Secret> {
        let key = (secret.namespace().to_string(), secret.name().to_string());
        let mut secrets = self.lock_secrets();

        let stored = secrets.get(&key).ok_or_else(|| Error::NotFound {
            namespace: key.0.clone(),
            name: key.1.clone(),
        })?;

        if stored.resource_version() != secret.resource_version() {
            return Err(Error::Conflict {
                namespace: key.0.clone(),
                name: key.1.clone(),
            });
        }

        if let Some(hook) = &self.on_update {
            hook(secret);
        }

        let mut updated = secret.clone();
        updated.set_resource_version(next_version(stored.resource_version()));
        secrets.insert(key, updated.clone());

        self.updates.lock().push(secret.clone());

        Ok(updated)
    }
}
