//! Shared types for ksec
//!
//! This crate contains the secret model and the error taxonomy used across
//! the ksec crates.

mod error;

use std::collections::BTreeMap;

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret as SecretResource;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub use error::{Error, Result};

// ============================================================================
// Secret Types
// ============================================================================

/// Key to raw value mapping held by a secret, sorted by key
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// A namespaced Kubernetes secret
///
/// Wraps the full API object so metadata the tool never touches (labels,
/// annotations, owner references, type) is sent back unchanged on update.
#[derive(Clone, Debug, PartialEq)]
pub struct Secret {
    resource: SecretResource,
}

impl Secret {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, data: SecretData) -> Self {
        let mut secret = Self {
            resource: SecretResource {
                metadata: ObjectMeta {
                    name: Some(name.into()),
                    namespace: Some(namespace.into()),
                    ..Default::default()
                },
                ..Default::default()
            },
        };
        secret.set_data(data);
        secret
    }

    /// Secret name
    pub fn name(&self) -> &str {
        self.resource.metadata.name.as_deref().unwrap_or_default()
    }

    /// Namespace the secret lives in
    pub fn namespace(&self) -> &str {
        self.resource.metadata.namespace.as_deref().unwrap_or_default()
    }

    /// Opaque version token used for optimistic concurrency
    pub fn resource_version(&self) -> Option<&str> {
        self.resource.metadata.resource_version.as_deref()
    }

    pub fn set_resource_version(&mut self, version: impl Into<String>) {
        self.resource.metadata.resource_version = Some(version.into());
    }

    /// Copy of the data mapping
    pub fn data(&self) -> SecretData {
        self.resource
            .data
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.0.clone()))
            .collect()
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.resource
            .data
            .as_ref()
            .and_then(|data| data.get(key))
            .map(|v| v.0.as_slice())
    }

    /// Insert or overwrite a single key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.resource
            .data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), ByteString(value.into()));
    }

    /// Replace the whole data mapping
    pub fn set_data(&mut self, data: SecretData) {
        self.resource.data = Some(
            data.into_iter()
                .map(|(k, v)| (k, ByteString(v)))
                .collect(),
        );
        // stringData is write-only and would be merged over data by the API server
        self.resource.string_data = None;
    }

    /// Underlying API object
    pub fn as_resource(&self) -> &SecretResource {
        &self.resource
    }
}

impl From<SecretResource> for Secret {
    fn from(resource: SecretResource) -> Self {
        Self { resource }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Secret {
        let mut data = SecretData::new();
        data.insert("user".to_string(), b"alice".to_vec());
        Secret::new("core", "db-pass", data)
    }

    #[test]
    fn test_new_secret_identity() {
        let secret = sample();
        assert_eq!(secret.name(), "db-pass");
        assert_eq!(secret.namespace(), "core");
        assert_eq!(secret.resource_version(), None);
        assert_eq!(secret.get("user"), Some(b"alice".as_slice()));
    }

    #[test]
    fn test_insert_and_replace_data() {
        let mut secret = sample();
        secret.insert("pass", "newpass");
        assert_eq!(secret.data().len(), 2);

        let mut replacement = SecretData::new();
        replacement.insert("token".to_string(), b"abc".to_vec());
        secret.set_data(replacement.clone());
        assert_eq!(secret.data(), replacement);
        assert_eq!(secret.get("user"), None);
    }

    #[test]
    fn test_missing_data_is_empty() {
        let secret = Secret::from(SecretResource::default());
        assert!(secret.data().is_empty());
        assert_eq!(secret.name(), "");
    }

    #[test]
    fn test_set_data_keeps_metadata() {
        let mut resource = sample().as_resource().clone();
        resource.type_ = Some("kubernetes.io/basic-auth".to_string());
        resource.string_data = Some(BTreeMap::from([("x".to_string(), "y".to_string())]));
        let mut secret = Secret::from(resource);
        secret.set_resource_version("42");

        secret.set_data(SecretData::new());

        let resource = secret.as_resource();
        assert_eq!(resource.type_.as_deref(), Some("kubernetes.io/basic-auth"));
        assert_eq!(resource.metadata.resource_version.as_deref(), Some("42"));
        assert!(resource.string_data.is_none());
    }
}
