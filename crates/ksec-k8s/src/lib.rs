//! Kubernetes secret store client for ksec
//!
//! This crate provides the `SecretStore` seam used by the commands, its
//! kube-rs backed implementation, and kubeconfig loading.

mod client;
mod kubeconfig;
#[cfg(any(test, feature = "test-util"))]
mod memory;
mod store;

pub use client::KubeSecretStore;
pub use kubeconfig::KubeconfigSource;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;
pub use store::SecretStore;

// Re-export types that are used in our public API
pub use ksec_types::{Error, Result, Secret, SecretData};
