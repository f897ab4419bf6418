use k8s_openapi::api::core::v1::Secret as SecretResource;
use kube::Api;
use kube::api::{ListParams, PostParams};
use kube::config::KubeConfigOptions;
use tracing::{debug, info};

use ksec_types::{Error, Result, Secret};

use crate::kubeconfig::KubeconfigSource;
use crate::store::SecretStore;

/// Secret store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretStore {
    client: kube::Client,
}

impl KubeSecretStore {
    /// Build a client from the resolved kubeconfig, optionally pinning a context
    pub async fn connect(source: &KubeconfigSource, context: Option<&str>) -> Result<Self> {
        let kubeconfig = source.load()?;

        let config = kube::Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(str::to_string),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| Error::Config(format!("failed to create client config: {}", e)))?;

        debug!(cluster_url = %config.cluster_url, "Connecting to cluster");

        let client = kube::Client::try_from(config)
            .map_err(|e| Error::Config(format!("failed to create client: {}", e)))?;

        Ok(Self::new(client))
    }

    /// Wrap an existing client
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<SecretResource> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl SecretStore for KubeSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Secret> {
        debug!(namespace, name, "Fetching secret");
        let resource = self
            .api(namespace)
            .get_opt(name)
            .await
            .map_err(|e| map_api_error(e, namespace, name))?;

        resource.map(Secret::from).ok_or_else(|| Error::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    async fn list(&self, namespace: &str) -> Result<Vec<String>> {
        debug!(namespace, "Listing secrets");
        let list = self
            .api(namespace)
            .list(&ListParams::default())
            .await
            .map_err(|e| Error::Remote(format!("failed to list secrets in {}: {}", namespace, e)))?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|secret| secret.metadata.name)
            .collect())
    }

    async fn update(&self, secret: &Secret) -> Result<Secret> {
        let (namespace, name) = (secret.namespace(), secret.name());
        info!(
            namespace,
            name,
            resource_version = secret.resource_version().unwrap_or("none"),
            "Replacing secret"
        );

        let updated = self
            .api(namespace)
            .replace(name, &PostParams::default(), secret.as_resource())
            .await
            .map_err(|e| map_api_error(e, namespace, name))?;

        Ok(Secret::from(updated))
    }
}

/// Map API status codes onto the error taxonomy
fn map_api_error(err: kube::Error, namespace: &str, name: &str) -> Error {
    match &err {
        kube::Error::Api(response) if response.code == 404 => Error::NotFound {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        kube::Error::Api(response) if response.code == 409 => Error::Conflict {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        _ => Error::Remote(format!("secret '{}' in namespace '{}': {}", name, namespace, err)),
    }
}
