use std::io::Write;

use ksec_edit::{Selector, codec};
use ksec_k8s::SecretStore;
use ksec_types::Result;

use super::resolve_secret_name;

/// Print every `key: value` pair of a secret
pub async fn run<S, L, W>(
    store: &S,
    namespace: &str,
    name: Option<String>,
    selector: Option<&L>,
    out: &mut W,
) -> Result<()>
where
    S: SecretStore,
    L: Selector,
    W: Write,
{
    let name = resolve_secret_name(store, namespace, name, selector).await?;
    let secret = store.get(namespace, &name).await?;

    out.write_all(codec::encode(&secret.data()).as_bytes())?;
    out.flush()?;
    Ok(())
}
