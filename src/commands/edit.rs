use std::io::Write;

use ksec_edit::{EditOptions, EditOutcome, EditWorkflow, Editor, Selector};
use ksec_k8s::SecretStore;
use ksec_types::Result;

use super::resolve_secret_name;

/// Open a secret in the editor and apply the result
pub async fn run<S, L, E, W>(
    store: &S,
    namespace: &str,
    name: Option<String>,
    selector: Option<&L>,
    editor: &E,
    options: EditOptions,
    out: &mut W,
) -> Result<EditOutcome>
where
    S: SecretStore,
    L: Selector,
    E: Editor,
    W: Write,
{
    let name = resolve_secret_name(store, namespace, name, selector).await?;
    EditWorkflow::new(store, editor, options)
        .run(namespace, &name, out)
        .await
}
