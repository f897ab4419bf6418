use std::io::{BufRead, Write};

use tracing::info;

use ksec_k8s::SecretStore;
use ksec_types::Result;

/// Result of a write command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The key already held the requested value
    Unchanged,
    /// The user refused to overwrite the existing value
    Declined,
    Written,
}

/// Set one key of a secret, asking before overwriting a different value
pub async fn run<S, R, W>(
    store: &S,
    namespace: &str,
    name: &str,
    key: &str,
    value: &str,
    input: &mut R,
    out: &mut W,
) -> Result<WriteOutcome>
where
    S: SecretStore,
    R: BufRead,
    W: Write,
{
    let mut secret = store.get(namespace, name).await?;

    if let Some(current) = secret.get(key) {
        if current == value.as_bytes() {
            writeln!(out, "Current value matches the desired one")?;
            return Ok(WriteOutcome::Unchanged);
        }

        let current = String::from_utf8_lossy(current).into_owned();
        if !confirm_overwrite(&current, value, input, out)? {
            info!(namespace, name, key, "Overwrite declined");
            return Ok(WriteOutcome::Declined);
        }
    }

    secret.insert(key, value);
    store.update(&secret).await?;

    writeln!(out, "Secret {} updated", name)?;
    Ok(WriteOutcome::Written)
}

/// Show both values and ask until the user answers yes or no
///
/// End of input counts as no.
fn confirm_overwrite<R, W>(old: &str, new: &str, input: &mut R, out: &mut W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "Current value: {}", old)?;
    writeln!(out, "New value: {}", new)?;
    writeln!(out)?;

    loop {
        write!(out, "Do you want to continue with this operation? [y|n]: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(false);
        }

        let answer = line.trim().to_lowercase();
        match answer.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(out, "Unrecognized input {}", answer)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{data, store};
    use super::*;
    use std::io::Cursor;

    use ksec_k8s::MemoryStore;

    async fn write_with_input(
        key: &str,
        value: &str,
        answers: &str,
    ) -> (WriteOutcome, String, MemoryStore) {
        let store = store();
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();

        let outcome = run(&store, "core", "db-pass", key, value, &mut input, &mut out)
            .await
            .unwrap();

        (outcome, String::from_utf8(out).unwrap(), store)
    }

    #[tokio::test]
    async fn test_matching_value_is_noop() {
        let (outcome, out, store) = write_with_input("user", "alice", "").await;

        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert_eq!(out, "Current value matches the desired one\n");
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_new_key_needs_no_confirmation() {
        let (outcome, out, store) = write_with_input("pass", "newpass", "").await;

        assert_eq!(outcome, WriteOutcome::Written);
        assert!(!out.contains("[y|n]"));
        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].data(), data(&[("pass", "newpass"), ("user", "alice")]));
    }

    #[tokio::test]
    async fn test_declined_overwrite() {
        let (outcome, out, store) = write_with_input("user", "bob", "no\n").await;

        assert_eq!(outcome, WriteOutcome::Declined);
        assert!(out.contains("Current value: alice"));
        assert!(out.contains("New value: bob"));
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_overwrite() {
        let (outcome, _, store) = write_with_input("user", "bob", "YES\n").await;

        assert_eq!(outcome, WriteOutcome::Written);
        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].get("user"), Some(b"bob".as_slice()));
    }

    #[tokio::test]
    async fn test_reprompts_on_unrecognized_input() {
        let (outcome, out, store) = write_with_input("user", "bob", "maybe\n\ny\n").await;

        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(out.matches("[y|n]").count(), 3);
        assert!(out.contains("Unrecognized input maybe"));
        assert_eq!(store.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_end_of_input_declines() {
        let (outcome, _, store) = write_with_input("user", "bob", "").await;

        assert_eq!(outcome, WriteOutcome::Declined);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_missing_secret() {
        let store = store();
        let mut out = Vec::new();

        let err = run(&store, "core", "nope", "k", "v", &mut Cursor::new(Vec::new()), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, ksec_types::Error::NotFound { .. }));
    }
}
