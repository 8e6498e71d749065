//! Credential presence checks used during model selection.

/// Reports whether a provider-scoped credential is available.
///
/// Injected into the [`ModelSelector`](super::ModelSelector) so selection
/// never reads ambient process state directly.
pub trait CredentialCheck: Send + Sync {
    fn has_credential(&self, provider_id: &str) -> bool;
}

impl<F> CredentialCheck for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn has_credential(&self, provider_id: &str) -> bool {
        self(provider_id)
    }
}

/// Treats every provider as having a credential.
pub struct AssumeCredentials;

impl CredentialCheck for AssumeCredentials {
    fn has_credential(&self, _provider_id: &str) -> bool {
        true
    }
}

/// Environment variable expected to hold the API key for a provider:
/// the upper-cased provider id with `-` and `.` mapped to `_`, suffixed
/// with `_API_KEY`.
pub fn api_key_env_var(provider_id: &str) -> String {
    let normalized: String = provider_id
        .trim()
        .chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect();
    format!("{}_API_KEY", normalized)
}
