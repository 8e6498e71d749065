//! Environment-backed credential store
//!
//! API keys are read from `<PROVIDER>_API_KEY` variables (see
//! [`api_key_env_var`]). The lookup function is injectable so tests
//! never touch the process environment.

use panel_domain::CredentialCheck;
use panel_domain::selection::api_key_env_var;
use std::fmt;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct EnvCredentialStore {
    lookup: Lookup,
}

impl EnvCredentialStore {
    /// Store reading the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Store resolving variable names through `lookup`.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// The API key for `provider_id`, if set and non-blank.
    pub fn api_key(&self, provider_id: &str) -> Option<String> {
        (self.lookup)(&api_key_env_var(provider_id))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvCredentialStore").finish_non_exhaustive()
    }
}

impl CredentialCheck for EnvCredentialStore {
    fn has_credential(&self, provider_id: &str) -> bool {
        self.api_key(provider_id).is_some()
    }
}
