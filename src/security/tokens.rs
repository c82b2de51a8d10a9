//! Bearer-token authorization table.

use std::collections::BTreeSet;

use uuid::Uuid;

/// Set of bearer tokens authorized to submit events.
///
/// Non-empty by construction: when the configured list boils down to
/// nothing, a single token is generated so the server always has a usable
/// credential. Immutable after construction.
#[derive(Debug, Clone)]
pub struct TokenTable {
    tokens: BTreeSet<String>,
}

impl TokenTable {
    /// Build the table from raw configured values.
    ///
    /// Entries are trimmed; entries that are empty after trimming are
    /// dropped; duplicates collapse. An empty result falls back to one
    /// freshly generated token, logged so operators can retrieve the
    /// credential.
    pub fn from_raw(raw: &[String]) -> Self {
        let mut tokens = BTreeSet::new();
        for entry in raw {
            let token = entry.trim();
            if token.is_empty() {
                continue;
            }
            if !tokens.insert(token.to_string()) {
                tracing::debug!(token = %token, "duplicate token in config, ignoring");
            }
        }

        if tokens.is_empty() {
            let generated = Uuid::new_v4().to_string();
            tracing::warn!(
                token = %generated,
                "empty 'server.auth' config key, auto generated token"
            );
            tokens.insert(generated);
        }

        Self { tokens }
    }

    /// Exact-match membership check. Case-sensitive.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
