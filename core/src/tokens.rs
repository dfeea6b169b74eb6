//! Session token lookup.
//!
//! Services read tokens through `TokenProvider` on every call and never write
//! them. The application owns the store (e.g. sets tokens after login).

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Keys a service may look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    IdToken,
}

impl TokenKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "accessToken",
            TokenKey::IdToken => "idToken",
        }
    }
}

/// Read-only view of the session token store.
pub trait TokenProvider: Send + Sync {
    fn get(&self, key: TokenKey) -> Option<String>;
}

/// Provider for anonymous use: never returns a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTokens;

impl TokenProvider for NoTokens {
    fn get(&self, _key: TokenKey) -> Option<String> {
        None
    }
}

/// In-memory, thread-safe session token store.
#[derive(Debug, Default)]
pub struct SessionTokens {
    tokens: RwLock<HashMap<TokenKey, String>>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: TokenKey, token: impl Into<String>) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, token.into());
    }

    pub fn remove(&self, key: TokenKey) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
    }

    /// Forget every token (logout).
    pub fn clear(&self) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl TokenProvider for SessionTokens {
    fn get(&self, key: TokenKey) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }
}

impl<T: TokenProvider + ?Sized> TokenProvider for std::sync::Arc<T> {
    fn get(&self, key: TokenKey) -> Option<String> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tokens_set_get_clear() {
        let tokens = SessionTokens::new();
        assert_eq!(tokens.get(TokenKey::AccessToken), None);

        tokens.set(TokenKey::AccessToken, "abc");
        tokens.set(TokenKey::IdToken, "id-1");
        assert_eq!(tokens.get(TokenKey::AccessToken).as_deref(), Some("abc"));
        assert_eq!(tokens.get(TokenKey::IdToken).as_deref(), Some("id-1"));

        tokens.remove(TokenKey::IdToken);
        assert_eq!(tokens.get(TokenKey::IdToken), None);

        tokens.clear();
        assert_eq!(tokens.get(TokenKey::AccessToken), None);
    }

    #[test]
    fn no_tokens_is_always_empty() {
        assert_eq!(NoTokens.get(TokenKey::AccessToken), None);
        assert_eq!(NoTokens.get(TokenKey::IdToken), None);
    }

    #[test]
    fn key_names_match_storage_keys() {
        assert_eq!(TokenKey::AccessToken.as_str(), "accessToken");
        assert_eq!(TokenKey::IdToken.as_str(), "idToken");
    }
}
