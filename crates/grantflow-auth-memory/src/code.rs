//! In-memory authorization code store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use grantflow_auth::oauth::ValidatedAuthorizationRequest;
use grantflow_auth::storage::CodeStore;
use grantflow_auth::token::generate_opaque_value;
use grantflow_auth::config::expiry_after;
use grantflow_auth::{AuthError, AuthResult, GrantConfig};
use time::{Duration, OffsetDateTime};

/// An issued authorization code and what it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRecord {
    pub client_id: String,
    pub redirect_uri: Option<String>,
    pub scope: Option<String>,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    /// Set once the code has been redeemed.
    pub consumed_at: Option<OffsetDateTime>,
}

impl CodeRecord {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }
}

/// Authorization codes keyed by code value.
///
/// Consumed codes stay in the map until they expire so that a replay is
/// reported as such rather than as an unknown code.
#[derive(Debug)]
pub struct InMemoryCodeStore {
    codes: DashMap<String, CodeRecord>,
    lifetime: Duration,
    code_bytes: usize,
}

impl InMemoryCodeStore {
    /// Creates an empty store using the code lifetime and size from `config`.
    #[must_use]
    pub fn new(config: &GrantConfig) -> Self {
        Self {
            codes: DashMap::new(),
            lifetime: config.code_lifetime(),
            code_bytes: config.token_bytes,
        }
    }

    /// Returns a snapshot of the record for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<CodeRecord> {
        self.codes.get(code).map(|entry| entry.value().clone())
    }

    /// Number of codes held, consumed or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Removes expired codes. Returns how many were removed.
    ///
    /// Codes are never dropped otherwise.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.codes.len();
        self.codes.retain(|_, record| !record.is_expired());
        before.saturating_sub(self.codes.len())
    }
}

impl Default for InMemoryCodeStore {
    fn default() -> Self {
        Self::new(&GrantConfig::default())
    }
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn issue(&self, request: &ValidatedAuthorizationRequest) -> AuthResult<String> {
        let issued_at = OffsetDateTime::now_utc();
        let record = CodeRecord {
            client_id: request.client_id.clone(),
            redirect_uri: request.redirect_uri.clone(),
            scope: request.scope.clone(),
            issued_at,
            expires_at: expiry_after(issued_at, self.lifetime)?,
            consumed_at: None,
        };

        let code = generate_opaque_value(self.code_bytes);
        match self.codes.entry(code.clone()) {
            Entry::Occupied(_) => Err(AuthError::internal("Authorization code collision")),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(code)
            }
        }
    }

    async fn consume(&self, code: &str) -> AuthResult<()> {
        // The shard write lock held by `get_mut` makes check-and-set atomic.
        let Some(mut record) = self.codes.get_mut(code) else {
            return Err(AuthError::code_rejected("Authorization code is invalid"));
        };

        if record.is_consumed() {
            tracing::warn!(client_id = %record.client_id, "Authorization code replay detected");
            return Err(AuthError::code_rejected("Authorization code has already been used"));
        }

        if record.is_expired() {
            return Err(AuthError::code_rejected("Authorization code has expired"));
        }

        record.consumed_at = Some(OffsetDateTime::now_utc());
        Ok(())
    }
}
