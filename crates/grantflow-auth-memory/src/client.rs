//! In-memory client registry.

use async_trait::async_trait;
use dashmap::DashMap;
use grantflow_auth::storage::ClientRegistry;
use grantflow_auth::{AuthResult, Client, ClientValidationError};

/// Client registrations keyed by `client_id`.
#[derive(Debug, Default)]
pub struct InMemoryClientRegistry {
    clients: DashMap<String, Client>,
}

impl InMemoryClientRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client, replacing any registration with the same id.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the registration is incomplete.
    pub fn register(&self, client: Client) -> Result<(), ClientValidationError> {
        client.validate()?;
        tracing::debug!(client_id = %client.client_id, "Client registered");
        self.clients.insert(client.client_id.clone(), client);
        Ok(())
    }

    /// Removes a registration, returning it if present.
    pub fn remove(&self, client_id: &str) -> Option<Client> {
        self.clients.remove(client_id).map(|(_, client)| client)
    }

    /// Number of registered clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.get(client_id).map(|entry| entry.value().clone()))
    }
}
