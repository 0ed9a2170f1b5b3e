//! Client registry trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Client;

/// Lookup of OAuth 2.0 client registrations.
///
/// # Example
///
/// ```ignore
/// use grantflow_auth::storage::ClientRegistry;
///
/// async fn example(registry: &dyn ClientRegistry) -> grantflow_auth::AuthResult<()> {
///     if let Some(client) = registry.find_by_client_id("c1").await? {
///         println!("Found client: {}", client.name);
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// Find a client by its OAuth client_id.
    ///
    /// Returns `None` if the client doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>>;
}
