pub mod access_token;
pub mod claims;
pub mod error;
pub mod jwt_algorithm;
pub mod system_api_key;
pub mod tenant_context;
pub mod token_authority;
pub mod webhook_verifier;

pub use access_token::AccessToken;
pub use claims::Claims;
pub use error::{AuthError, Result as AuthResult};
pub use jwt_algorithm::JwtAlgorithm;
pub use system_api_key::SystemApiKey;
pub use tenant_context::TenantContext;
pub use token_authority::TokenAuthority;
pub use webhook_verifier::WebhookVerifier;

pub(crate) use error::Result;

#[cfg(test)]
mod tests;
