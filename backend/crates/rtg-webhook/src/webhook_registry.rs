use crate::WebhookRegistration;

use rtg_config::WebhookConfig;
use rtg_core::WebhookProvider;

use std::collections::HashMap;
use std::str::FromStr;

/// Signing secrets for inbound webhooks.
///
/// A tenant's own enabled registration wins over the provider-wide secret.
#[derive(Debug, Clone, Default)]
pub struct WebhookRegistry {
    provider_secrets: HashMap<WebhookProvider, String>,
    registrations: HashMap<(WebhookProvider, String), WebhookRegistration>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &WebhookConfig) -> Self {
        let mut registry = Self::new();

        for (name, secret) in &config.secrets {
            match WebhookProvider::from_str(name) {
                Ok(provider) => registry.set_provider_secret(provider, secret.clone()),
                Err(e) => log::warn!("Ignoring webhook secret: {e}"),
            }
        }

        for registration in &config.registrations {
            match WebhookProvider::from_str(&registration.provider) {
                Ok(provider) => registry.register(WebhookRegistration {
                    provider,
                    tenant_id: registration.tenant_id.clone(),
                    secret: registration.secret.clone(),
                    enabled: registration.enabled,
                }),
                Err(e) => log::warn!("Ignoring webhook registration: {e}"),
            }
        }

        registry
    }

    pub fn set_provider_secret(&mut self, provider: WebhookProvider, secret: String) {
        if secret.is_empty() {
            return;
        }
        self.provider_secrets.insert(provider, secret);
    }

    pub fn register(&mut self, registration: WebhookRegistration) {
        log::info!(
            "Webhook registered: provider={}, tenant={}, enabled={}",
            registration.provider,
            registration.tenant_id,
            registration.enabled
        );
        self.registrations.insert(
            (registration.provider, registration.tenant_id.clone()),
            registration,
        );
    }

    pub fn registration(
        &self,
        provider: WebhookProvider,
        tenant_id: &str,
    ) -> Option<&WebhookRegistration> {
        self.registrations.get(&(provider, tenant_id.to_string()))
    }

    /// Secret a request from `provider` for `tenant_id` must be signed with.
    /// `None` means signatures are not checked.
    pub fn secret_for(&self, provider: WebhookProvider, tenant_id: &str) -> Option<&str> {
        self.registration(provider, tenant_id)
            .filter(|registration| registration.enabled && !registration.secret.is_empty())
            .map(|registration| registration.secret.as_str())
            .or_else(|| self.provider_secrets.get(&provider).map(String::as_str))
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }
}
