use rtg_core::WebhookProvider;

/// Signing secret one tenant registered for one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookRegistration {
    pub provider: WebhookProvider,
    pub tenant_id: String,
    pub secret: String,
    pub enabled: bool,
}

impl WebhookRegistration {
    pub fn new(
        provider: WebhookProvider,
        tenant_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tenant_id: tenant_id.into(),
            secret: secret.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl std::fmt::Debug for WebhookRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookRegistration")
            .field("provider", &self.provider)
            .field("tenant_id", &self.tenant_id)
            .field("secret", &"***")
            .field("enabled", &self.enabled)
            .finish()
    }
}
