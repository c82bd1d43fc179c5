
use rtg_auth::TenantContext;
use rtg_core::SCOPE_WS_CONNECT;

pub(crate) fn context(user_id: &str, tenant_id: &str) -> TenantContext {
    TenantContext::new(user_id, tenant_id, SCOPE_WS_CONNECT)
}
