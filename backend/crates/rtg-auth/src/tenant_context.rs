use crate::Claims;

/// Extracted tenant context available to handlers
/// This is the validated, trusted context after JWT verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: String,
    pub user_id: String,
    pub scope: String,
    pub role: Option<String>,
}

impl TenantContext {
    pub fn new(
        user_id: impl Into<String>,
        tenant_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
            scope: scope.into(),
            role: None,
        }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            tenant_id: claims.tenant_id.clone(),
            user_id: claims.sub.clone(),
            scope: claims.scope.clone(),
            role: claims.user_role.clone(),
        }
    }
}

impl From<Claims> for TenantContext {
    fn from(claims: Claims) -> Self {
        Self {
            tenant_id: claims.tenant_id,
            user_id: claims.sub,
            scope: claims.scope,
            role: claims.user_role,
        }
    }
}
