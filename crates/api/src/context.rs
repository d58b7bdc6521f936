use storefront_auth::{JwtClaims, Principal, Role};
use storefront_core::UserId;

/// Principal context for a request (authenticated identity + roles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    roles: Vec<Role>,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            roles: self.roles.clone(),
        }
    }
}

impl From<&JwtClaims> for PrincipalContext {
    fn from(claims: &JwtClaims) -> Self {
        Self::new(claims.sub, claims.roles.clone())
    }
}
