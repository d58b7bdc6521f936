use thiserror::Error;

use storefront_core::UserId;

use crate::{JwtClaims, Role};

/// Authenticated caller, as seen by policy checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<Role>,
}

impl From<&JwtClaims> for Principal {
    fn from(claims: &JwtClaims) -> Self {
        Self {
            user_id: claims.sub,
            roles: claims.roles.clone(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Not authorized as a {0}")]
    MissingRole(Role),
}

/// Require `role`. `admin` satisfies every role.
pub fn require_role(principal: &Principal, role: &Role) -> Result<(), AuthzError> {
    if principal.roles.iter().any(|r| r == role || r.is_admin()) {
        Ok(())
    } else {
        Err(AuthzError::MissingRole(role.clone()))
    }
}

/// Catalog and bundle writes are seller-only.
pub fn require_seller(principal: &Principal) -> Result<(), AuthzError> {
    require_role(principal, &Role::SELLER)
}
