//! Roles, scopes and the permission evaluator.
//!
//! Each role carries a fixed scope set. Mutations declare the scope they
//! require (e.g. `review:create:self`); ownership of individual rows is
//! checked separately via [`require_owner`], where the admin role always
//! wins.

use std::collections::BTreeSet;

use crate::errors::AppError;

pub mod scopes;

pub use scopes::{scope_matches, scopes_for_role};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,
    Owner,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// The acting identity for a single request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    pub user_id: Option<i32>,
    role: Option<Role>,
    scopes: BTreeSet<String>,
}

impl Actor {
    /// An unauthenticated caller with no scopes.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            role: None,
            scopes: BTreeSet::new(),
        }
    }

    /// An authenticated user with the scope set of their role.
    pub fn user(user_id: i32, role: Role) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(role),
            scopes: scopes_for_role(role)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// True when any granted scope matches the requested one, honouring
    /// trailing `*` wildcards in the grant.
    pub fn has_scope(&self, requested: &str) -> bool {
        self.scopes
            .iter()
            .any(|granted| scope_matches(granted, requested))
    }
}

pub trait Authorizer {
    fn authorize(&self, actor: &Actor, scope: &str) -> Result<(), AppError>;
}

/// Scope-based evaluator used at every mutation entry point.
pub struct ScopeAuthorizer;

impl Authorizer for ScopeAuthorizer {
    fn authorize(&self, actor: &Actor, scope: &str) -> Result<(), AppError> {
        if actor.user_id.is_none() {
            return Err(AppError::unauthorized("User is not authenticated"));
        }

        if actor.has_scope(scope) {
            return Ok(());
        }

        Err(AppError::forbidden(format!(
            "Actor is not authorized for {}",
            scope
        )))
    }
}

/// Ownership check shared by edit/delete operations: admin always allowed,
/// otherwise the stored `user_id` must equal the actor's id.
pub fn require_owner(actor: &Actor, resource_user_id: i32) -> Result<(), AppError> {
    if actor.is_admin() {
        return Ok(());
    }

    match actor.user_id {
        None => Err(AppError::unauthorized("User is not authenticated")),
        Some(user_id) if user_id == resource_user_id => Ok(()),
        Some(_) => Err(AppError::forbidden(
            "Only the resource owner may perform this action",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppErrorKind;

    #[test]
    fn admin_scope_wildcards_cover_delete() {
        let admin = Actor::user(1, Role::Admin);
        assert!(admin.has_scope("restaurant:delete:self"));
        assert!(admin.has_scope("restaurant:update:self"));
        assert!(admin.has_scope("user:view:self"));
    }

    #[test]
    fn user_cannot_create_restaurants() {
        let user = Actor::user(2, Role::User);
        assert!(user.has_scope("review:create:self"));
        assert!(!user.has_scope("restaurant:create:self"));

        let err = ScopeAuthorizer
            .authorize(&user, "restaurant:create:self")
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::Forbidden);
    }

    #[test]
    fn anonymous_is_unauthorized() {
        let err = ScopeAuthorizer
            .authorize(&Actor::anonymous(), "basic")
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::Unauthorized);
    }

    #[test]
    fn ownership_admin_override() {
        let admin = Actor::user(1, Role::Admin);
        let owner = Actor::user(3, Role::Owner);
        let other = Actor::user(4, Role::Owner);

        assert!(require_owner(&admin, 3).is_ok());
        assert!(require_owner(&owner, 3).is_ok());
        assert_eq!(
            require_owner(&other, 3).unwrap_err().kind(),
            AppErrorKind::Forbidden
        );
    }
}
