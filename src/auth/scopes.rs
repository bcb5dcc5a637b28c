//! Fixed role-to-scope table and scope string matching.

use super::Role;

/// Scope grants per role. `*` is a wildcard for the remaining segments.
pub fn scopes_for_role(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &[
            "basic",
            "user:*",
            "restaurant:view:*",
            "restaurant:delete:*",
            "restaurant:update:*",
        ],
        Role::User => &[
            "basic",
            "restaurant:view:all",
            "user:view:self",
            "user:update:self",
            "review:create:self",
        ],
        Role::Owner => &[
            "basic",
            "restaurant:view:self",
            "restaurant:create:self",
            "restaurant:delete:self",
            "restaurant:update:self",
            "reviewComment:create:self",
        ],
    }
}

/// Segment-wise match of a granted scope against a requested one.
/// A `*` segment in the grant matches that segment and everything after it.
pub fn scope_matches(granted: &str, requested: &str) -> bool {
    let mut granted_parts = granted.split(':');
    let mut requested_parts = requested.split(':');

    loop {
        match (granted_parts.next(), requested_parts.next()) {
            (Some("*"), _) => return true,
            (Some(g), Some(r)) if g == r => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}
