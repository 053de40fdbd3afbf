//! Permission checks against verified claims.

use super::error::{AuthError, AuthResult};
use super::types::Claims;

/// Confirm that `claims` grant `permission`.
///
/// A token without any `permissions` claim is a malformed request (400),
/// while a token that simply lacks this permission is forbidden (403).
pub fn check_permission(permission: &str, claims: &Claims) -> AuthResult<()> {
    if claims.permissions.is_none() {
        return Err(AuthError::PermissionsClaimMissing);
    }

    if !claims.has_permission(permission) {
        return Err(AuthError::PermissionDenied(permission.to_string()));
    }

    Ok(())
}
