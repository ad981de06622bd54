//! Pure authorization decisions.
//!
//! No I/O and no partial outcomes: every function reduces to a single
//! allow/deny boolean that the caller maps onto its own error type.

use crate::principal::Principal;
use crate::role::Role;

/// True iff the principal's role is a member of `allowed`.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> bool {
    allowed.contains(&principal.role)
}

/// True iff the principal holds one of `privileged` or owns the resource.
///
/// Owner ids and subject ids are compared in the same canonical string
/// form. Callers must pass the owner id rendered exactly as subject ids are
/// rendered into tokens; comparing differently typed representations of the
/// same id is how ownership checks get bypassed.
pub fn require_owner_or_role(
    principal: &Principal,
    resource_owner_id: &str,
    privileged: &[Role],
) -> bool {
    require_role(principal, privileged) || principal.subject_id == resource_owner_id
}
