// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cart lifecycle rules: checkout windows and transition guards.
//!
//! These are pure functions; the storage layer calls them inside its
//! transactions so every guard is enforced atomically with the mutation
//! it protects.

use chrono::{DateTime, Duration, Utc};

use crate::error::CarthubError;
use crate::types::CartStatus;

/// Operational policy for checkouts, loaded from configuration.
#[derive(Debug, Clone, Copy)]
pub struct FleetPolicy {
    /// Window applied at assignment: `return_by_time = now + window`.
    pub checkout_window_hours: i64,
    /// Maximum number of persons assigned to one cart.
    pub assignment_cap: usize,
}

impl Default for FleetPolicy {
    fn default() -> Self {
        Self {
            checkout_window_hours: 6,
            assignment_cap: 2,
        }
    }
}

/// Compute the checkout window applied when a cart transitions to in-use.
pub fn checkout_window(now: DateTime<Utc>, policy: &FleetPolicy) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + Duration::hours(policy.checkout_window_hours))
}

/// Guard for assigning `person_id` to a cart with the given assignees.
///
/// Rejects duplicate assignment and assignment past the cap. Any status
/// is assignable: assigning to an available or maintenance cart is what
/// triggers the transition into in-use.
pub fn check_assign(
    assignee_ids: &[i64],
    person_id: i64,
    policy: &FleetPolicy,
) -> Result<(), CarthubError> {
    if assignee_ids.contains(&person_id) {
        return Err(CarthubError::conflict(
            "Person is already assigned to this cart",
        ));
    }
    if assignee_ids.len() >= policy.assignment_cap {
        return Err(CarthubError::conflict(format!(
            "Cart already has the maximum of {} assigned staff",
            policy.assignment_cap
        )));
    }
    Ok(())
}

/// Guard for unassigning `person_id` from a cart.
pub fn check_unassign(assignee_ids: &[i64], person_id: i64) -> Result<(), CarthubError> {
    if !assignee_ids.contains(&person_id) {
        return Err(CarthubError::conflict(
            "Person is not assigned to this cart",
        ));
    }
    Ok(())
}

/// The return flow only applies to a checked-out cart.
pub fn check_return(status: CartStatus) -> Result<(), CarthubError> {
    if status != CartStatus::InUse {
        return Err(CarthubError::conflict("Cart is not checked out"));
    }
    Ok(())
}

/// Guard for a direct status edit.
///
/// Setting in-use without an assignee would break the status invariant,
/// so the edit is rejected; the assign operation is the way in.
pub fn check_status_edit(
    new_status: CartStatus,
    assignee_count: usize,
) -> Result<(), CarthubError> {
    if new_status == CartStatus::InUse && assignee_count == 0 {
        return Err(CarthubError::validation(
            "Cannot set a cart to in-use without an assigned person",
        ));
    }
    Ok(())
}

/// Status of the cart after one person is unassigned.
///
/// The cart stays in-use while other assignees remain; unassigning the
/// last person reverts it to available.
pub fn status_after_unassign(remaining_assignees: usize) -> CartStatus {
    if remaining_assignees > 0 {
        CartStatus::InUse
    } else {
        CartStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_window_defaults_to_six_hours() {
        let now = Utc::now();
        let policy = FleetPolicy::default();
        let (checkout, return_by) = checkout_window(now, &policy);
        assert_eq!(checkout, now);
        assert_eq!(return_by - checkout, Duration::hours(6));
    }

    #[test]
    fn assign_rejects_duplicate_person() {
        let policy = FleetPolicy::default();
        let err = check_assign(&[7], 7, &policy).expect_err("duplicate should be rejected");
        assert!(err.to_string().contains("already assigned"));
    }

    #[test]
    fn assign_rejects_past_the_cap() {
        let policy = FleetPolicy::default();
        assert!(check_assign(&[1], 2, &policy).is_ok());
        let err = check_assign(&[1, 2], 3, &policy).expect_err("cap is 2");
        assert!(err.to_string().contains("maximum"));
    }

    #[test]
    fn unassign_requires_existing_assignment() {
        assert!(check_unassign(&[1, 2], 2).is_ok());
        assert!(check_unassign(&[1], 2).is_err());
    }

    #[test]
    fn return_requires_in_use() {
        assert!(check_return(CartStatus::InUse).is_ok());
        assert!(check_return(CartStatus::Available).is_err());
        assert!(check_return(CartStatus::Maintenance).is_err());
    }

    #[test]
    fn direct_in_use_edit_requires_an_assignee() {
        assert!(check_status_edit(CartStatus::InUse, 0).is_err());
        assert!(check_status_edit(CartStatus::InUse, 1).is_ok());
        assert!(check_status_edit(CartStatus::Maintenance, 0).is_ok());
    }

    #[test]
    fn last_unassign_reverts_to_available() {
        assert_eq!(status_after_unassign(1), CartStatus::InUse);
        assert_eq!(status_after_unassign(0), CartStatus::Available);
    }
}
