//! Complaint lifecycle state machine.
//!
//! Pure transition rules for complaint statuses. The [`ComplaintService`]
//! applies the plan returned here against the database; this module never
//! touches a connection.
//!
//! [`ComplaintService`]: crate::services::complaint::ComplaintService

use echocity_db::entities::complaint::ComplaintStatus;

/// Who is attempting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A user with the admin role.
    Admin,
    /// The citizen who filed the complaint.
    Owner,
    /// Anyone else.
    Other,
}

/// Outcome of planning a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// The transition is legal and should be applied.
    Apply,
    /// The record is already in the target state; skip the write.
    NoOp,
}

/// Plan a status transition.
///
/// Returns `Ok(TransitionKind::NoOp)` when an admin or the owner repeats
/// the current state, so concurrent duplicate requests do not churn
/// timestamps or fire side effects twice. Anyone else is rejected before
/// the shortcut applies. Returns `Err` with a human-readable reason when
/// the transition is not legal for this actor.
pub fn plan_transition(
    current: ComplaintStatus,
    target: ComplaintStatus,
    actor: Actor,
) -> Result<TransitionKind, String> {
    // Strangers have no moves at all. Repeating the current state must
    // fail too: a no-op still hands the record back to the caller.
    if actor == Actor::Other {
        return Err("only an admin may change complaint status".to_string());
    }

    if current == target {
        return Ok(TransitionKind::NoOp);
    }

    // The owner's only move is disputing a resolution.
    if actor == Actor::Owner {
        if current == ComplaintStatus::Resolved && target == ComplaintStatus::PendingVerification {
            return Ok(TransitionKind::Apply);
        }
        return Err(format!(
            "only an admin may move a complaint from {} to {}",
            current.as_str(),
            target.as_str()
        ));
    }

    let allowed: &[ComplaintStatus] = match current {
        ComplaintStatus::Pending => &[
            ComplaintStatus::Approved,
            ComplaintStatus::InProgress,
            ComplaintStatus::Rejected,
        ],
        ComplaintStatus::Approved => {
            &[ComplaintStatus::InProgress, ComplaintStatus::Resolved]
        }
        ComplaintStatus::InProgress => &[ComplaintStatus::Resolved],
        ComplaintStatus::PendingVerification => {
            &[ComplaintStatus::Resolved, ComplaintStatus::Reopened]
        }
        ComplaintStatus::Reopened => &[
            ComplaintStatus::Approved,
            ComplaintStatus::InProgress,
            ComplaintStatus::Rejected,
        ],
        // Terminal for admins; only the owner's dispute leaves resolved.
        ComplaintStatus::Resolved | ComplaintStatus::Rejected => &[],
    };

    if allowed.contains(&target) {
        Ok(TransitionKind::Apply)
    } else {
        Err(format!(
            "cannot move a complaint from {} to {}",
            current.as_str(),
            target.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplaintStatus::{
        Approved, InProgress, Pending, PendingVerification, Rejected, Reopened, Resolved,
    };

    #[test]
    fn admin_triage_from_pending() {
        for target in [Approved, InProgress, Rejected] {
            assert_eq!(
                plan_transition(Pending, target, Actor::Admin),
                Ok(TransitionKind::Apply)
            );
        }
    }

    #[test]
    fn pending_cannot_skip_to_resolved() {
        let result = plan_transition(Pending, Resolved, Actor::Admin);
        assert!(result.is_err());
    }

    #[test]
    fn approved_moves_forward() {
        assert_eq!(
            plan_transition(Approved, InProgress, Actor::Admin),
            Ok(TransitionKind::Apply)
        );
        assert_eq!(
            plan_transition(Approved, Resolved, Actor::Admin),
            Ok(TransitionKind::Apply)
        );
        assert!(plan_transition(Approved, Rejected, Actor::Admin).is_err());
    }

    #[test]
    fn in_progress_only_resolves() {
        assert_eq!(
            plan_transition(InProgress, Resolved, Actor::Admin),
            Ok(TransitionKind::Apply)
        );
        assert!(plan_transition(InProgress, Pending, Actor::Admin).is_err());
        assert!(plan_transition(InProgress, Rejected, Actor::Admin).is_err());
    }

    #[test]
    fn owner_may_dispute_resolution() {
        assert_eq!(
            plan_transition(Resolved, PendingVerification, Actor::Owner),
            Ok(TransitionKind::Apply)
        );
    }

    #[test]
    fn owner_may_do_nothing_else() {
        assert!(plan_transition(Pending, Approved, Actor::Owner).is_err());
        assert!(plan_transition(Pending, Rejected, Actor::Owner).is_err());
        assert!(plan_transition(InProgress, Resolved, Actor::Owner).is_err());
    }

    #[test]
    fn other_users_may_do_nothing() {
        assert!(plan_transition(Pending, Approved, Actor::Other).is_err());
        assert!(plan_transition(Resolved, PendingVerification, Actor::Other).is_err());
    }

    #[test]
    fn same_state_is_not_a_noop_for_strangers() {
        for status in [
            Pending,
            Approved,
            InProgress,
            PendingVerification,
            Resolved,
            Rejected,
            Reopened,
        ] {
            assert!(plan_transition(status, status, Actor::Other).is_err());
        }
    }

    #[test]
    fn resolved_is_terminal_for_admins() {
        for target in [Pending, Approved, InProgress, Rejected, Reopened] {
            assert!(plan_transition(Resolved, target, Actor::Admin).is_err());
        }
    }

    #[test]
    fn rejected_is_terminal() {
        for target in [Pending, Approved, InProgress, Resolved, Reopened] {
            assert!(plan_transition(Rejected, target, Actor::Admin).is_err());
        }
    }

    #[test]
    fn disputed_resolution_gets_reviewed() {
        assert_eq!(
            plan_transition(PendingVerification, Resolved, Actor::Admin),
            Ok(TransitionKind::Apply)
        );
        assert_eq!(
            plan_transition(PendingVerification, Reopened, Actor::Admin),
            Ok(TransitionKind::Apply)
        );
        assert!(plan_transition(PendingVerification, Rejected, Actor::Admin).is_err());
    }

    #[test]
    fn reopened_restarts_triage() {
        for target in [Approved, InProgress, Rejected] {
            assert_eq!(
                plan_transition(Reopened, target, Actor::Admin),
                Ok(TransitionKind::Apply)
            );
        }
        assert!(plan_transition(Reopened, Resolved, Actor::Admin).is_err());
    }

    #[test]
    fn same_state_is_a_noop_for_admin_and_owner() {
        for status in [
            Pending,
            Approved,
            InProgress,
            PendingVerification,
            Resolved,
            Rejected,
            Reopened,
        ] {
            for actor in [Actor::Admin, Actor::Owner] {
                assert_eq!(
                    plan_transition(status, status, actor),
                    Ok(TransitionKind::NoOp)
                );
            }
        }
    }
}
