//! Tenant status gate — the pure half.
//!
//! [`evaluate`] decides whether requests against a tenant may proceed.
//! It has no side effects: when an overdue tenant has exhausted its grace
//! period the verdict is [`TenantGateError::OverdueBlocked`], and the
//! caller is responsible for persisting the transition to `Blocked`
//! (see the `TenantGate` service in `agendou-auth`). Keeping the
//! predicate pure makes repeated evaluation idempotent and lets it be
//! tested without a data store.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::tenant::{PaymentStatus, Tenant};

/// Why a tenant is denied. Carries the data the HTTP layer needs for
/// machine-readable error codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantGateError {
    #[error("business is inactive or does not exist")]
    Inactive,

    #[error("business is blocked")]
    Blocked { blocked_at: Option<DateTime<Utc>> },

    #[error("business subscription is cancelled")]
    Cancelled,

    #[error("business is {days_overdue} days overdue, past its grace period")]
    OverdueBlocked {
        days_overdue: i64,
        due_date: DateTime<Utc>,
    },
}

/// Evaluate the gate for one tenant at one instant.
///
/// Branch order matters: inactive wins over any payment status, and an
/// already-blocked tenant short-circuits before the overdue arithmetic
/// runs, so re-evaluation after an auto-block is idempotent.
pub fn evaluate(tenant: &Tenant, now: DateTime<Utc>) -> Result<(), TenantGateError> {
    if !tenant.active {
        return Err(TenantGateError::Inactive);
    }

    match tenant.payment_status {
        PaymentStatus::Blocked => Err(TenantGateError::Blocked {
            blocked_at: tenant.blocked_at,
        }),
        PaymentStatus::Cancelled => Err(TenantGateError::Cancelled),
        PaymentStatus::Overdue => {
            if let Some(due_date) = tenant.due_date {
                let days_overdue = (now - due_date).num_days();
                if days_overdue > tenant.grace_days {
                    return Err(TenantGateError::OverdueBlocked {
                        days_overdue,
                        due_date,
                    });
                }
            }
            Ok(())
        }
        PaymentStatus::Active | PaymentStatus::Pending => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::models::tenant::{PlanTier, UsageLimits};

    fn tenant(payment_status: PaymentStatus) -> Tenant {
        let now = Utc::now();
        Tenant {
            id: Uuid::new_v4(),
            name: "Studio Teste".into(),
            slug: "studio-teste".into(),
            custom_domain: None,
            active: true,
            plan: PlanTier::Basic,
            payment_status,
            due_date: None,
            last_payment_at: None,
            blocked_at: None,
            grace_days: 5,
            limits: UsageLimits::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn active_tenant_passes() {
        let t = tenant(PaymentStatus::Active);
        assert!(evaluate(&t, Utc::now()).is_ok());
    }

    #[test]
    fn pending_tenant_passes() {
        let t = tenant(PaymentStatus::Pending);
        assert!(evaluate(&t, Utc::now()).is_ok());
    }

    #[test]
    fn inactive_flag_wins_over_payment_status() {
        let mut t = tenant(PaymentStatus::Active);
        t.active = false;
        assert_eq!(evaluate(&t, Utc::now()), Err(TenantGateError::Inactive));
    }

    #[test]
    fn blocked_tenant_is_denied_with_timestamp() {
        let mut t = tenant(PaymentStatus::Blocked);
        let blocked_at = Utc::now() - Duration::days(3);
        t.blocked_at = Some(blocked_at);
        assert_eq!(
            evaluate(&t, Utc::now()),
            Err(TenantGateError::Blocked {
                blocked_at: Some(blocked_at)
            })
        );
    }

    #[test]
    fn cancelled_tenant_is_denied() {
        let t = tenant(PaymentStatus::Cancelled);
        assert_eq!(evaluate(&t, Utc::now()), Err(TenantGateError::Cancelled));
    }

    #[test]
    fn overdue_within_grace_passes() {
        let now = Utc::now();
        let mut t = tenant(PaymentStatus::Overdue);
        t.due_date = Some(now - Duration::days(5));
        assert!(evaluate(&t, now).is_ok());
    }

    #[test]
    fn overdue_beyond_grace_is_denied_with_day_count() {
        let now = Utc::now();
        let due = now - Duration::days(6);
        let mut t = tenant(PaymentStatus::Overdue);
        t.due_date = Some(due);
        assert_eq!(
            evaluate(&t, now),
            Err(TenantGateError::OverdueBlocked {
                days_overdue: 6,
                due_date: due
            })
        );
    }

    #[test]
    fn overdue_without_due_date_passes() {
        let t = tenant(PaymentStatus::Overdue);
        assert!(evaluate(&t, Utc::now()).is_ok());
    }

    #[test]
    fn repeated_evaluation_after_block_short_circuits() {
        let now = Utc::now();
        let mut t = tenant(PaymentStatus::Overdue);
        t.due_date = Some(now - Duration::days(30));

        assert!(matches!(
            evaluate(&t, now),
            Err(TenantGateError::OverdueBlocked { .. })
        ));

        // Caller persists the transition; the next evaluation must take
        // the Blocked branch, not re-derive an overdue verdict.
        t.payment_status = PaymentStatus::Blocked;
        t.blocked_at = Some(now);
        assert!(matches!(
            evaluate(&t, now),
            Err(TenantGateError::Blocked { .. })
        ));
    }
}
