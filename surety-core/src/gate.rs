//! Operational gate.
//!
//! A process-wide switch checked first by every mutating operation. When the
//! gate is down all mutating calls fail with `OperationBlocked`; read-only
//! queries are unaffected. Only the designated admin account may flip it.

use crate::error::{SuretyError, SuretyResult};
use crate::types::AccountId;
use tracing::warn;

/// Process-wide operational switch.
#[derive(Clone, Debug)]
pub struct OperationalGate {
    operational: bool,
    admin: AccountId,
}

impl OperationalGate {
    /// Create an open gate administered by `admin`.
    pub fn new(admin: AccountId) -> Self {
        Self {
            operational: true,
            admin,
        }
    }

    /// Current operating status. No side effect.
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Flip the operating status. Restricted to the admin account.
    /// Setting the current value again is a no-op, not an error.
    pub fn set_operating_status(&mut self, value: bool, caller: &AccountId) -> SuretyResult<()> {
        if caller != &self.admin {
            return Err(SuretyError::Unauthorized {
                caller: caller.clone(),
                action: "set operating status".to_string(),
            });
        }
        if self.operational != value {
            warn!(operational = value, "operating status changed");
            self.operational = value;
        }
        Ok(())
    }

    /// Fail with `OperationBlocked` when the gate is down.
    pub fn require_operational(&self) -> SuretyResult<()> {
        if self.operational {
            Ok(())
        } else {
            Err(SuretyError::OperationBlocked)
        }
    }
}
