//! Authorization of administrative calls.
//!
//! The oracle asks an [`Authorizer`] whether a caller may change the
//! deviation guard. [`OwnerAuthority`] is the single-owner policy; any
//! closure `Fn(&AccountId) -> bool` can stand in for other policies.

use cvi_types::AccountId;
use serde::{Deserialize, Serialize};

use crate::{OracleError, Result};

/// Decides whether a caller may perform administrative operations.
pub trait Authorizer {
    /// Return `true` if `caller` is allowed to administer the oracle.
    fn is_authorized(&self, caller: &AccountId) -> bool;
}

impl<F> Authorizer for F
where
    F: Fn(&AccountId) -> bool,
{
    fn is_authorized(&self, caller: &AccountId) -> bool {
        self(caller)
    }
}

/// Fail with [`OracleError::Unauthorized`] unless `authorizer` admits `caller`.
pub fn require_authorized<A: Authorizer + ?Sized>(authorizer: &A, caller: &AccountId) -> Result<()> {
    if authorizer.is_authorized(caller) {
        Ok(())
    } else {
        tracing::warn!(caller = %short_id(caller), "access: unauthorized admin call");
        Err(OracleError::Unauthorized)
    }
}

/// Single-owner access control.
///
/// Once renounced, no caller is ever authorized again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAuthority {
    owner: Option<AccountId>,
}

impl OwnerAuthority {
    /// Create an authority owned by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self { owner: Some(owner) }
    }

    /// The current owner, if any.
    pub fn owner(&self) -> Option<&AccountId> {
        self.owner.as_ref()
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if `caller` is not the owner
    pub fn transfer_ownership(&mut self, caller: &AccountId, new_owner: AccountId) -> Result<()> {
        require_authorized(self, caller)?;
        tracing::info!(
            from = %short_id(caller),
            to = %short_id(&new_owner),
            "access: ownership transferred"
        );
        self.owner = Some(new_owner);
        Ok(())
    }

    /// Give up ownership for good.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if `caller` is not the owner
    pub fn renounce_ownership(&mut self, caller: &AccountId) -> Result<()> {
        require_authorized(self, caller)?;
        tracing::info!(from = %short_id(caller), "access: ownership renounced");
        self.owner = None;
        Ok(())
    }
}

impl Authorizer for OwnerAuthority {
    fn is_authorized(&self, caller: &AccountId) -> bool {
        self.owner.as_ref() == Some(caller)
    }
}

/// First four bytes of an account id, hex encoded, for log lines.
fn short_id(id: &AccountId) -> String {
    hex::encode(&id[..4])
}
