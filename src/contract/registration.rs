//! Storage-rent registration
//!
//! Registering an account writes three records (balance, registrant,
//! deposit). Whoever registers pays for exactly the storage those records
//! take, measured by sampling the host's storage usage around the writes.
//!
//! Two signalling policies exist side by side:
//! - `ft_register` treats a short deposit or a duplicate as fatal
//! - `register` (behind `storage_deposit` and `ft_on_register`) returns a
//!   `RegistrationOutcome` with `success: false` and undoes its own writes

use crate::contract::ledger::send_native;
use crate::contract::state::FtContract;
use crate::host::Host;
use crate::token::{parse_account_id, AccountId, FtBurn, TokenError, U128};
use serde::{Deserialize, Serialize};

/// Result of a registration call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub success: bool,
    pub msg: String,
}

impl RegistrationOutcome {
    fn success(msg: String) -> Self {
        Self { success: true, msg }
    }

    fn failure(msg: String) -> Self {
        Self {
            success: false,
            msg,
        }
    }
}

/// Who paid for an account's storage, and how much
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub registrant_id: AccountId,
    pub deposit: U128,
}

/// Summary of an administrative reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    pub accounts_removed: u32,
    pub burned: U128,
}

impl FtContract {
    /// Write the three records of a new account and price their storage
    fn create_account_records<H: Host + ?Sized>(
        &self,
        host: &mut H,
        registrant_id: &AccountId,
        account_id: &AccountId,
    ) -> Result<u128, TokenError> {
        let initial_usage = host.storage_usage();
        self.accounts.insert(host, account_id, &0)?;
        self.registrants.insert(host, account_id, registrant_id)?;
        self.deposits.insert(host, account_id, &0)?;
        let bytes_used = host.storage_usage().saturating_sub(initial_usage);

        let required = u128::from(bytes_used).saturating_mul(host.storage_byte_cost());
        // Fixed-width value: rewriting the deposit does not change usage.
        self.deposits.insert(host, account_id, &required)?;
        Ok(required)
    }

    fn remove_account_records<H: Host + ?Sized>(
        &self,
        host: &mut H,
        account_id: &AccountId,
    ) -> Result<Option<u128>, TokenError> {
        let balance = self.accounts.remove(host, account_id)?;
        self.registrants.remove(host, account_id)?;
        self.deposits.remove(host, account_id)?;
        Ok(balance)
    }

    /// Register an account paid for by `payer_id`, reporting routine failures
    ///
    /// `target_id` defaults to the caller. An invalid name is fatal; an
    /// existing registration or a short deposit refunds the full attached
    /// deposit to the payer and returns `success: false`. Any excess over
    /// the storage cost goes to the registered account.
    pub fn register<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        payer_id: &AccountId,
        target_id: Option<&str>,
    ) -> Result<RegistrationOutcome, TokenError> {
        let account_id = match target_id {
            Some(id) => parse_account_id(id)?,
            None => host.predecessor_account_id().clone(),
        };
        let attached = host.attached_deposit();

        if self.is_registered(host, &account_id) {
            if attached > 0 {
                send_native(host, payer_id, attached)?;
            }
            return Ok(RegistrationOutcome::failure(format!(
                "Account {} is already registered",
                account_id
            )));
        }

        let required = self.create_account_records(host, payer_id, &account_id)?;

        if attached < required {
            self.remove_account_records(host, &account_id)?;
            if attached > 0 {
                send_native(host, payer_id, attached)?;
            }
            log::warn!(
                "Registration of {} rejected: required {}, attached {}",
                account_id,
                required,
                attached
            );
            return Ok(RegistrationOutcome::failure(format!(
                "Not enough deposit to register {}. Required: {}",
                account_id, required
            )));
        }

        let refund = attached - required;
        if refund > 0 {
            send_native(host, &account_id, refund)?;
        }

        log::info!(
            "Registered {} (paid by {}, storage deposit {})",
            account_id,
            payer_id,
            required
        );
        Ok(RegistrationOutcome::success(format!(
            "Account {} registered successfully",
            account_id
        )))
    }

    /// Register an account paid for by the caller, failing hard
    ///
    /// A duplicate or a short deposit aborts the call. Excess deposit is
    /// refunded to the caller.
    pub fn ft_register<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        account_id: Option<&str>,
    ) -> Result<RegistrationOutcome, TokenError> {
        let caller = host.predecessor_account_id().clone();
        let account_id = match account_id {
            Some(id) => parse_account_id(id)?,
            None => caller.clone(),
        };
        let attached = host.attached_deposit();

        if self.is_registered(host, &account_id) {
            return Err(TokenError::AlreadyRegistered(account_id));
        }

        let required = self.create_account_records(host, &caller, &account_id)?;
        if attached < required {
            // Fatal: the host discards the records written above.
            return Err(TokenError::InsufficientStorageDeposit { required, attached });
        }

        let refund = attached - required;
        if refund > 0 {
            host.log_str(&format!("Refunding {} yoctoNEAR to {}", refund, caller));
            send_native(host, &caller, refund)?;
        }

        log::info!("Registered {} (paid by {})", account_id, caller);
        Ok(RegistrationOutcome::success(format!(
            "Account {} registered with storage deposit of {}",
            account_id, required
        )))
    }

    /// Registration record of an account
    pub fn registration_of<H: Host + ?Sized>(
        &self,
        host: &H,
        account_id: &str,
    ) -> Result<Option<Registration>, TokenError> {
        let account_id = parse_account_id(account_id)?;
        let registrant_id = match self.registrants.get(host, &account_id)? {
            Some(id) => id,
            None => return Ok(None),
        };
        let deposit = self.deposits.get(host, &account_id)?.unwrap_or(0);
        Ok(Some(Registration {
            registrant_id,
            deposit: U128(deposit),
        }))
    }

    /// Remove every record of the listed accounts
    ///
    /// Removed balances leave the total supply with an `ft_burn` event, so
    /// the supply invariant still holds afterwards.
    pub fn remove_all<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        account_ids: &[AccountId],
    ) -> Result<ResetSummary, TokenError> {
        let mut summary = ResetSummary {
            accounts_removed: 0,
            burned: U128(0),
        };

        for account_id in account_ids {
            let had_registration = self.registrants.contains_key(host, account_id);
            let balance = self.remove_account_records(host, account_id)?;
            if balance.is_none() && !had_registration {
                continue;
            }
            summary.accounts_removed += 1;

            let balance = balance.unwrap_or(0);
            if balance > 0 {
                self.total_supply = self
                    .total_supply
                    .checked_sub(balance)
                    .ok_or(TokenError::SupplyUnderflow)?;
                summary.burned.0 += balance;
                FtBurn {
                    owner_id: account_id,
                    amount: U128(balance),
                    memo: Some("reset"),
                }
                .emit(host);
            }
        }

        log::warn!(
            "Reset removed {} accounts, burned {}",
            summary.accounts_removed,
            summary.burned.0
        );
        Ok(summary)
    }
}
