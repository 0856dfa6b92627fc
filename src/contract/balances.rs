//! Account balances and total supply
//!
//! A balance entry doubles as the registration marker: an account with no
//! entry is unregistered and cannot hold or receive tokens.

use crate::contract::state::FtContract;
use crate::host::Host;
use crate::token::{parse_account_id, AccountId, FtMint, TokenError, U128};

impl FtContract {
    /// Whether the account has a balance entry
    pub fn is_registered<H: Host + ?Sized>(&self, host: &H, account_id: &AccountId) -> bool {
        self.accounts.contains_key(host, account_id)
    }

    /// Balance of a registered account
    pub fn get_balance<H: Host + ?Sized>(
        &self,
        host: &H,
        account_id: &AccountId,
    ) -> Result<u128, TokenError> {
        self.accounts
            .get(host, account_id)?
            .ok_or_else(|| TokenError::NotRegistered(account_id.clone()))
    }

    /// Balance lookup for untrusted input: the name is validated first
    pub fn ft_balance_of<H: Host + ?Sized>(
        &self,
        host: &H,
        account_id: &str,
    ) -> Result<U128, TokenError> {
        let account_id = parse_account_id(account_id)?;
        self.get_balance(host, &account_id).map(U128)
    }

    /// Overwrite a balance entry
    pub fn set_balance<H: Host + ?Sized>(
        &self,
        host: &mut H,
        account_id: &AccountId,
        balance: u128,
    ) -> Result<(), TokenError> {
        self.accounts.insert(host, account_id, &balance)?;
        Ok(())
    }

    /// Create new tokens on `owner_id`'s balance
    ///
    /// The owner entry is created at 0 when missing. Emits `ft_mint`.
    pub fn mint<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        owner_id: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::InvalidAmount);
        }

        let balance = self.accounts.get(host, owner_id)?.unwrap_or(0);
        let new_balance = balance
            .checked_add(amount)
            .ok_or_else(|| TokenError::BalanceOverflow(owner_id.clone()))?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.set_balance(host, owner_id, new_balance)?;
        self.total_supply = new_supply;

        log::info!("Minted {} tokens to {}", amount, owner_id);
        FtMint {
            owner_id,
            amount: U128(amount),
            memo: None,
        }
        .emit(host);

        Ok(())
    }
}
