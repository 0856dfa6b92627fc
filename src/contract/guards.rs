//! Call guards
//!
//! Access and payment checks composed explicitly at the top of each entry
//! point, before any state is touched.

use crate::host::Host;
use crate::token::TokenError;

/// Only the contract account itself may call `method`
pub fn require_private_caller<H: Host + ?Sized>(host: &H, method: &str) -> Result<(), TokenError> {
    if host.predecessor_account_id() != host.current_account_id() {
        return Err(TokenError::PrivateMethod(method.to_string()));
    }
    Ok(())
}

/// Exactly one yoctoNEAR must be attached (full-access key confirmation)
pub fn require_one_yocto<H: Host + ?Sized>(host: &H) -> Result<(), TokenError> {
    let attached = host.attached_deposit();
    if attached != 1 {
        return Err(TokenError::RequiresOneYocto(attached));
    }
    Ok(())
}

/// The call must be relayed through another contract
pub fn require_cross_contract_call<H: Host + ?Sized>(host: &H) -> Result<(), TokenError> {
    if host.signer_account_id() == host.predecessor_account_id() {
        return Err(TokenError::NotCrossContractCall);
    }
    Ok(())
}

/// Non-payable methods reject any attached deposit
pub fn require_no_deposit<H: Host + ?Sized>(host: &H, method: &str) -> Result<(), TokenError> {
    if host.attached_deposit() != 0 {
        return Err(TokenError::DepositNotAllowed(method.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ExecutionContext, MockHost, MockHostConfig};
    use crate::token::{parse_account_id, AccountId};

    fn id(s: &str) -> AccountId {
        parse_account_id(s).unwrap()
    }

    fn host_with(ctx: ExecutionContext) -> MockHost {
        let mut host = MockHost::new(MockHostConfig::default());
        host.set_context(ctx);
        host
    }

    #[test]
    fn test_private_caller() {
        let contract_id = MockHostConfig::default().current_account_id;
        let host = host_with(ExecutionContext::direct(contract_id));
        assert!(require_private_caller(&host, "ft_mint").is_ok());

        let host = host_with(ExecutionContext::direct(id("alice.near")));
        assert!(matches!(
            require_private_caller(&host, "ft_mint"),
            Err(TokenError::PrivateMethod(ref m)) if m == "ft_mint"
        ));
    }

    #[test]
    fn test_one_yocto() {
        for (deposit, ok) in [(0, false), (1, true), (2, false)] {
            let host = host_with(ExecutionContext::direct(id("alice.near")).with_deposit(deposit));
            assert_eq!(require_one_yocto(&host).is_ok(), ok, "deposit {}", deposit);
        }
    }

    #[test]
    fn test_cross_contract_call() {
        let host = host_with(ExecutionContext::direct(id("alice.near")));
        assert!(matches!(
            require_cross_contract_call(&host),
            Err(TokenError::NotCrossContractCall)
        ));

        let host = host_with(ExecutionContext::relayed(
            id("alice.near"),
            id("shop.near"),
        ));
        assert!(require_cross_contract_call(&host).is_ok());
    }

    #[test]
    fn test_no_deposit() {
        let host = host_with(ExecutionContext::direct(id("alice.near")).with_deposit(1));
        assert!(matches!(
            require_no_deposit(&host, "ft_update_rate"),
            Err(TokenError::DepositNotAllowed(_))
        ));
    }
}
