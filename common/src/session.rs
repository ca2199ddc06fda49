//! Wallet session management.
//!
//! `connect()` walks the provider through permission and account retrieval
//! and hands back a [`ContractHandle`] authorized by the resulting signer.

use std::cell::RefCell;
use std::time::Duration;

use alloy_primitives::Address;
use futures::lock::Mutex;
use serde_json::{json, Value};

use crate::config::{SessionPolicy, WalletConfig};
use crate::contract::{ContractHandle, Signer};
use crate::error::WalletError;
use crate::provider::{WalletProvider, ETH_ACCOUNTS, ETH_REQUEST_ACCOUNTS};

pub struct SessionManager<P> {
    provider: Option<P>,
    contract: Address,
    policy: SessionPolicy,
    poll_interval: Duration,
    cached: RefCell<Option<Signer>>,
    /// Held while a wallet prompt is outstanding so concurrent callers wait
    /// for it instead of prompting again.
    authorizing: Mutex<()>,
}

impl<P: WalletProvider> SessionManager<P> {
    /// `provider` is `None` when the browser has no injected wallet.
    pub fn new(provider: Option<P>, config: &WalletConfig) -> Self {
        Self {
            provider,
            contract: config.contract_address,
            policy: config.session_policy,
            poll_interval: config.receipt_poll_interval,
            cached: RefCell::new(None),
            authorizing: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Account of the cached session, if any.
    pub fn account(&self) -> Option<Address> {
        self.cached.borrow().as_ref().map(Signer::address)
    }

    /// Acquire a contract handle, prompting the wallet unless a cached
    /// session may be reused.
    pub async fn connect(&self) -> Result<ContractHandle<'_, P>, WalletError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(WalletError::ProviderUnavailable)?;

        let signer = match self.policy {
            SessionPolicy::Reprompt => authorize(provider).await?,
            SessionPolicy::Reuse => {
                let _prompt = self.authorizing.lock().await;
                // another caller may have finished the prompt while we waited
                let cached = self.cached.borrow().clone();
                match cached {
                    Some(signer) => signer,
                    None => {
                        let signer = authorize(provider).await?;
                        tracing::info!("Wallet connected as {}", signer.address());
                        *self.cached.borrow_mut() = Some(signer.clone());
                        signer
                    }
                }
            }
        };

        Ok(ContractHandle::new(
            provider,
            self.contract,
            signer,
            self.poll_interval,
        ))
    }

    /// Drop the cached session so the next `connect()` prompts again.
    pub fn invalidate(&self) {
        if self.cached.borrow_mut().take().is_some() {
            tracing::info!("Wallet session invalidated");
        }
    }

    /// Handle an `accountsChanged` notification. Returns the new primary
    /// account, or `None` when the wallet no longer exposes one.
    pub fn accounts_changed(&self, accounts: &[String]) -> Option<Address> {
        let primary = accounts.first().and_then(|a| a.parse::<Address>().ok());
        if primary != self.account() {
            self.invalidate();
        }
        primary
    }
}

/// Request permission, then read the account the signer is bound to.
async fn authorize<P: WalletProvider>(provider: &P) -> Result<Signer, WalletError> {
    provider.request(ETH_REQUEST_ACCOUNTS, json!([])).await?;
    let accounts = provider.request(ETH_ACCOUNTS, json!([])).await?;
    let account = first_account(&accounts)?;
    Ok(Signer::new(account))
}

fn first_account(accounts: &Value) -> Result<Address, WalletError> {
    let raw = accounts
        .as_array()
        .and_then(|list| list.first())
        .and_then(Value::as_str)
        .ok_or_else(|| WalletError::RpcFailure("wallet returned no accounts".into()))?;
    raw.parse()
        .map_err(|_| WalletError::RpcFailure(format!("malformed account address {raw:?}")))
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::error::ProviderError;
    use crate::provider::mock::ScriptedProvider;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    fn manager(policy: SessionPolicy, provider: Option<ScriptedProvider>) -> SessionManager<ScriptedProvider> {
        let config = WalletConfig {
            session_policy: policy,
            ..WalletConfig::default()
        };
        SessionManager::new(provider, &config)
    }

    #[test]
    fn test_missing_provider() {
        let session = manager(SessionPolicy::Reuse, None);
        let err = block_on(session.connect()).err().unwrap();
        assert_eq!(err, WalletError::ProviderUnavailable);
    }

    #[test]
    fn test_connect_binds_signer_account() {
        let provider = ScriptedProvider::new();
        provider.grant(ALICE);
        let session = manager(SessionPolicy::Reprompt, Some(provider));
        let handle = block_on(session.connect()).unwrap();
        assert_eq!(handle.account(), ALICE.parse::<Address>().unwrap());
        assert_eq!(handle.contract_address(), WalletConfig::default().contract_address);

        let requests = session.provider().unwrap().requests();
        assert_eq!(requests[0].0, ETH_REQUEST_ACCOUNTS);
        assert_eq!(requests[1].0, ETH_ACCOUNTS);
    }

    #[test]
    fn test_reprompt_asks_every_time() {
        let provider = ScriptedProvider::new();
        provider.grant(ALICE).grant(ALICE);
        let session = manager(SessionPolicy::Reprompt, Some(provider));
        block_on(session.connect()).unwrap();
        block_on(session.connect()).unwrap();
        assert_eq!(session.provider().unwrap().count(ETH_REQUEST_ACCOUNTS), 2);
        assert_eq!(session.account(), None);
    }

    #[test]
    fn test_reuse_asks_once_until_accounts_change() {
        let provider = ScriptedProvider::new();
        provider.grant(ALICE).grant(BOB);
        let session = manager(SessionPolicy::Reuse, Some(provider));
        block_on(session.connect()).unwrap();
        block_on(session.connect()).unwrap();
        assert_eq!(session.provider().unwrap().count(ETH_REQUEST_ACCOUNTS), 1);

        // same account: the session stays
        session.accounts_changed(&[ALICE.to_lowercase()]);
        assert!(session.account().is_some());

        let bob: Address = BOB.parse().unwrap();
        assert_eq!(session.accounts_changed(&[BOB.to_string()]), Some(bob));
        assert_eq!(session.account(), None);
        let handle = block_on(session.connect()).unwrap();
        assert_eq!(handle.account(), bob);
        assert_eq!(session.provider().unwrap().count(ETH_REQUEST_ACCOUNTS), 2);
    }

    #[test]
    fn test_concurrent_connects_share_one_prompt() {
        let provider = ScriptedProvider::new();
        provider.delay(ETH_REQUEST_ACCOUNTS).grant(ALICE).grant(ALICE);
        let session = manager(SessionPolicy::Reuse, Some(provider));
        let (first, second) =
            block_on(async { futures::join!(session.connect(), session.connect()) });

        let alice: Address = ALICE.parse().unwrap();
        assert_eq!(first.unwrap().account(), alice);
        assert_eq!(second.unwrap().account(), alice);
        assert_eq!(session.provider().unwrap().count(ETH_REQUEST_ACCOUNTS), 1);
    }

    #[test]
    fn test_rejection_is_reported() {
        let provider = ScriptedProvider::new();
        provider.respond(ETH_REQUEST_ACCOUNTS, Err(ProviderError::user_rejected()));
        let session = manager(SessionPolicy::Reuse, Some(provider));
        let err = block_on(session.connect()).err().unwrap();
        assert!(matches!(err, WalletError::UserRejected(_)));
        assert_eq!(session.account(), None);
    }

    #[test]
    fn test_empty_account_list() {
        let provider = ScriptedProvider::new();
        provider
            .respond(ETH_REQUEST_ACCOUNTS, Ok(json!([])))
            .respond(ETH_ACCOUNTS, Ok(json!([])));
        let session = manager(SessionPolicy::Reuse, Some(provider));
        let err = block_on(session.connect()).err().unwrap();
        assert!(matches!(err, WalletError::RpcFailure(_)));
    }
}
