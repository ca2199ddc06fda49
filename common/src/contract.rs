//! Binding for the deployed SmartWallet contract.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{hex, Address, B256, U256};
use alloy_sol_types::{sol, SolCall};
use serde_json::{json, Value};

use crate::error::WalletError;
use crate::provider::{
    WalletProvider, ETH_CALL, ETH_GET_TRANSACTION_RECEIPT, ETH_SEND_TRANSACTION,
};

sol! {
    interface ISmartWallet {
        function getBalance() external view returns (uint256 balance);
        function deposit() external payable;
        function withdraw(uint256 amount) external;
        function timeLockedDeposit() external payable;
        function getTimeLockInfo() external view returns (uint256 amount, uint256 unlockTime);
    }
}

/// Where the SmartWallet contract is deployed.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xD357C19cE31dB04DF037ea073D76D7160D7bbcC6";

/// Authorization bound to one wallet account. State-changing calls are sent
/// `from` this account and signed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signer {
    account: Address,
}

impl Signer {
    pub fn new(account: Address) -> Self {
        Self { account }
    }

    pub fn address(&self) -> Address {
        self.account
    }
}

/// Locked funds and the earliest withdrawal time, as reported by the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLockInfo {
    pub amount: U256,
    /// Unix seconds. Zero when no time lock has been recorded.
    pub unlock_time: u64,
}

/// Contract-call handle authorized by a [`Signer`].
pub struct ContractHandle<'a, P> {
    provider: &'a P,
    contract: Address,
    signer: Signer,
    poll_interval: Duration,
}

impl<'a, P: WalletProvider> ContractHandle<'a, P> {
    pub fn new(provider: &'a P, contract: Address, signer: Signer, poll_interval: Duration) -> Self {
        Self {
            provider,
            contract,
            signer,
            poll_interval,
        }
    }

    pub fn account(&self) -> Address {
        self.signer.address()
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Balance held for the connected account, in wei.
    pub async fn get_balance(&self) -> Result<U256, WalletError> {
        let ret = self.call(ISmartWallet::getBalanceCall {}).await?;
        Ok(ret.balance)
    }

    /// Send `value` wei to the contract and wait until the transaction is mined.
    pub async fn deposit(&self, value: U256) -> Result<B256, WalletError> {
        let tx = self.send(ISmartWallet::depositCall {}, value).await?;
        self.wait_for_receipt(tx).await?;
        Ok(tx)
    }

    pub async fn withdraw(&self, amount: U256) -> Result<B256, WalletError> {
        self.send(ISmartWallet::withdrawCall { amount }, U256::ZERO)
            .await
    }

    pub async fn time_locked_deposit(&self, value: U256) -> Result<B256, WalletError> {
        self.send(ISmartWallet::timeLockedDepositCall {}, value).await
    }

    pub async fn get_time_lock_info(&self) -> Result<TimeLockInfo, WalletError> {
        let ret = self.call(ISmartWallet::getTimeLockInfoCall {}).await?;
        let unlock_time = u64::try_from(ret.unlockTime)
            .map_err(|_| WalletError::Decode(format!("unlock time {} out of range", ret.unlockTime)))?;
        Ok(TimeLockInfo {
            amount: ret.amount,
            unlock_time,
        })
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return, WalletError> {
        let params = json!([
            {
                "from": self.signer.address().to_string(),
                "to": self.contract.to_string(),
                "data": hex::encode_prefixed(call.abi_encode()),
            },
            "latest"
        ]);
        tracing::debug!("{} {}", ETH_CALL, C::SIGNATURE);
        let result = self.provider.request(ETH_CALL, params).await?;
        let bytes = decode_hex(&result)?;
        C::abi_decode_returns(&bytes, true).map_err(|e| WalletError::Decode(e.to_string()))
    }

    async fn send<C: SolCall>(&self, call: C, value: U256) -> Result<B256, WalletError> {
        let params = json!([{
            "from": self.signer.address().to_string(),
            "to": self.contract.to_string(),
            "data": hex::encode_prefixed(call.abi_encode()),
            "value": format!("0x{value:x}"),
        }]);
        let result = self.provider.request(ETH_SEND_TRANSACTION, params).await?;
        let hash = result
            .as_str()
            .and_then(|s| B256::from_str(s).ok())
            .ok_or_else(|| WalletError::Decode(format!("transaction hash {result}")))?;
        tracing::info!("Submitted {} as {hash} (value {value} wei)", C::SIGNATURE);
        Ok(hash)
    }

    /// Poll for the receipt until the node reports one. There is no deadline.
    async fn wait_for_receipt(&self, tx: B256) -> Result<(), WalletError> {
        loop {
            let receipt = self
                .provider
                .request(ETH_GET_TRANSACTION_RECEIPT, json!([tx.to_string()]))
                .await?;
            if receipt.is_null() {
                self.provider.pause(self.poll_interval).await;
                continue;
            }
            return match receipt.get("status").and_then(Value::as_str) {
                Some("0x0") => Err(WalletError::Reverted(tx.to_string())),
                _ => {
                    tracing::info!("Transaction {tx} confirmed");
                    Ok(())
                }
            };
        }
    }
}

fn decode_hex(value: &Value) -> Result<Vec<u8>, WalletError> {
    let text = value
        .as_str()
        .ok_or_else(|| WalletError::Decode(format!("expected hex string, got {value}")))?;
    hex::decode(text).map_err(|e| WalletError::Decode(e.to_string()))
}
