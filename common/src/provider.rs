//! EIP-1193 wallet provider boundary.
//!
//! The browser binding lives in the UI crate; everything here only sees the
//! `request(method, params)` surface so handlers can be driven by a scripted
//! provider in tests.

use std::time::Duration;

use serde_json::Value;

use crate::error::ProviderError;

pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_ACCOUNTS: &str = "eth_accounts";
pub const ETH_CALL: &str = "eth_call";
pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const ETH_GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";

/// An injected wallet capability (e.g. `window.ethereum`).
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// Forward one JSON-RPC request to the wallet and await its result.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Yield to the event loop between receipt polls.
    async fn pause(&self, interval: Duration);
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    /// Provider that answers from a script and records every request.
    #[derive(Default)]
    pub struct ScriptedProvider {
        responses: RefCell<VecDeque<(String, Result<Value, ProviderError>)>>,
        requests: RefCell<Vec<(String, Value)>>,
        delayed: RefCell<Vec<String>>,
        pauses: RefCell<u32>,
    }

    /// Returns `Pending` once, letting other joined futures run first.
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    impl ScriptedProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the answer for the next request of `method`.
        pub fn respond(&self, method: &str, result: Result<Value, ProviderError>) -> &Self {
            self.responses
                .borrow_mut()
                .push_back((method.to_string(), result));
            self
        }

        /// Script a successful `eth_requestAccounts` + `eth_accounts` pair.
        pub fn grant(&self, account: &str) -> &Self {
            self.respond(ETH_REQUEST_ACCOUNTS, Ok(serde_json::json!([account])))
                .respond(ETH_ACCOUNTS, Ok(serde_json::json!([account])))
        }

        /// Make the next request of `method` suspend once before it is answered.
        pub fn delay(&self, method: &str) -> &Self {
            self.delayed.borrow_mut().push(method.to_string());
            self
        }

        pub fn requests(&self) -> Vec<(String, Value)> {
            self.requests.borrow().clone()
        }

        pub fn count(&self, method: &str) -> usize {
            self.requests
                .borrow()
                .iter()
                .filter(|(m, _)| m == method)
                .count()
        }

        pub fn pauses(&self) -> u32 {
            *self.pauses.borrow()
        }
    }

    impl WalletProvider for ScriptedProvider {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
            self.requests
                .borrow_mut()
                .push((method.to_string(), params));
            let delayed = {
                let mut delayed = self.delayed.borrow_mut();
                let position = delayed.iter().position(|m| m == method);
                position.map(|i| delayed.remove(i)).is_some()
            };
            if delayed {
                YieldNow(false).await;
            }
            let mut responses = self.responses.borrow_mut();
            let position = responses.iter().position(|(m, _)| m == method);
            match position.and_then(|i| responses.remove(i)) {
                Some((_, result)) => result,
                None => Err(ProviderError::new(-32601, format!("unscripted {method}"))),
            }
        }

        async fn pause(&self, _interval: Duration) {
            *self.pauses.borrow_mut() += 1;
        }
    }
}
