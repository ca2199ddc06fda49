//! Binding to the wallet injected into the page as `window.ethereum`.
//!
//! Requests are forwarded to the EIP-1193 `request({ method, params })`
//! function and its promise is awaited on the browser event loop.

use std::time::Duration;

use serde_json::Value;

use smart_wallet_common::error::ProviderError;
use smart_wallet_common::provider::WalletProvider;

/// JSON-RPC "internal error", used for failures on our side of the boundary.
const INTERNAL_ERROR: i64 = -32603;

#[cfg(target_family = "wasm")]
pub use wasm_impl::InjectedProvider;

#[cfg(not(target_family = "wasm"))]
pub use native_stub::InjectedProvider;

#[cfg(target_family = "wasm")]
mod wasm_impl {
    use js_sys::{Function, Promise, Reflect};
    use serde::Serialize;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use super::*;

    pub struct InjectedProvider {
        ethereum: JsValue,
    }

    impl InjectedProvider {
        /// Returns `None` when no wallet extension injected itself.
        pub fn detect() -> Option<Self> {
            let window = web_sys::window()?;
            let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
            if ethereum.is_undefined() || ethereum.is_null() {
                tracing::warn!("No injected wallet provider found");
                return None;
            }
            Some(Self { ethereum })
        }

        fn function(&self, name: &str) -> Result<Function, ProviderError> {
            Reflect::get(&self.ethereum, &JsValue::from_str(name))
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok())
                .ok_or_else(|| {
                    ProviderError::new(INTERNAL_ERROR, format!("provider has no {name}()"))
                })
        }

        /// Register for `accountsChanged`. The listener lives for the page.
        pub fn on_accounts_changed(&self, mut callback: impl FnMut(Vec<String>) + 'static) {
            let on = match self.function("on") {
                Ok(on) => on,
                Err(e) => {
                    tracing::warn!("Cannot watch account changes: {e}");
                    return;
                }
            };
            let listener = Closure::<dyn FnMut(JsValue)>::new(move |accounts: JsValue| {
                let accounts: Vec<String> =
                    serde_wasm_bindgen::from_value(accounts).unwrap_or_default();
                tracing::info!("Wallet accounts changed: {accounts:?}");
                callback(accounts);
            });
            if let Err(e) = on.call2(
                &self.ethereum,
                &JsValue::from_str("accountsChanged"),
                listener.as_ref(),
            ) {
                tracing::warn!("Failed to register accountsChanged listener: {e:?}");
            }
            listener.forget();
        }
    }

    impl WalletProvider for InjectedProvider {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
            let args = serde_json::json!({ "method": method, "params": params });
            let args = args
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(|e| ProviderError::new(INTERNAL_ERROR, e.to_string()))?;

            tracing::debug!("-> {method}");
            let promise: Promise = self
                .function("request")?
                .call1(&self.ethereum, &args)
                .map_err(provider_error)?
                .dyn_into()
                .map_err(|_| {
                    ProviderError::new(INTERNAL_ERROR, "request() did not return a promise")
                })?;
            let result = JsFuture::from(promise).await.map_err(provider_error)?;
            tracing::debug!("<- {method}");

            serde_wasm_bindgen::from_value(result)
                .map_err(|e| ProviderError::new(INTERNAL_ERROR, e.to_string()))
        }

        async fn pause(&self, interval: Duration) {
            let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
            gloo_timers::future::TimeoutFuture::new(millis).await;
        }
    }

    /// Read `{ code, message }` off a rejected provider promise.
    fn provider_error(err: JsValue) -> ProviderError {
        let code = Reflect::get(&err, &JsValue::from_str("code"))
            .ok()
            .and_then(|c| c.as_f64())
            .map(|c| c as i64)
            .unwrap_or(INTERNAL_ERROR);
        let message = Reflect::get(&err, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_else(|| format!("{err:?}"));
        ProviderError::new(code, message)
    }
}

// Non-WASM stub for type checking
#[cfg(not(target_family = "wasm"))]
mod native_stub {
    use super::*;

    pub struct InjectedProvider;

    impl InjectedProvider {
        pub fn detect() -> Option<Self> {
            None
        }

        pub fn on_accounts_changed(&self, _callback: impl FnMut(Vec<String>) + 'static) {}
    }

    impl WalletProvider for InjectedProvider {
        async fn request(&self, _method: &str, _params: Value) -> Result<Value, ProviderError> {
            Err(ProviderError::new(
                INTERNAL_ERROR,
                "injected provider only available in WASM",
            ))
        }

        async fn pause(&self, _interval: Duration) {}
    }
}
