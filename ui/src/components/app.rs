use std::rc::Rc;

use dioxus::prelude::*;

use smart_wallet_common::config::WalletConfig;
use smart_wallet_common::error::ConfigError;
use smart_wallet_common::session::SessionManager;
use smart_wallet_common::view::{ViewStore, WalletViewState};

use super::injected_provider::InjectedProvider;
use super::view_state::{ViewHandle, WalletSession};
use super::wallet_view::WalletView;

/// Build-time configuration, overridable via `?contract=<address>&lang=<th|en>`.
fn load_config() -> Result<WalletConfig, ConfigError> {
    let config = WalletConfig::from_env()?.with_overrides(
        query_param("contract").as_deref(),
        query_param("lang").as_deref(),
    )?;
    tracing::info!(
        "Using contract {} ({} session, locale {})",
        config.contract_address,
        config.session_policy,
        config.locale
    );
    Ok(config)
}

#[cfg(target_family = "wasm")]
fn query_param(name: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .and_then(|qs| web_sys::UrlSearchParams::new_with_str(&qs).ok()?.get(name))
}

#[cfg(not(target_family = "wasm"))]
fn query_param(_name: &str) -> Option<String> {
    None
}

#[component]
pub fn App() -> Element {
    let config = use_hook(load_config);

    match config {
        Ok(config) => rsx! { WalletApp { config } },
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            rsx! {
                div { class: "smart-wallet",
                    p { class: "config-error", "{e}" }
                }
            }
        }
    }
}

#[component]
fn WalletApp(config: WalletConfig) -> Element {
    let state = use_context_provider(|| Signal::new(WalletViewState::new(config.locale)));
    let session: WalletSession = use_context_provider(|| {
        Rc::new(SessionManager::new(InjectedProvider::detect(), &config))
    });
    let view = ViewHandle::new(state);

    // Drop the cached session when the wallet switches accounts
    use_hook(|| {
        if let Some(provider) = session.provider() {
            let session = session.clone();
            provider.on_accounts_changed(move |accounts| {
                let primary = session.accounts_changed(&accounts);
                view.update(|s| s.set_account(primary));
            });
        }
    });

    rsx! { WalletView {} }
}
