use std::rc::Rc;

use dioxus::prelude::*;

use smart_wallet_common::session::SessionManager;
use smart_wallet_common::view::{ViewStore, WalletViewState};

use super::injected_provider::InjectedProvider;

/// Session shared by every action handler of the page.
pub type WalletSession = Rc<SessionManager<InjectedProvider>>;

/// Copyable handle to the page state signal, used by the action handlers.
#[derive(Clone, Copy, PartialEq)]
pub struct ViewHandle(Signal<WalletViewState>);

impl ViewHandle {
    pub fn new(signal: Signal<WalletViewState>) -> Self {
        Self(signal)
    }

    pub fn signal(&self) -> Signal<WalletViewState> {
        self.0
    }
}

impl ViewStore for ViewHandle {
    fn read<R>(&self, f: impl FnOnce(&WalletViewState) -> R) -> R {
        f(&self.0.read())
    }

    fn update<R>(&self, f: impl FnOnce(&mut WalletViewState) -> R) -> R {
        let mut signal = self.0;
        let mut state = signal.write();
        f(&mut state)
    }

    /// Shows the notice banner and, in the browser, a native alert.
    fn alert(&self, message: &str) {
        self.update(|s| s.set_notice(message));
        #[cfg(target_family = "wasm")]
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

pub fn use_view_state() -> ViewHandle {
    ViewHandle::new(use_context::<Signal<WalletViewState>>())
}

pub fn use_session() -> WalletSession {
    use_context::<WalletSession>()
}
