//! User-triggered wallet actions.
//!
//! Every handler validates its input, acquires a contract handle from the
//! session, performs one contract call and writes the outcome to the view.
//! Failure details are logged; the view only ever gets a fixed message.

use alloy_primitives::{Address, U256};

use crate::contract::{ContractHandle, TimeLockInfo};
use crate::error::WalletError;
use crate::i18n::Messages;
use crate::provider::WalletProvider;
use crate::session::SessionManager;
use crate::units::{format_ether, is_numeric, is_positive, to_wei};
use crate::view::{
    format_unlock_time, ActionKind, Ticket, TimeLockView, ViewStore, WalletViewState,
};

/// Where a handler reports its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Surface {
    Status,
    Notice,
}

/// Connect and publish the account to the view. The install notice is
/// raised here when no wallet is injected.
async fn acquire<'s, P, V>(
    session: &'s SessionManager<P>,
    view: &V,
) -> Result<ContractHandle<'s, P>, WalletError>
where
    P: WalletProvider,
    V: ViewStore,
{
    match session.connect().await {
        Ok(handle) => {
            let account = Some(handle.account());
            if view.read(|s| s.account != account) {
                view.update(|s| s.set_account(account));
            }
            Ok(handle)
        }
        Err(WalletError::ProviderUnavailable) => {
            let messages = view.read(WalletViewState::messages);
            view.alert(messages.install_provider);
            Err(WalletError::ProviderUnavailable)
        }
        Err(e) => Err(e),
    }
}

/// Apply a response unless a newer request of the same kind has started.
/// Returns whether the success branch ran.
fn finish<T, V: ViewStore>(
    view: &V,
    ticket: Ticket,
    result: Result<T, WalletError>,
    on_success: impl FnOnce(&mut WalletViewState, T),
    failure: fn(&Messages) -> &'static str,
    surface: Surface,
) -> bool {
    if !view.read(|s| s.tickets.is_current(ticket)) {
        tracing::warn!("Discarding superseded response for {:?}", ticket);
        return false;
    }
    match result {
        Ok(value) => {
            view.update(|s| on_success(s, value));
            true
        }
        // already reported by `acquire`
        Err(WalletError::ProviderUnavailable) => false,
        Err(e) => {
            tracing::error!("{:?} failed: {e}", ticket);
            let message = failure(view.read(WalletViewState::messages));
            match surface {
                Surface::Status => view.update(|s| s.set_status(message)),
                Surface::Notice => view.alert(message),
            }
            false
        }
    }
}

/// Read the amount field, rejecting it with `invalid` before any request.
fn read_amount<V: ViewStore>(
    view: &V,
    precondition: fn(&str) -> bool,
    invalid: fn(&Messages) -> &'static str,
) -> Option<U256> {
    let (raw, unit, messages) = view.read(|s| (s.amount.clone(), s.unit, s.messages()));
    if !precondition(&raw) {
        view.alert(invalid(messages));
        return None;
    }
    match to_wei(&raw, unit) {
        Ok(wei) => Some(wei),
        Err(e) => {
            tracing::warn!("Rejected amount {raw:?} {unit}: {e}");
            view.alert(invalid(messages));
            None
        }
    }
}

/// Explicit "connect wallet" button. Returns the connected account.
pub async fn connect_wallet<P, V>(session: &SessionManager<P>, view: &V) -> Option<Address>
where
    P: WalletProvider,
    V: ViewStore,
{
    let ticket = view.update(|s| s.tickets.begin(ActionKind::Connect));
    let result = acquire(session, view).await.map(|handle| handle.account());
    let account = result.as_ref().ok().copied();
    finish(view, ticket, result, |_, _| {}, |m| m.connect_failed, Surface::Status);
    account
}

pub async fn fetch_balance<P, V>(session: &SessionManager<P>, view: &V)
where
    P: WalletProvider,
    V: ViewStore,
{
    let ticket = view.update(|s| s.tickets.begin(ActionKind::FetchBalance));
    let result = match acquire(session, view).await {
        Ok(handle) => handle.get_balance().await,
        Err(e) => Err(e),
    };
    show_balance(view, ticket, result);
}

pub async fn fetch_time_lock_info<P, V>(session: &SessionManager<P>, view: &V)
where
    P: WalletProvider,
    V: ViewStore,
{
    let ticket = view.update(|s| s.tickets.begin(ActionKind::FetchTimeLockInfo));
    let result = match acquire(session, view).await {
        Ok(handle) => handle.get_time_lock_info().await,
        Err(e) => Err(e),
    };
    show_time_lock(view, ticket, result);
}

/// Both read queries, concurrently, over a single connect. Fired once an
/// account is known.
pub async fn refresh<P, V>(session: &SessionManager<P>, view: &V)
where
    P: WalletProvider,
    V: ViewStore,
{
    let (balance_ticket, time_lock_ticket) = view.update(|s| {
        (
            s.tickets.begin(ActionKind::FetchBalance),
            s.tickets.begin(ActionKind::FetchTimeLockInfo),
        )
    });
    match acquire(session, view).await {
        Ok(handle) => {
            futures::join!(
                async { show_balance(view, balance_ticket, handle.get_balance().await) },
                async {
                    let result = handle.get_time_lock_info().await;
                    show_time_lock(view, time_lock_ticket, result);
                }
            );
        }
        Err(e) => {
            show_balance(view, balance_ticket, Err(e.clone()));
            show_time_lock(view, time_lock_ticket, Err(e));
        }
    }
}

fn show_balance<V: ViewStore>(view: &V, ticket: Ticket, result: Result<U256, WalletError>) {
    finish(
        view,
        ticket,
        result,
        |s, wei| s.set_balance(wei),
        |m| m.balance_failed,
        Surface::Status,
    );
}

fn show_time_lock<V: ViewStore>(
    view: &V,
    ticket: Ticket,
    result: Result<TimeLockInfo, WalletError>,
) {
    finish(
        view,
        ticket,
        result,
        |s, info| {
            let time_lock = (info.unlock_time != 0).then(|| TimeLockView {
                locked: format_ether(info.amount),
                unlock_at: format_unlock_time(info.unlock_time, s.locale)
                    .unwrap_or_else(|| info.unlock_time.to_string()),
            });
            s.set_time_lock(time_lock);
        },
        |m| m.time_lock_info_failed,
        Surface::Status,
    );
}

pub async fn handle_deposit<P, V>(session: &SessionManager<P>, view: &V)
where
    P: WalletProvider,
    V: ViewStore,
{
    let Some(value) = read_amount(view, is_numeric, |m| m.invalid_deposit_amount) else {
        return;
    };
    let ticket = view.update(|s| s.tickets.begin(ActionKind::Deposit));
    let messages = view.read(WalletViewState::messages);
    let result = match acquire(session, view).await {
        Ok(handle) => {
            view.alert(messages.depositing);
            handle.deposit(value).await
        }
        Err(e) => Err(e),
    };
    let succeeded = finish(
        view,
        ticket,
        result,
        |_, _| {},
        |m| m.deposit_failed,
        Surface::Notice,
    );
    if succeeded {
        view.alert(messages.deposit_succeeded);
    }
}

pub async fn handle_withdraw<P, V>(session: &SessionManager<P>, view: &V)
where
    P: WalletProvider,
    V: ViewStore,
{
    let Some(amount) = read_amount(view, is_positive, |m| m.invalid_withdraw_amount) else {
        return;
    };
    let ticket = view.update(|s| s.tickets.begin(ActionKind::Withdraw));
    let result = match acquire(session, view).await {
        Ok(handle) => handle.withdraw(amount).await,
        Err(e) => Err(e),
    };
    let succeeded = finish(
        view,
        ticket,
        result,
        |s, _| {
            let message = s.messages().withdraw_succeeded;
            s.set_status(message);
        },
        |m| m.withdraw_failed,
        Surface::Status,
    );
    if succeeded {
        fetch_balance(session, view).await;
    }
}

pub async fn handle_time_locked_deposit<P, V>(session: &SessionManager<P>, view: &V)
where
    P: WalletProvider,
    V: ViewStore,
{
    let Some(value) = read_amount(view, is_positive, |m| m.invalid_time_lock_amount) else {
        return;
    };
    let ticket = view.update(|s| s.tickets.begin(ActionKind::TimeLockedDeposit));
    let result = match acquire(session, view).await {
        Ok(handle) => handle.time_locked_deposit(value).await,
        Err(e) => Err(e),
    };
    let succeeded = finish(
        view,
        ticket,
        result,
        |s, _| {
            let message = s.messages().time_lock_succeeded;
            s.set_status(message);
        },
        |m| m.time_lock_failed,
        Surface::Status,
    );
    if succeeded {
        fetch_balance(session, view).await;
    }
}
