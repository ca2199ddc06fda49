use dioxus::prelude::*;

use smart_wallet_common::actions;
use smart_wallet_common::units::Unit;
use smart_wallet_common::view::ViewStore;

use super::view_state::{use_session, use_view_state};

#[component]
pub fn WalletView() -> Element {
    let view = use_view_state();
    let session = use_session();

    // Both read queries run once whenever a (new) account is published
    let account = use_memo(move || view.signal().read().account);
    use_effect({
        let session = session.clone();
        move || {
            if account().is_some() {
                let session = session.clone();
                spawn(async move {
                    actions::refresh(&*session, &view).await;
                });
            }
        }
    });

    let signal = view.signal();
    let state = signal.read();
    let messages = state.messages();
    let lang = state.locale.tag();
    let account_str = state.account.map(|a| a.to_string());
    let balance_str = format!("{} {}", state.balance.display, state.balance.unit_label);
    let amount = state.amount.clone();
    let unit = state.unit;
    let time_lock = state.time_lock.clone();
    let status = state.status.clone();
    let notice = state.notice.clone();
    drop(state);

    rsx! {
        div { class: "smart-wallet", lang: "{lang}",
            div { class: "wallet-card",
                h1 { class: "wallet-title", "{messages.title}" }

                if let Some(account) = account_str {
                    p { class: "wallet-account",
                        strong { "{messages.account_label}" }
                        " {account}"
                    }
                } else {
                    button {
                        class: "connect-btn",
                        onclick: {
                            let session = session.clone();
                            move |_| {
                                let session = session.clone();
                                spawn(async move {
                                    actions::connect_wallet(&*session, &view).await;
                                });
                            }
                        },
                        "{messages.connect_button}"
                    }
                }

                p { class: "wallet-balance",
                    strong { "{messages.balance_label}" }
                    " {balance_str}"
                }

                div { class: "wallet-form",
                    input {
                        r#type: "number",
                        min: "0",
                        placeholder: "{messages.amount_placeholder}",
                        value: "{amount}",
                        oninput: move |e| view.update(|s| s.set_amount(e.value())),
                    }
                    div { class: "wallet-actions",
                        select {
                            value: "{unit.key()}",
                            onchange: move |e| {
                                match e.value().parse::<Unit>() {
                                    Ok(unit) => view.update(|s| s.set_unit(unit)),
                                    Err(err) => tracing::warn!("Ignoring unit selection: {err}"),
                                }
                            },
                            for u in Unit::all() {
                                option { value: "{u.key()}", selected: *u == unit, "{u}" }
                            }
                        }
                        button {
                            class: "action-btn",
                            onclick: {
                                let session = session.clone();
                                move |_| {
                                    let session = session.clone();
                                    spawn(async move {
                                        actions::handle_deposit(&*session, &view).await;
                                    });
                                }
                            },
                            "{messages.deposit_button}"
                        }
                        button {
                            class: "action-btn",
                            onclick: {
                                let session = session.clone();
                                move |_| {
                                    let session = session.clone();
                                    spawn(async move {
                                        actions::handle_withdraw(&*session, &view).await;
                                    });
                                }
                            },
                            "{messages.withdraw_button}"
                        }
                        button {
                            class: "action-btn",
                            onclick: {
                                let session = session.clone();
                                move |_| {
                                    let session = session.clone();
                                    spawn(async move {
                                        actions::handle_time_locked_deposit(&*session, &view).await;
                                    });
                                }
                            },
                            "{messages.time_lock_button}"
                        }
                    }
                }

                if let Some(lock) = time_lock {
                    div { class: "wallet-time-lock",
                        p {
                            strong { "{messages.locked_label}" }
                            " {lock.locked} ETH"
                        }
                        p {
                            strong { "{messages.unlock_label}" }
                            " {lock.unlock_at}"
                        }
                    }
                }

                if let Some(status) = status {
                    p { class: "wallet-status",
                        strong { "{messages.status_label}" }
                        " {status}"
                    }
                }

                if let Some(notice) = notice {
                    div { class: "wallet-notice",
                        p { "{notice}" }
                        button {
                            onclick: move |_| view.update(|s| s.dismiss_notice()),
                            "{messages.dismiss_button}"
                        }
                    }
                }
            }
        }
    }
}
