use std::collections::HashMap;
use std::fmt::Display;

use alloy_primitives::{Address, U256};
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

use crate::i18n::{Locale, Messages};
use crate::units::{format_ether, Unit};

/// Balance as last read from the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceView {
    pub wei: U256,
    /// Decimal ETH rendering of `wei`.
    pub display: String,
    pub unit_label: &'static str,
}

impl Default for BalanceView {
    fn default() -> Self {
        Self::from_wei(U256::ZERO)
    }
}

impl BalanceView {
    pub fn from_wei(wei: U256) -> Self {
        Self {
            wei,
            display: format_ether(wei),
            unit_label: "ETH",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLockView {
    /// Locked amount in ETH.
    pub locked: String,
    /// Localized unlock date and time.
    pub unlock_at: String,
}

/// The user-triggered operations. Each kind has its own request sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Connect,
    FetchBalance,
    Deposit,
    Withdraw,
    TimeLockedDeposit,
    FetchTimeLockInfo,
}

/// Issued when a request starts; its response is applied only while the
/// ticket is still the newest of its kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    kind: ActionKind,
    seq: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestTickets {
    latest: HashMap<ActionKind, u64>,
}

impl RequestTickets {
    pub fn begin(&mut self, kind: ActionKind) -> Ticket {
        let seq = self.latest.entry(kind).or_insert(0);
        *seq += 1;
        Ticket { kind, seq: *seq }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.kind) == Some(&ticket.seq)
    }
}

/// All UI state of the wallet page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletViewState {
    pub account: Option<Address>,
    pub amount: String,
    pub unit: Unit,
    pub balance: BalanceView,
    pub time_lock: Option<TimeLockView>,
    pub status: Option<String>,
    /// Latest blocking notice.
    pub notice: Option<String>,
    pub locale: Locale,
    pub tickets: RequestTickets,
}

impl WalletViewState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &'static Messages {
        self.locale.messages()
    }

    pub fn set_amount(&mut self, raw: impl Into<String>) {
        self.amount = raw.into();
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn set_account(&mut self, account: Option<Address>) {
        self.account = account;
    }

    pub fn set_balance(&mut self, wei: U256) {
        self.balance = BalanceView::from_wei(wei);
    }

    pub fn set_time_lock(&mut self, time_lock: Option<TimeLockView>) {
        self.time_lock = time_lock;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = Some(status.to_string());
    }

    pub fn set_notice(&mut self, notice: &str) {
        self.notice = Some(notice.to_string());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

/// Seam between the handlers and whatever holds the UI state: a Dioxus
/// signal in the browser, a `RefCell` in tests.
pub trait ViewStore {
    fn read<R>(&self, f: impl FnOnce(&WalletViewState) -> R) -> R;

    fn update<R>(&self, f: impl FnOnce(&mut WalletViewState) -> R) -> R;

    /// Show a blocking notice.
    fn alert(&self, message: &str) {
        self.update(|s| s.set_notice(message));
    }
}

/// Render unix seconds as a local date/time string in the conventions of
/// `locale`. Thai dates carry the Buddhist-era year.
pub fn format_unlock_time(epoch_secs: u64, locale: Locale) -> Option<String> {
    format_unlock_time_in(epoch_secs, &Local, locale)
}

pub fn format_unlock_time_in<Tz>(epoch_secs: u64, tz: &Tz, locale: Locale) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let secs = i64::try_from(epoch_secs).ok()?;
    let utc: DateTime<Utc> = DateTime::from_timestamp(secs, 0)?;
    let local = utc.with_timezone(tz);
    Some(match locale {
        Locale::Thai => format!(
            "{}/{} {}",
            local.format("%-d/%-m"),
            local.year() + BUDDHIST_ERA_OFFSET,
            local.format("%H:%M:%S"),
        ),
        Locale::English => local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
    })
}

const BUDDHIST_ERA_OFFSET: i32 = 543;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_supersedes_previous_of_same_kind() {
        let mut tickets = RequestTickets::default();
        let first = tickets.begin(ActionKind::FetchBalance);
        let other = tickets.begin(ActionKind::FetchTimeLockInfo);
        assert!(tickets.is_current(first));
        let second = tickets.begin(ActionKind::FetchBalance);
        assert!(!tickets.is_current(first));
        assert!(tickets.is_current(second));
        assert!(tickets.is_current(other));
    }

    #[test]
    fn test_balance_view_formats_ether() {
        let view = BalanceView::from_wei(U256::from(2_500_000_000_000_000_000u64));
        assert_eq!(view.display, "2.5");
        assert_eq!(view.unit_label, "ETH");
        assert_eq!(BalanceView::default().display, "0.0");
    }

    #[test]
    fn test_unlock_time_in_utc() {
        assert_eq!(
            format_unlock_time_in(1_700_000_000, &Utc, Locale::English).as_deref(),
            Some("11/14/2023, 10:13:20 PM")
        );
        assert_eq!(format_unlock_time_in(u64::MAX, &Utc, Locale::English), None);
        assert!(format_unlock_time(0, Locale::English).is_some());
    }

    #[test]
    fn test_thai_unlock_time_uses_buddhist_era() {
        assert_eq!(
            format_unlock_time_in(1_700_000_000, &Utc, Locale::Thai).as_deref(),
            Some("14/11/2566 22:13:20")
        );
        assert_eq!(
            format_unlock_time_in(1_704_067_200, &Utc, Locale::Thai).as_deref(),
            Some("1/1/2567 00:00:00")
        );
    }

    #[test]
    fn test_status_is_overwritten() {
        let mut state = WalletViewState::new(Locale::English);
        state.set_status("first");
        state.set_status("second");
        assert_eq!(state.status.as_deref(), Some("second"));
        state.set_notice("hold on");
        state.dismiss_notice();
        assert_eq!(state.notice, None);
    }
}
