use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Display language for notices, status lines and labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    Thai,
    English,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "th" | "thai" => Ok(Locale::Thai),
            "en" | "english" => Ok(Locale::English),
            _ => Err(ConfigError::UnknownLocale(s.to_string())),
        }
    }
}

impl Locale {
    /// BCP 47 tag, set as the page's `lang` attribute.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Thai => "th",
            Locale::English => "en",
        }
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::Thai => &THAI,
            Locale::English => &ENGLISH,
        }
    }
}

/// Fixed user-facing strings. Failure details never reach these; they are
/// only logged.
#[derive(Debug)]
pub struct Messages {
    pub install_provider: &'static str,
    pub connect_failed: &'static str,
    pub balance_failed: &'static str,
    pub invalid_deposit_amount: &'static str,
    pub depositing: &'static str,
    pub deposit_succeeded: &'static str,
    pub deposit_failed: &'static str,
    pub invalid_withdraw_amount: &'static str,
    pub withdraw_succeeded: &'static str,
    pub withdraw_failed: &'static str,
    pub invalid_time_lock_amount: &'static str,
    pub time_lock_succeeded: &'static str,
    pub time_lock_failed: &'static str,
    pub time_lock_info_failed: &'static str,

    pub title: &'static str,
    pub connect_button: &'static str,
    pub account_label: &'static str,
    pub balance_label: &'static str,
    pub amount_placeholder: &'static str,
    pub deposit_button: &'static str,
    pub withdraw_button: &'static str,
    pub time_lock_button: &'static str,
    pub locked_label: &'static str,
    pub unlock_label: &'static str,
    pub status_label: &'static str,
    pub dismiss_button: &'static str,
}

static THAI: Messages = Messages {
    install_provider: "กรุณาติดตั้ง MetaMask",
    connect_failed: "เชื่อมต่อกับ MetaMask ไม่สำเร็จ",
    balance_failed: "เกิดข้อผิดพลาดระหว่างการดึงยอดเงิน",
    invalid_deposit_amount: "กรุณากรอกจำนวนเงินที่ถูกต้อง",
    depositing: "กำลังฝาก...",
    deposit_succeeded: "ฝากเงินสำเร็จ!",
    deposit_failed: "เกิดข้อผิดพลาดระหว่างการฝากเงิน",
    invalid_withdraw_amount: "กรุณากรอกจำนวนเงินที่ต้องการถอน",
    withdraw_succeeded: "ถอนเงินสำเร็จ!",
    withdraw_failed: "เกิดข้อผิดพลาดระหว่างการถอนเงิน",
    invalid_time_lock_amount: "กรุณากรอกจำนวนเงินที่ต้องการฝาก",
    time_lock_succeeded: "ฝากแบบล็อกเวลาสำเร็จ!",
    time_lock_failed: "เกิดข้อผิดพลาดระหว่างการฝากแบบล็อกเวลา",
    time_lock_info_failed: "เกิดข้อผิดพลาดระหว่างการดึงข้อมูลล็อกเวลา",

    title: "Smart Wallet",
    connect_button: "เชื่อมต่อกับ MetaMask",
    account_label: "กระเป๋า:",
    balance_label: "ยอดเงิน:",
    amount_placeholder: "จำนวนเงิน",
    deposit_button: "ฝากเงิน",
    withdraw_button: "ถอนเงิน",
    time_lock_button: "ฝากแบบล็อกเวลา",
    locked_label: "ยอดที่ล็อก:",
    unlock_label: "วันที่ปลดล็อก:",
    status_label: "สถานะ:",
    dismiss_button: "ปิด",
};

static ENGLISH: Messages = Messages {
    install_provider: "Please install MetaMask",
    connect_failed: "Could not connect to MetaMask",
    balance_failed: "Failed to fetch balance",
    invalid_deposit_amount: "Please enter a valid amount",
    depositing: "Depositing...",
    deposit_succeeded: "Deposit successful!",
    deposit_failed: "Deposit failed",
    invalid_withdraw_amount: "Please enter the amount to withdraw",
    withdraw_succeeded: "Withdrawal successful!",
    withdraw_failed: "Withdrawal failed",
    invalid_time_lock_amount: "Please enter the amount to deposit",
    time_lock_succeeded: "Time-locked deposit successful!",
    time_lock_failed: "Time-locked deposit failed",
    time_lock_info_failed: "Failed to fetch time lock info",

    title: "Smart Wallet",
    connect_button: "Connect MetaMask",
    account_label: "Wallet:",
    balance_label: "Balance:",
    amount_placeholder: "Amount",
    deposit_button: "Deposit",
    withdraw_button: "Withdraw",
    time_lock_button: "Time-locked deposit",
    locked_label: "Locked:",
    unlock_label: "Unlocks at:",
    status_label: "Status:",
    dismiss_button: "Dismiss",
};
