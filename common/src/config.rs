use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;

use crate::contract::DEFAULT_CONTRACT_ADDRESS;
use crate::error::ConfigError;
use crate::i18n::Locale;

const DEFAULT_POLL_MS: u64 = 1_000;

/// Whether `connect()` re-runs the wallet permission flow on every action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Ask the wallet for accounts on every action.
    Reprompt,
    /// Keep the first session until the wallet reports an account change.
    #[default]
    Reuse,
}

impl fmt::Display for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPolicy::Reprompt => write!(f, "reprompt"),
            SessionPolicy::Reuse => write!(f, "reuse"),
        }
    }
}

impl FromStr for SessionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reprompt" => Ok(SessionPolicy::Reprompt),
            "reuse" => Ok(SessionPolicy::Reuse),
            _ => Err(ConfigError::UnknownSessionPolicy(s.to_string())),
        }
    }
}

/// Client configuration. Built at compile time from `SMART_WALLET_*`
/// variables, optionally overridden from the page's query string.
#[derive(Clone, Debug, PartialEq)]
pub struct WalletConfig {
    pub contract_address: Address,
    pub session_policy: SessionPolicy,
    pub receipt_poll_interval: Duration,
    pub locale: Locale,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS
                .parse()
                .unwrap_or(Address::ZERO),
            session_policy: SessionPolicy::default(),
            receipt_poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            locale: Locale::default(),
        }
    }
}

impl WalletConfig {
    /// Read `SMART_WALLET_CONTRACT`, `SMART_WALLET_SESSION`,
    /// `SMART_WALLET_LOCALE` and `SMART_WALLET_POLL_MS` as baked in at build time.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            option_env!("SMART_WALLET_CONTRACT"),
            option_env!("SMART_WALLET_SESSION"),
            option_env!("SMART_WALLET_LOCALE"),
            option_env!("SMART_WALLET_POLL_MS"),
        )
    }

    fn from_vars(
        contract: Option<&str>,
        session: Option<&str>,
        locale: Option<&str>,
        poll_ms: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self {
            contract_address: parse_address(contract.unwrap_or(DEFAULT_CONTRACT_ADDRESS))?,
            ..Self::default()
        };
        if let Some(session) = non_empty(session) {
            config.session_policy = session.parse()?;
        }
        if let Some(locale) = non_empty(locale) {
            config.locale = locale.parse()?;
        }
        if let Some(ms) = non_empty(poll_ms) {
            let ms: u64 = ms
                .parse()
                .map_err(|_| ConfigError::InvalidPollInterval(ms.to_string()))?;
            config.receipt_poll_interval = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Apply `?contract=<address>&lang=<th|en>` style overrides.
    pub fn with_overrides(
        mut self,
        contract: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(contract) = non_empty(contract) {
            self.contract_address = parse_address(contract)?;
        }
        if let Some(lang) = non_empty(lang) {
            self.locale = lang.parse()?;
        }
        Ok(self)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_address(raw: &str) -> Result<Address, ConfigError> {
    let trimmed = raw.trim();
    // `Address` parsing tolerates a missing prefix; require the canonical form
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return Err(ConfigError::InvalidContractAddress(raw.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidContractAddress(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WalletConfig::from_vars(None, None, None, None).unwrap();
        assert_eq!(
            config.contract_address,
            DEFAULT_CONTRACT_ADDRESS.parse::<Address>().unwrap()
        );
        assert_eq!(config.session_policy, SessionPolicy::Reuse);
        assert_eq!(config.locale, Locale::Thai);
        assert_eq!(config.receipt_poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_vars_are_applied() {
        let config = WalletConfig::from_vars(
            Some("0x2222222222222222222222222222222222222222"),
            Some("reprompt"),
            Some("en"),
            Some("250"),
        )
        .unwrap();
        assert_eq!(config.session_policy, SessionPolicy::Reprompt);
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.receipt_poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_malformed_address_is_rejected() {
        // 21 bytes
        let err = WalletConfig::from_vars(
            Some("0xD357C19cE31dB04DF037ea073D76D7160D7bbcC6aa"),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContractAddress(_)));
        assert!(WalletConfig::default()
            .with_overrides(Some("D357C19cE31dB04DF037ea073D76D7160D7bbcC6"), None)
            .is_err());
    }

    #[test]
    fn test_overrides() {
        let config = WalletConfig::default()
            .with_overrides(Some(" "), Some("en"))
            .unwrap();
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.contract_address, WalletConfig::default().contract_address);
        assert!(WalletConfig::default().with_overrides(None, Some("xx")).is_err());
        assert!(WalletConfig::from_vars(None, Some("sometimes"), None, None).is_err());
        assert!(WalletConfig::from_vars(None, None, None, Some("soon")).is_err());
    }
}
