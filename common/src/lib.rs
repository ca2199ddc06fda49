pub mod actions;
pub mod config;
pub mod contract;
pub mod error;
pub mod i18n;
pub mod provider;
pub mod session;
pub mod units;
pub mod view;
