pub mod app;
pub mod injected_provider;
pub mod view_state;
pub mod wallet_view;
