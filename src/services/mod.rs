pub mod mail;
pub mod notifier;
pub mod store;
