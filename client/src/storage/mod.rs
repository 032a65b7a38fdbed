//! Local persistence: layout, settings, key/value stores and preferences

pub mod keys;
pub mod layout;
pub mod preferences;
pub mod settings;
pub mod store;
