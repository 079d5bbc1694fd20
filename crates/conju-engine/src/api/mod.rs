pub mod error;
pub mod game;
pub mod locale;
pub mod prefs;
pub mod types;
