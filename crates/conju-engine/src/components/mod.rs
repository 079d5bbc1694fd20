pub mod selection;
pub mod tray;
