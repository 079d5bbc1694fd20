pub mod layout;
pub mod text;
pub mod validation;
