pub mod dataset;
pub mod validator;
