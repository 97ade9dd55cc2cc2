pub mod assert;
pub mod constants;

pub use assert::{assert, assertion_error};
pub use constants::CONSTANTS;
