//! HR Portal Core - resource payload types and the Resource trait

pub mod auth;
pub mod types;

pub use auth::*;
pub use types::*;
