//! certvault Core Library
//!
//! Ownership and transfer of certificates between users:
//! - Certificate store and pending transfer index
//! - Transfer state machine (propose → accept)
//! - User directory with argon2 credentials
//! - Configuration resolution and tracing setup
//! - Common error types

pub mod config;
pub mod error;
pub mod ledger;
pub mod model;
pub mod password;
pub mod pending;
pub mod seed;
pub mod store;
pub mod tracing_init;
pub mod transfer;
pub mod users;

pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use model::{Certificate, Transfer, User};
pub use users::{Authenticator, Credentials, UserDirectory};
