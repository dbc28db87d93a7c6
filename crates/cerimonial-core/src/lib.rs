//! Core types and trait definitions for the Cerimonial planner.
//!
//! Domain records (clients, events, vendors), the store traits the backends
//! implement, password hashing, and the derived figures shown to the user.
//! No database or terminal dependencies.

// Store traits spell out `Send` on their returned futures.
#![allow(async_fn_in_trait)]

pub mod branding;
pub mod client;
pub mod contract;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod legacy;
pub mod money;
pub mod password;
pub mod record;
pub mod search;
pub mod store;
pub mod user;
pub mod vendor;

pub use error::{Error, Result};
pub use money::Money;
pub use record::{Entity, EntityKind, Record};
pub use user::Identity;
