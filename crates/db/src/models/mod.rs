//! Row models and request DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching database rows or joined views
//! - `Deserialize` input DTOs for inserts and full-overwrite updates

pub mod client;
pub mod cutting_order;
pub mod dashboard;
pub mod fabric;
pub mod session;
pub mod user;
