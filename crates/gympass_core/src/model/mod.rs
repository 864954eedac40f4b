//! Domain model for users, gyms and check-ins.
//!
//! # Responsibility
//! - Define canonical records used by core business logic.
//! - Own field-level validation shared by every repository implementation.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4.
//! - Timestamps are Unix epoch milliseconds.

pub mod check_in;
pub mod gym;
pub mod user;
pub mod validation;
