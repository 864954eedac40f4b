//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce business rules (uniqueness, distance, same-day, validation
//!   window) above the repository layer.
//!
//! # Invariants
//! - Each use case performs at most one repository write.
//! - Services stay storage-agnostic and never log secrets.

pub mod check_in_service;
pub mod gym_service;
pub mod metrics_service;
pub mod user_service;
