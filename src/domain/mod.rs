//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, status enums, errors)
//! - `competition` - Competition aggregate, question state and view projection

pub mod competition;
pub mod foundation;
