//! # Domain Layer
//!
//! Gateway records and the rules that hold for them independent of storage
//! and transport.
//!
//! This layer contains:
//! - **Entities**: the records of every product module and the [`Record`]
//!   contract stores rely on
//! - **Value Objects**: choice enums, amount helpers, chain formats and
//!   reference numbers
//! - **Errors**: domain error types with numeric codes
//!
//! [`Record`]: entities::Record

pub mod entities;
pub mod errors;
pub mod value_objects;
