//! `vivaha-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;

pub use clock::today;
pub use entity::{position_of, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{ExpenseId, GuestId};
