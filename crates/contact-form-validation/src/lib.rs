//! Contact form validation core
//!
//! Pure Rust validators compatible with both std and no_std environments.
//! The form schema composes these into per-field rules.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod email;
pub mod string;

// Re-export all validators
pub use email::*;
pub use string::*;
