//! Core types for MebliHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod phone;
pub mod status;
pub mod text;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Rates, apply_discount, convert_from_uah, format_uah};
pub use phone::{Phone, PhoneError};
pub use status::*;
pub use text::{Lang, LocalizedText};
