//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: data and simple helpers only, no I/O.

pub mod config;
pub mod constants;
pub mod fragment;
pub mod registry;
pub mod roles;
