//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every feature crate agrees on:
//! - Unified error type, error kinds and field-level validation errors
//! - Typed ID wrappers
//! - The per-request context (who is acting, with which session role)
//! - The capability policy consulted before each guarded action
//! - Page-number pagination

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod fields;
    pub mod form;
    pub mod kind;
}
pub mod context;
pub mod id;
pub mod pagination;
pub mod permission;
