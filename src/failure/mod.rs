//! Error taxonomy shared by every component.
//!
//! # Overview
//!
//! - [`ErrorKind`] - closed set of failure codes, each with a rendered template
//! - [`AppError`] - runtime error value (kind, message, details, suggestions,
//!   severity, optional context and cause)
//! - [`create_error`] - builds an [`AppError`] from a kind and template details
//! - [`classify`] - maps any error into the taxonomy by message signals
//! - [`log_error`] / [`format_error_for_display`] - diagnostics and UI projection
//!
//! Validators and the classifier never panic; every failure becomes an
//! [`AppError`] before it crosses a component boundary.
//!
//! # Example
//!
//! ```
//! use social_hub_core::failure::{ErrorKind, classify};
//!
//! let err = classify("network timeout", None);
//! assert_eq!(err.code(), ErrorKind::ApiNetworkError);
//! ```

mod app_error;
mod classify;
mod kind;

pub use app_error::{AppError, Cause, ErrorContext, create_error};
pub use classify::{
    DisplayError, classify, classify_message, classify_panic, format_error_for_display, log_error,
};
pub use kind::{ErrorDetails, ErrorKind, ErrorTemplate, Severity, UnknownErrorCode};
