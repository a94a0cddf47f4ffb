//! Carte — menu, customization and cart engine for a restaurant ordering page.
//!
//! This crate owns the non-presentational core of a single-page ordering
//! front-end:
//! - normalizing the fetched menu payload into an ordered, active-only catalog
//! - per-product option selection with group cardinality rules
//! - validation of required option groups at add-to-cart time
//! - deterministic unit pricing (surcharges, bundle upcharge, gated discount)
//! - a cart keyed by configuration fingerprint that merges identical lines
//! - the textual order breakdown handed to the ordering channel
//!
//! The embedding UI drives a [`session::Session`] and renders whatever it
//! reads back. All state mutation goes through the session and cart
//! operations; mutations raise [`domain::events::DomainEvent`]s the
//! presentation layer drains after each interaction.

use thiserror::Error;

pub mod domain;
pub mod handoff;
pub mod menu;
pub mod session;

pub use domain::cart::{Cart, CartLine};
pub use domain::catalog::{Catalog, Category, ChoiceRule, OptionGroup, OptionItem, Product};
pub use domain::pricing::OrderTerms;
pub use domain::selection::{FailureKind, GroupFailure, Selection};
pub use domain::value_objects::{Money, Slug};
pub use handoff::{order_message, DineMode};
pub use menu::source::{FetchError, HttpMenuSource};
pub use session::{CatalogState, FetchTicket, Session};

// =============================================================================
// Error Types
// =============================================================================

/// Errors surfaced by the ordering flows.
///
/// A rejected selection is an expected outcome, not a fault: the failing
/// groups ride along in [`OrderError::InvalidSelection`], in the product's
/// group order, so the caller can send the visitor to the first one.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("catalog is not loaded yet")]
    CatalogNotReady,

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("selection rejected: {} required group(s) unsatisfied", failures.len())]
    InvalidSelection { failures: Vec<GroupFailure> },
}

pub type Result<T> = std::result::Result<T, OrderError>;
