//! Domain events: the "changed" signal the presentation layer subscribes to.
//!
//! The core stays framework-agnostic: mutations push events, the embedding UI
//! drains them with `take_events` after each interaction and re-renders what
//! they name.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Catalog(CatalogEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    LineAdded { line_id: String },
    LineMerged { line_id: String, quantity: u32 },
    QuantityChanged { line_id: String, quantity: u32 },
    LineRemoved { line_id: String },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEvent {
    Loaded { categories: usize },
    FetchFailed { reason: String },
}
