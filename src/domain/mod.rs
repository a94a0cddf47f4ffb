//! Domain model: catalog, selection, pricing and cart.

pub mod cart;
pub mod catalog;
pub mod events;
pub mod pricing;
pub mod selection;
pub mod value_objects;
