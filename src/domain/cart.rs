//! Cart aggregate: stable line identity and merge-by-fingerprint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::catalog::Product;
use crate::domain::events::CartEvent;
use crate::domain::selection::Selection;
use crate::domain::value_objects::Money;

// Separator control characters cannot occur in the API's JSON string ids, so
// joined segments can never collide with id contents.
const OPT_SEP: char = '\u{1f}';
const GROUP_SEP: char = '\u{1e}';

/// Stable cart-line identity for one product configuration.
///
/// Product id, then one segment per option group in the product's group
/// order, each segment being the chosen option ids sorted lexicographically.
/// The same options clicked in any order produce the same fingerprint; one
/// differing option id in any group produces a different one.
pub fn fingerprint(product: &Product, selection: &Selection) -> String {
    let mut key = product.id.clone();
    for group in &product.groups {
        key.push(GROUP_SEP);
        let mut ids: Vec<&str> = selection.chosen(&group.id).iter().map(String::as_str).collect();
        ids.sort_unstable();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                key.push(OPT_SEP);
            }
            key.push_str(id);
        }
    }
    key
}

/// Human-readable snapshot of the chosen options: `(group name, option
/// names)` in the product's group order, click order within a group. Groups
/// with nothing chosen are omitted.
pub fn option_summary(product: &Product, selection: &Selection) -> Vec<(String, Vec<String>)> {
    product
        .groups
        .iter()
        .filter_map(|group| {
            let names: Vec<String> = selection
                .chosen(&group.id)
                .iter()
                .filter_map(|id| group.option(id))
                .map(|o| o.name.clone())
                .collect();
            if names.is_empty() {
                None
            } else {
                Some((group.name.clone(), names))
            }
        })
        .collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct CartLine {
    id: String,
    product_id: String,
    name: String,
    unit_price: Money,
    quantity: u32,
    options: Vec<(String, Vec<String>)>,
    surcharge_total: Money,
}

impl CartLine {
    pub fn new(
        id: String,
        product_id: String,
        name: String,
        unit_price: Money,
        quantity: u32,
        options: Vec<(String, Vec<String>)>,
        surcharge_total: Money,
    ) -> Self {
        Self {
            id,
            product_id,
            name,
            unit_price,
            quantity: quantity.max(1),
            options,
            surcharge_total,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn product_id(&self) -> &str {
        &self.product_id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Already includes surcharges and any bundle/discount adjustments.
    /// First write wins: a merge never rewrites it.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
    pub fn options(&self) -> &[(String, Vec<String>)] {
        &self.options
    }
    pub fn surcharge_total(&self) -> Money {
        self.surcharge_total
    }

    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Ordered collection of cart lines, insertion order preserved; merges update
/// in place. Mutated only through the operations below.
#[derive(Clone, Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<CartEvent>,
}

impl Cart {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            lines: vec![],
            created_at: now,
            updated_at: now,
            events: vec![],
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sum of quantities, for the cart badge.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Grand total, computed from the lines on every call so it cannot drift.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::ZERO, |acc, l| acc.add(l.line_total()))
    }

    /// Merge into an existing line with the same fingerprint (quantity
    /// accumulates, the existing unit price stays), or append a new line.
    pub fn add_or_merge(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.id == line.id) {
            existing.quantity += line.quantity;
            let event = CartEvent::LineMerged {
                line_id: existing.id.clone(),
                quantity: existing.quantity,
            };
            self.events.push(event);
        } else {
            self.events.push(CartEvent::LineAdded { line_id: line.id.clone() });
            self.lines.push(line);
        }
        self.touch();
    }

    /// A quantity below one removes the line — an explicit zero is a removal,
    /// not a clamp. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) {
        if quantity < 1 {
            self.remove(line_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
            self.events.push(CartEvent::QuantityChanged {
                line_id: line_id.to_string(),
                quantity,
            });
            self.touch();
        }
    }

    /// Drop the line if present; no-op if absent.
    pub fn remove(&mut self, line_id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != line_id);
        if self.lines.len() != before {
            self.events.push(CartEvent::LineRemoved { line_id: line_id.to_string() });
            self.touch();
        }
    }

    pub fn clear(&mut self) {
        if !self.lines.is_empty() {
            self.lines.clear();
            self.events.push(CartEvent::Cleared);
            self.touch();
        }
    }

    pub fn take_events(&mut self) -> Vec<CartEvent> {
        std::mem::take(&mut self.events)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
