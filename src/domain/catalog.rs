//! Normalized menu catalog.
//!
//! Built once per session by [`crate::menu::normalize`]; immutable afterwards.
//! Everything in here is already filtered to active records and sorted, so
//! vector order is display order.

use serde::Serialize;

use crate::domain::value_objects::{Money, Slug};

/// Cardinality contract of an option group, made explicit instead of being
/// re-derived from `max_selection` at every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ChoiceRule {
    /// One choice slot; picking a new option replaces the previous one.
    Single,
    /// Up to `max` simultaneous choices.
    Multi { max: u32 },
}

impl ChoiceRule {
    /// `max_selection <= 1` behaves as single-choice; the model guarantees a
    /// maximum of at least one.
    pub fn from_max(max_selection: u32) -> Self {
        if max_selection <= 1 {
            ChoiceRule::Single
        } else {
            ChoiceRule::Multi { max: max_selection }
        }
    }

    pub fn max(&self) -> u32 {
        match self {
            ChoiceRule::Single => 1,
            ChoiceRule::Multi { max } => *max,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OptionItem {
    pub id: String,
    pub name: String,
    pub surcharge: Money,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OptionGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub min_select: u32,
    pub rule: ChoiceRule,
    /// Active options only, in sort order. May be empty: such a group stays in
    /// the model so the validator sees it, but is never rendered.
    pub options: Vec<OptionItem>,
}

impl OptionGroup {
    pub fn is_visible(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn option(&self, option_id: &str) -> Option<&OptionItem> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Picks needed to satisfy this group when it is required.
    pub fn required_min(&self) -> u32 {
        self.min_select.max(1)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub bundle_upcharge: Option<Money>,
    pub discount: Option<Money>,
    pub image: Option<String>,
    /// Short "what you can customize" line for product cards: the first two
    /// non-required groups that have options, comma-joined.
    pub extras: String,
    /// All groups in sort order, including ones with zero active options.
    pub groups: Vec<OptionGroup>,
}

impl Product {
    /// The option-rendering surface: groups that actually have something to
    /// pick.
    pub fn visible_groups(&self) -> impl Iterator<Item = &OptionGroup> {
        self.groups.iter().filter(|g| g.is_visible())
    }

    pub fn group(&self, group_id: &str) -> Option<&OptionGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Category {
    /// Stable slug derived from the label, unique among active categories.
    pub id: Slug,
    pub label: String,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.categories
            .iter()
            .flat_map(|c| c.products.iter())
            .find(|p| p.id == product_id)
    }
}
