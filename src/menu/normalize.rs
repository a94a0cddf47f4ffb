//! One-pass normalization of the raw menu payload into the catalog.
//!
//! Pure transformation: inactive records are dropped, everything is sorted by
//! `sort_order` ascending with ties keeping input order (stable sorts), names
//! are trimmed, category slugs are derived and made unique. The only side
//! effect is a warning log on data-authoring conflicts.

use std::collections::HashSet;

use tracing::warn;

use crate::domain::catalog::{Catalog, Category, ChoiceRule, OptionGroup, OptionItem, Product};
use crate::domain::value_objects::{Money, Slug};
use crate::menu::wire::{RawCategory, RawOption, RawOptionGroup, RawProduct};

pub fn normalize(mut raw: Vec<RawCategory>) -> Catalog {
    raw.retain(|c| c.is_active);
    raw.sort_by_key(|c| c.sort_order);
    let mut taken = HashSet::new();
    Catalog {
        categories: raw
            .into_iter()
            .map(|c| normalize_category(c, &mut taken))
            .collect(),
    }
}

// Two active categories normalizing to the same slug is an authoring
// conflict; keep both but make the key unique with a numeric suffix.
fn unique_slug(label: &str, taken: &mut HashSet<String>) -> Slug {
    let base = Slug::derive(label);
    if taken.insert(base.as_str().to_string()) {
        return base;
    }
    warn!(slug = %base, label, "duplicate category slug; disambiguating");
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if taken.insert(candidate.clone()) {
            return Slug::derive(&candidate);
        }
        n += 1;
    }
}

fn normalize_category(raw: RawCategory, taken: &mut HashSet<String>) -> Category {
    let mut products: Vec<RawProduct> = raw.products.into_iter().filter(|p| p.is_active).collect();
    products.sort_by_key(|p| p.sort_order);
    Category {
        id: unique_slug(&raw.name, taken),
        label: raw.name.trim().to_string(),
        products: products.into_iter().map(normalize_product).collect(),
    }
}

fn normalize_product(raw: RawProduct) -> Product {
    let mut raw_groups = raw.supplement_groups;
    raw_groups.sort_by_key(|g| g.sort_order);
    let groups: Vec<OptionGroup> = raw_groups.into_iter().map(normalize_group).collect();

    let extras = groups
        .iter()
        .filter(|g| !g.required && g.is_visible())
        .map(|g| g.name.as_str())
        .take(2)
        .collect::<Vec<_>>()
        .join(", ");

    Product {
        id: raw.id,
        name: raw.name.trim().to_string(),
        description: raw.description,
        base_price: Money::new(raw.price),
        bundle_upcharge: raw.menu_upcharge.map(Money::new),
        discount: raw.student_discount.map(Money::new),
        image: raw.image_url,
        extras,
        groups,
    }
}

fn normalize_group(raw: RawOptionGroup) -> OptionGroup {
    let mut options: Vec<RawOption> = raw.supplements.into_iter().filter(|o| o.is_active).collect();
    options.sort_by_key(|o| o.sort_order);
    OptionGroup {
        id: raw.id,
        name: raw.name.trim().to_string(),
        description: raw.description,
        required: raw.is_required,
        min_select: raw.min_selection,
        rule: ChoiceRule::from_max(raw.max_selection),
        options: options
            .into_iter()
            .map(|o| OptionItem {
                id: o.id,
                name: o.name.trim().to_string(),
                surcharge: Money::new(o.price),
                image: o.image_url,
            })
            .collect(),
    }
}
