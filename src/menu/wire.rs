//! Raw menu records exactly as the menu service delivers them.
//!
//! Field names mirror the endpoint payload; extra fields (`created_at`,
//! `product_id`, `group_id`, …) are ignored. These records exist only to be
//! fed to [`crate::menu::normalize`].

use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct RawOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawOptionGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_required: bool,
    #[serde(default)]
    pub min_selection: u32,
    pub max_selection: u32,
    pub sort_order: i32,
    #[serde(default)]
    pub supplements: Vec<RawOption>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub supplement_groups: Vec<RawOptionGroup>,
    #[serde(default)]
    pub menu_upcharge: Option<Decimal>,
    #[serde(default)]
    pub student_discount: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
    #[serde(default)]
    pub products: Vec<RawProduct>,
}
