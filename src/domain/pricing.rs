//! Unit price computation.

use crate::domain::catalog::{OptionItem, Product};
use crate::domain::value_objects::Money;

/// Order-level flags chosen by the visitor alongside the options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderTerms {
    /// Order the product as a combo/menu bundle.
    pub bundle: bool,
    /// Apply the product discount; only consulted when `bundle` is set.
    pub discount_eligible: bool,
}

/// Compute the unit price for one configured product.
///
/// Steps run in a fixed order for reproducibility:
/// 1. start from the base price
/// 2. add the bundle upcharge when the bundle is requested
/// 3. subtract the discount when the bundle is requested and eligible
/// 4. add every selected option surcharge
/// 5. floor at zero — a price is never negative, whatever the discount
pub fn unit_price<'a>(
    product: &Product,
    terms: OrderTerms,
    selected: impl IntoIterator<Item = &'a OptionItem>,
) -> Money {
    let mut price = product.base_price;
    if terms.bundle {
        if let Some(upcharge) = product.bundle_upcharge {
            price = price.add(upcharge);
        }
        if terms.discount_eligible {
            if let Some(discount) = product.discount {
                price = price.sub(discount);
            }
        }
    }
    for option in selected {
        price = price.add(option.surcharge);
    }
    price.floor_zero()
}

/// Per-unit total of the selected option surcharges, kept on the cart line
/// for display.
pub fn surcharge_total<'a>(selected: impl IntoIterator<Item = &'a OptionItem>) -> Money {
    selected
        .into_iter()
        .fold(Money::ZERO, |acc, o| acc.add(o.surcharge))
}
