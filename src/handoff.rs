//! Order hand-off: the textual breakdown given to the ordering channel.
//!
//! The core's contract stops at a complete, human-readable message — one
//! block per cart line plus the grand total. Turning it into a deep link
//! (URL encoding, contact number) belongs to the presentation layer.

use crate::domain::cart::Cart;

/// Where the order will be eaten; only changes the message header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DineMode {
    DineIn,
    TakeAway,
}

impl DineMode {
    pub fn label(&self) -> &'static str {
        match self {
            DineMode::DineIn => "Sur Place",
            DineMode::TakeAway => "À Emporter",
        }
    }
}

/// Build the order message: per line the quantity, name and line total,
/// followed by the chosen options grouped under their group names, then the
/// grand total.
pub fn order_message(cart: &Cart, mode: DineMode) -> String {
    let blocks: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            let mut block = format!("• {}× {} — {}", line.quantity(), line.name(), line.line_total());
            for (group, names) in line.options() {
                block.push_str(&format!("\n    • {}: {}", group, names.join(", ")));
            }
            block
        })
        .collect();

    format!(
        "Bonjour Just Cool 👋\n\nJe souhaite commander ({}) :\n\n{}\n\n*Total : {}*",
        mode.label(),
        blocks.join("\n\n"),
        cart.total()
    )
}
