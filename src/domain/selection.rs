//! Option selection state and validation for one product customization.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::catalog::{ChoiceRule, OptionGroup};

/// Chosen option ids per group for one in-progress customization.
///
/// Created empty when a customization view opens, discarded on cancel,
/// consumed once on a successful add to cart. Within a group the ids keep
/// click order; that order only matters for display, the cart fingerprint
/// normalizes it away.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    chosen: HashMap<String, Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chosen option ids for a group, in click order.
    pub fn chosen(&self, group_id: &str) -> &[String] {
        self.chosen.get(group_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.values().all(Vec::is_empty)
    }

    /// Flip one option, enforcing the group's cardinality as the click
    /// happens (never only at validation time):
    ///
    /// - single-choice: re-clicking the sole selection clears it unless the
    ///   group is required (then it is a no-op — a set required group can be
    ///   changed but not emptied); any other click replaces the selection;
    /// - multi-choice: a selected option is removed; a new one is appended
    ///   unless the group already sits at its maximum, in which case the
    ///   click is ignored.
    ///
    /// Option ids that are not among the group's active options are ignored.
    /// After any toggle sequence, the selected count never exceeds the
    /// group's maximum.
    pub fn toggle(&mut self, group: &OptionGroup, option_id: &str) {
        if group.option(option_id).is_none() {
            return;
        }
        let slot = self.chosen.entry(group.id.clone()).or_default();
        match group.rule {
            ChoiceRule::Single => {
                let is_current = slot.len() == 1 && slot[0] == option_id;
                if is_current {
                    if !group.required {
                        slot.clear();
                    }
                } else {
                    slot.clear();
                    slot.push(option_id.to_string());
                }
            }
            ChoiceRule::Multi { max } => {
                if let Some(pos) = slot.iter().position(|id| id == option_id) {
                    slot.remove(pos);
                } else if (slot.len() as u32) < max {
                    slot.push(option_id.to_string());
                }
            }
        }
    }
}

/// Why a required group rejected the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Fewer picks than the group minimum.
    UnmetMinimum,
    /// The group has no active options, so it can never be satisfied. A
    /// content-authoring defect, surfaced instead of silently passed.
    NoActiveOptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupFailure {
    pub group_id: String,
    pub kind: FailureKind,
}

/// Check every required group against its minimum selection count.
///
/// Failures come back in the product's group sort order, so the first entry
/// is where the UI should send the visitor. Empty means the selection is
/// acceptable. Non-required groups never fail, whatever their count.
pub fn validate(groups: &[OptionGroup], selection: &Selection) -> Vec<GroupFailure> {
    let mut failures = Vec::new();
    for group in groups {
        if !group.required {
            continue;
        }
        if group.options.is_empty() {
            warn!(
                group_id = %group.id,
                group_name = %group.name,
                "required group has no active options and can never be satisfied"
            );
            failures.push(GroupFailure {
                group_id: group.id.clone(),
                kind: FailureKind::NoActiveOptions,
            });
            continue;
        }
        let picked = selection.chosen(&group.id).len() as u32;
        if picked < group.required_min() {
            failures.push(GroupFailure {
                group_id: group.id.clone(),
                kind: FailureKind::UnmetMinimum,
            });
        }
    }
    failures
}
