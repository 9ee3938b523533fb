//! Arrangement reconciliation.
//!
//! Turns a selection plus the layout service's target boxes into a new,
//! non-destructive layer arrangement:
//!
//! 1. drop derived elements from earlier passes that are not selected now;
//! 2. place the new cluster right of every kept element, top-aligned with
//!    the selection;
//! 3. clone each matched original into a derived element at its new box;
//! 4. return kept elements followed by the derived ones.
//!
//! Originals are never modified. Results that cannot be matched or carry an
//! unusable box are skipped individually.

use super::ids::{derived_id, Clock, IdSource, SystemClock, UuidIdSource};
use super::matching::{find_original, MatchKind};
use super::wire::ArrangementResult;
use crate::element::Element;
use layerkit_core::ArrangeError;
use std::collections::HashSet;

/// Horizontal gap between existing content and the arranged cluster.
pub const DEFAULT_SPACING: f64 = 100.0;

/// Tunables and injected sources for one pass.
#[derive(Clone, Copy)]
pub struct ReconcileOptions<'a> {
    pub spacing: f64,
    pub clock: &'a dyn Clock,
    pub ids: &'a dyn IdSource,
}

impl Default for ReconcileOptions<'static> {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            clock: &SystemClock,
            ids: &UuidIdSource,
        }
    }
}

impl std::fmt::Debug for ReconcileOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcileOptions")
            .field("spacing", &self.spacing)
            .finish_non_exhaustive()
    }
}

/// Translation applied to every arrangement box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// An arrangement id resolved through the loose heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackMatch {
    pub arrangement_id: String,
    pub element_id: String,
    pub ambiguous: bool,
}

/// Result of the cleanup step alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleanup {
    pub kept: Vec<Element>,
    pub removed_ids: Vec<String>,
}

/// Outcome of a full pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// New scene contents: kept elements, then derived ones.
    pub elements: Vec<Element>,
    pub derived_ids: Vec<String>,
    pub removed_ids: Vec<String>,
    /// Arrangement ids with no matching selected element.
    pub unmatched_ids: Vec<String>,
    /// Arrangement ids that matched but carried an unusable box.
    pub invalid_ids: Vec<String>,
    /// Selected elements that received no derived copy.
    pub unarranged_original_ids: Vec<String>,
    pub fallback_matches: Vec<FallbackMatch>,
    pub offset: Offset,
}

impl Reconciliation {
    pub fn is_success(&self) -> bool {
        !self.derived_ids.is_empty()
    }

    /// The error to report when nothing was created.
    pub fn failure(&self) -> Option<ArrangeError> {
        if self.is_success() {
            return None;
        }
        let mut unmatched = self.unmatched_ids.clone();
        unmatched.extend(self.invalid_ids.iter().cloned());
        Some(ArrangeError::NoMatches { unmatched })
    }

    pub fn derived(&self) -> impl Iterator<Item = &Element> {
        let start = self.elements.len() - self.derived_ids.len();
        self.elements[start..].iter()
    }
}

/// Ids that survive cleanup: the selection plus the originals it was derived from.
fn keep_ids(selection: &[Element]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for el in selection {
        ids.insert(el.id.clone());
        if let Some(original) = el.custom_data.original_element_id() {
            ids.insert(original);
        }
    }
    ids
}

/// Remove derived elements left over from earlier passes.
///
/// An element stays if it is selected (or is the source of a selected
/// derived element) or if it was never produced by arrangement.
pub fn cleanup(selection: &[Element], all_elements: &[Element]) -> Cleanup {
    let keep = keep_ids(selection);
    let mut kept = Vec::with_capacity(all_elements.len());
    let mut removed_ids = Vec::new();

    for el in all_elements {
        if keep.contains(&el.id) || !el.is_arranged() {
            kept.push(el.clone());
        } else {
            removed_ids.push(el.id.clone());
        }
    }

    if !removed_ids.is_empty() {
        tracing::info!("Cleaned up {} stale arranged element(s)", removed_ids.len());
        tracing::debug!("Removed: {:?}", removed_ids);
    }

    Cleanup { kept, removed_ids }
}

/// Offset placing the cluster right of `kept` and top-aligned with `selection`.
///
/// Non-finite values are ignored rather than poisoning the minimum or maximum.
pub fn compute_offset(
    kept: &[Element],
    selection: &[Element],
    arrangements: &[ArrangementResult],
    spacing: f64,
) -> Offset {
    let max_right = kept
        .iter()
        .map(Element::right_edge)
        .filter(|v| v.is_finite())
        .reduce(f64::max)
        .unwrap_or(0.0);

    let min_new_y = arrangements
        .iter()
        .map(|a| a.new_coords.y)
        .filter(|v| v.is_finite())
        .reduce(f64::min);
    let min_original_y = selection
        .iter()
        .map(|el| el.y)
        .filter(|v| v.is_finite())
        .reduce(f64::min);

    let y = match (min_original_y, min_new_y) {
        (Some(orig), Some(new)) => orig - new,
        _ => 0.0,
    };

    Offset {
        x: max_right + spacing,
        y,
    }
}

/// Run a full reconciliation pass.
///
/// Callers only invoke this for selections of two or more elements; single
/// elements take the direct resize path instead.
pub fn reconcile(
    selection: &[Element],
    arrangements: &[ArrangementResult],
    all_elements: &[Element],
    options: &ReconcileOptions<'_>,
) -> Reconciliation {
    let Cleanup { kept, removed_ids } = cleanup(selection, all_elements);
    let offset = compute_offset(&kept, selection, arrangements, options.spacing);
    tracing::debug!("Arrangement offset: ({:.1}, {:.1})", offset.x, offset.y);

    let now = options.clock.now_ms();
    let mut derived = Vec::new();
    let mut unmatched_ids = Vec::new();
    let mut invalid_ids = Vec::new();
    let mut fallback_matches = Vec::new();

    for arrangement in arrangements {
        let Some(found) = find_original(selection, &arrangement.id) else {
            tracing::warn!("No selected element for arrangement id {:?}", arrangement.id);
            unmatched_ids.push(arrangement.id.clone());
            continue;
        };
        if found.kind == MatchKind::Fallback {
            fallback_matches.push(FallbackMatch {
                arrangement_id: arrangement.id.clone(),
                element_id: found.element.id.clone(),
                ambiguous: found.is_ambiguous(),
            });
        }

        let target = arrangement.new_coords;
        if !target.is_usable() {
            tracing::warn!(
                "Skipping arrangement {:?}: unusable box {:?}",
                arrangement.id,
                target
            );
            invalid_ids.push(arrangement.id.clone());
            continue;
        }

        let original = found.element;
        let placed = target.translated(offset.x, offset.y);
        let mut el = original.clone();
        el.id = derived_id(&original.id, now, &options.ids.suffix());
        el.x = placed.x;
        el.y = placed.y;
        el.width = placed.width;
        el.height = placed.height;
        el.touch(now, options.ids.nonce());
        el.custom_data.mark_arranged(&original.id, now);

        tracing::debug!(
            "Derived {} from {}: ({:.1}, {:.1}) {:.1}x{:.1}",
            el.id,
            original.id,
            el.x,
            el.y,
            el.width,
            el.height
        );
        derived.push(el);
    }

    let arranged_originals: HashSet<String> = derived
        .iter()
        .filter_map(|el| el.custom_data.original_element_id())
        .collect();
    let unarranged_original_ids: Vec<String> = selection
        .iter()
        .filter(|el| !arranged_originals.contains(&el.id))
        .map(|el| el.id.clone())
        .collect();

    if !unmatched_ids.is_empty() {
        tracing::warn!(
            "{} arrangement result(s) matched no selected element: {:?}",
            unmatched_ids.len(),
            unmatched_ids
        );
    }
    if !unarranged_original_ids.is_empty() {
        tracing::warn!(
            "{} selected element(s) were not arranged: {:?}",
            unarranged_original_ids.len(),
            unarranged_original_ids
        );
    }
    tracing::info!(
        "Arrangement matched {}/{} result(s), created {} element(s)",
        arrangements.len() - unmatched_ids.len(),
        arrangements.len(),
        derived.len()
    );

    let derived_ids = derived.iter().map(|el| el.id.clone()).collect();
    let mut elements = kept;
    elements.extend(derived);

    Reconciliation {
        elements,
        derived_ids,
        removed_ids,
        unmatched_ids,
        invalid_ids,
        unarranged_original_ids,
        fallback_matches,
        offset,
    }
}
