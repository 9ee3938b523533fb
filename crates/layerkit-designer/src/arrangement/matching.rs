//! Resolving arrangement ids back to selected elements.
//!
//! The layout service is a language model and sometimes echoes ids with
//! whitespace, a prefix or a truncated tail. Exact matches win; otherwise a
//! containment heuristic picks the first selected element, in selection
//! order, whose id contains or is contained in the returned id.

use crate::element::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct IdMatch<'a> {
    pub element: &'a Element,
    pub kind: MatchKind,
    /// Every selected element the heuristic would have accepted.
    pub candidates: usize,
}

impl IdMatch<'_> {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}

/// Loose id comparison on trimmed strings.
///
/// Suffix matches are a special case of containment and need no separate
/// check. An empty id never matches loosely, since it is contained in
/// everything.
pub fn ids_loosely_match(element_id: &str, arrangement_id: &str) -> bool {
    let e = element_id.trim();
    let a = arrangement_id.trim();
    if e.is_empty() || a.is_empty() {
        return false;
    }
    e == a || e.contains(a) || a.contains(e)
}

/// Find the selected element an arrangement id refers to.
pub fn find_original<'a>(selection: &'a [Element], arrangement_id: &str) -> Option<IdMatch<'a>> {
    if let Some(element) = selection.iter().find(|el| el.id == arrangement_id) {
        return Some(IdMatch {
            element,
            kind: MatchKind::Exact,
            candidates: 1,
        });
    }

    let mut candidates = selection
        .iter()
        .filter(|el| ids_loosely_match(&el.id, arrangement_id));
    let element = candidates.next()?;
    let others: Vec<&str> = candidates.map(|el| el.id.as_str()).collect();

    if others.is_empty() {
        tracing::warn!(
            "Loose id match: arrangement id {:?} -> element {:?}",
            arrangement_id,
            element.id
        );
    } else {
        tracing::warn!(
            "Ambiguous loose id match for {:?}: picked {:?}, also matched {:?}",
            arrangement_id,
            element.id,
            others
        );
    }

    Some(IdMatch {
        element,
        kind: MatchKind::Fallback,
        candidates: 1 + others.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(ids: &[&str]) -> Vec<Element> {
        ids.iter()
            .map(|id| Element::rectangle(*id, 0.0, 0.0, 1.0, 1.0))
            .collect()
    }

    #[test]
    fn test_exact_beats_fallback() {
        let s = sel(&["layer_12", "12"]);
        let m = find_original(&s, "12").unwrap();
        assert_eq!(m.element.id, "12");
        assert_eq!(m.kind, MatchKind::Exact);
    }

    #[test]
    fn test_suffix_and_prefix_drift() {
        let s = sel(&["psd_layer_0042", "other"]);
        let m = find_original(&s, "0042").unwrap();
        assert_eq!(m.element.id, "psd_layer_0042");
        assert_eq!(m.kind, MatchKind::Fallback);
        assert!(!m.is_ambiguous());

        let m = find_original(&s, " id:psd_layer_0042 ").unwrap();
        assert_eq!(m.element.id, "psd_layer_0042");
    }

    #[test]
    fn test_ambiguous_takes_first_in_order() {
        let s = sel(&["a_1", "b_1", "c"]);
        let m = find_original(&s, "_1").unwrap();
        assert_eq!(m.element.id, "a_1");
        assert_eq!(m.candidates, 2);
        assert!(m.is_ambiguous());
    }

    #[test]
    fn test_no_match() {
        let s = sel(&["alpha", "beta"]);
        assert!(find_original(&s, "gamma").is_none());
        assert!(find_original(&s, "").is_none());
        assert!(find_original(&s, "   ").is_none());
    }
}
