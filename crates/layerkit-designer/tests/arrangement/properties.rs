use layerkit_designer::arrangement::{reconcile, ArrangementResult, ReconcileOptions};
use layerkit_designer::{Element, Rect};
use proptest::prelude::*;

fn boxes(min: usize, max: usize) -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    prop::collection::vec(
        (-500.0..500.0f64, -500.0..500.0f64, 1.0..300.0f64, 1.0..300.0f64),
        min..max,
    )
}

fn elements(prefix: &str, raw: &[(f64, f64, f64, f64)]) -> Vec<Element> {
    raw.iter()
        .enumerate()
        .map(|(i, (x, y, w, h))| Element::rectangle(format!("{}{}", prefix, i), *x, *y, *w, *h))
        .collect()
}

fn arrangements_for(selection: &[Element], targets: &[(f64, f64, f64, f64)]) -> Vec<ArrangementResult> {
    selection
        .iter()
        .zip(targets)
        .map(|(el, (x, y, w, h))| ArrangementResult::new(el.id.clone(), Rect::new(x.abs(), *y, *w, *h)))
        .collect()
}

proptest! {
    #[test]
    fn prop_cleanup_does_not_accumulate(
        selected in boxes(2, 6),
        others in boxes(0, 5),
        targets in boxes(6, 7),
        passes in 2usize..5,
    ) {
        let selection = elements("s", &selected);
        let mut all = selection.clone();
        all.extend(elements("o", &others));
        let arrangements = arrangements_for(&selection, &targets);

        let mut sizes = Vec::new();
        let mut originals = Vec::new();
        for _ in 0..passes {
            let result = reconcile(&selection, &arrangements, &all, &ReconcileOptions::default());
            originals.push(result.elements.iter().filter(|el| !el.is_arranged()).count());
            sizes.push(result.elements.len());
            all = result.elements;
        }

        prop_assert!(sizes.windows(2).all(|w| w[0] == w[1]));
        prop_assert!(originals.iter().all(|n| *n == selected.len() + others.len()));
    }

    #[test]
    fn prop_cluster_right_of_content_and_top_aligned(
        selected in boxes(2, 6),
        others in boxes(0, 5),
        targets in boxes(6, 7),
    ) {
        let selection = elements("s", &selected);
        let mut all = selection.clone();
        all.extend(elements("o", &others));
        let arrangements = arrangements_for(&selection, &targets);

        let x0 = all.iter().map(|el| el.x + el.width).fold(f64::MIN, f64::max);
        let y_orig = selection.iter().map(|el| el.y).fold(f64::MAX, f64::min);

        let result = reconcile(&selection, &arrangements, &all, &ReconcileOptions::default());
        prop_assert_eq!(result.derived_ids.len(), selection.len());

        let top = result.derived().map(|el| el.y).fold(f64::MAX, f64::min);
        prop_assert!((top - y_orig).abs() < 1e-6);
        for el in result.derived() {
            prop_assert!(el.x >= x0 + 100.0 - 1e-9);
        }
    }
}
