use layerkit_designer::arrangement::{
    reconcile, ArrangeResponse, ArrangementResult, FixedClock, ReconcileOptions, SequentialIdSource,
    DEFAULT_SPACING,
};
use layerkit_designer::{Element, Rect};
use layerkit_core::ArrangeError;

fn options<'a>(clock: &'a FixedClock, ids: &'a SequentialIdSource) -> ReconcileOptions<'a> {
    ReconcileOptions {
        spacing: DEFAULT_SPACING,
        clock,
        ids,
    }
}

fn pair() -> Vec<Element> {
    vec![
        Element::rectangle("a", 0.0, 0.0, 100.0, 50.0),
        Element::rectangle("b", 0.0, 60.0, 100.0, 50.0),
    ]
}

#[test]
fn test_two_elements_next_to_existing_content() {
    let selection = pair();
    let mut all = selection.clone();
    all.push(Element::rectangle("bg", 0.0, 0.0, 200.0, 300.0));

    let arrangements = vec![
        ArrangementResult::new("a", Rect::new(0.0, 0.0, 80.0, 80.0)),
        ArrangementResult::new("b", Rect::new(100.0, 0.0, 80.0, 80.0)),
    ];
    let clock = FixedClock(1_700_000_000_000);
    let ids = SequentialIdSource::new();
    let result = reconcile(&selection, &arrangements, &all, &options(&clock, &ids));

    assert_eq!(result.derived_ids.len(), 2);
    let derived: Vec<&Element> = result.derived().collect();
    assert_eq!(derived[0].x, 300.0);
    assert_eq!(derived[1].x, 400.0);
    assert_eq!(derived[0].y, 0.0);
    assert_eq!(derived[1].y, 0.0);
    assert_eq!((derived[0].width, derived[0].height), (80.0, 80.0));

    // originals and the unrelated element are kept as they were
    assert_eq!(&result.elements[..3], &all[..]);
    assert!(result.removed_ids.is_empty());
    assert!(result.failure().is_none());
}

#[test]
fn test_suffix_fallback_ties_to_original() {
    let selection = vec![
        Element::rectangle("psd_layer_0042", 0.0, 0.0, 10.0, 10.0),
        Element::rectangle("psd_layer_0007", 20.0, 0.0, 10.0, 10.0),
    ];
    let arrangements = vec![ArrangementResult::new("0042", Rect::new(0.0, 0.0, 5.0, 5.0))];
    let result = reconcile(&selection, &arrangements, &selection, &ReconcileOptions::default());

    assert_eq!(result.derived_ids.len(), 1);
    let derived = result.derived().next().unwrap();
    assert_eq!(
        derived.custom_data.original_element_id().as_deref(),
        Some("psd_layer_0042")
    );
    assert!(derived.id.starts_with("psd_layer_0042_arranged_"));
    assert_eq!(result.fallback_matches.len(), 1);
    assert!(!result.fallback_matches[0].ambiguous);
}

#[test]
fn test_zero_width_entry_skipped_batch_continues() {
    let selection = pair();
    let arrangements = vec![
        ArrangementResult::new("a", Rect::new(0.0, 0.0, 0.0, 80.0)),
        ArrangementResult::new("b", Rect::new(100.0, 0.0, 80.0, 80.0)),
    ];
    let result = reconcile(&selection, &arrangements, &selection, &ReconcileOptions::default());

    assert_eq!(result.derived_ids.len(), 1);
    assert_eq!(result.invalid_ids, vec!["a".to_string()]);
    assert_eq!(result.unarranged_original_ids, vec!["a".to_string()]);
    assert!(result.is_success());
}

#[test]
fn test_reselected_derived_element_keeps_its_original() {
    let selection = pair();
    let first_pass = reconcile(
        &selection,
        &[
            ArrangementResult::new("a", Rect::new(0.0, 0.0, 80.0, 80.0)),
            ArrangementResult::new("b", Rect::new(100.0, 0.0, 80.0, 80.0)),
        ],
        &selection,
        &ReconcileOptions::default(),
    );
    let derived: Vec<Element> = first_pass.derived().cloned().collect();

    // arrange the two derived elements again
    let second = reconcile(
        &derived,
        &[
            ArrangementResult::new(derived[0].id.clone(), Rect::new(0.0, 0.0, 40.0, 40.0)),
            ArrangementResult::new(derived[1].id.clone(), Rect::new(50.0, 0.0, 40.0, 40.0)),
        ],
        &first_pass.elements,
        &ReconcileOptions::default(),
    );

    assert!(second.removed_ids.is_empty());
    assert_eq!(second.elements.len(), 6);
    for d in second.derived() {
        let original = d.custom_data.original_element_id().unwrap();
        assert!(derived.iter().any(|el| el.id == original));
    }
}

#[test]
fn test_service_payload_through_reconciler() {
    let raw = serde_json::json!({
        "success": true,
        "arrangements": [
            {"id": "a", "new_coords": {"x": 0, "y": 10, "width": 80, "height": 80}},
            {"id": 99, "new_coords": {"x": 0, "y": 0, "width": 80, "height": 80}},
            {"id": "b", "new_coords": {"left": 100, "top": 10, "right": 180, "bottom": 90}}
        ]
    });
    let response: ArrangeResponse = serde_json::from_value(raw).unwrap();
    let selection = pair();
    let result = reconcile(
        &selection,
        &response.arrangements,
        &selection,
        &ReconcileOptions::default(),
    );

    assert_eq!(result.derived_ids.len(), 2);
    assert_eq!(result.unmatched_ids, vec!["99".to_string()]);
    // "99" still counts towards the minimum y
    assert_eq!(result.offset.y, 0.0);
    let tops: Vec<f64> = result.derived().map(|el| el.y).collect();
    assert_eq!(tops, vec![10.0, 10.0]);
}

#[test]
fn test_total_failure_still_cleans_up() {
    let selection = pair();
    let mut stale = Element::rectangle("old_arranged_1_abc", 500.0, 0.0, 10.0, 10.0);
    stale.custom_data.mark_arranged("old", 1);
    let mut all = selection.clone();
    all.push(stale);

    let result = reconcile(
        &selection,
        &[ArrangementResult::new("zzz", Rect::new(0.0, 0.0, 1.0, 1.0))],
        &all,
        &ReconcileOptions::default(),
    );
    assert_eq!(result.elements, selection);
    assert_eq!(result.removed_ids, vec!["old_arranged_1_abc".to_string()]);
    assert!(matches!(result.failure(), Some(ArrangeError::NoMatches { .. })));
}

#[test]
fn test_malformed_entry_skipped_rest_arranged() {
    let raw = serde_json::json!({
        "success": true,
        "arrangements": [
            {"new_coords": {"x": 0, "y": 0, "width": 80, "height": 80}, "warnings": null},
            {"id": "a", "new_coords": {"x": 0, "y": 0, "width": 80, "height": 80},
             "quality_check": {"passed": true}},
            {"id": "b", "new_coords": {"x": 100, "y": 0, "width": 80, "height": 80},
             "scale_factor": "0.8"}
        ]
    });
    let response: ArrangeResponse = serde_json::from_value(raw).unwrap();
    let selection = pair();
    let result = reconcile(
        &selection,
        &response.arrangements,
        &selection,
        &ReconcileOptions::default(),
    );

    assert_eq!(result.derived_ids.len(), 2);
    assert_eq!(result.unmatched_ids, vec![String::new()]);
    assert!(result.unarranged_original_ids.is_empty());
}
