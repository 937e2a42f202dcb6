use trend_rs::interaction::{ContactId, GestureMode};
use trend_rs::render::DirtyLevel;
use trend_rs::{TrendChart, TrendChartConfig, TrendError};

/// Chart whose draw rect is x = 15, width 100, showing ten ticks per pixel.
fn build_chart() -> TrendChart {
    let mut chart = TrendChart::new(TrendChartConfig::new(0, 1_000)).expect("chart init");
    chart.tick(130, 100).expect("frame");
    chart
}

#[test]
fn mouse_drag_pans_from_the_down_snapshot() {
    let mut chart = build_chart();
    chart.begin_drag(50.0);
    assert_eq!(chart.gestures().mode(), GestureMode::Panning);

    chart.continue_drag(60.0).expect("drag");
    assert_eq!(chart.viewport().range(), (-100, 900));
    assert_eq!(chart.pending_dirty_level(), DirtyLevel::Curves);

    // Offsets are measured from the down position, not the previous move.
    chart.continue_drag(60.0).expect("drag");
    assert_eq!(chart.viewport().range(), (-100, 900));

    chart.end_drag();
    chart.continue_drag(90.0).expect("no drag in progress");
    assert_eq!(chart.viewport().range(), (-100, 900));
}

#[test]
fn mouse_drag_on_ruler_moves_only_the_ruler() {
    let mut chart = build_chart();
    let ruler = chart.add_ruler(500);
    chart.tick(130, 100);

    chart.begin_drag(66.0);
    assert_eq!(chart.gestures().selected_ruler(), Some(ruler));
    assert_eq!(chart.pending_dirty_level(), DirtyLevel::Overlay);

    chart.continue_drag(76.0).expect("drag");
    assert_eq!(chart.ruler(ruler).expect("ruler").location, 600);
    assert_eq!(chart.viewport().range(), (0, 1_000));
    assert_eq!(chart.pending_dirty_level(), DirtyLevel::Overlay);

    chart.end_drag();
    assert_eq!(chart.gestures().selected_ruler(), None);
}

#[test]
fn wheel_zoom_scales_around_pointer_time() {
    let mut chart = build_chart();
    // Pixel 65 is tick 500; a delta of 1000 doubles the span.
    chart.wheel_zoom(1_000.0, 65.0).expect("zoom");
    assert_eq!(chart.viewport().range(), (-500, 1_500));

    chart.wheel_zoom(-500.0, 65.0).expect("zoom");
    assert_eq!(chart.viewport().range(), (0, 1_000));

    assert!(chart.wheel_zoom(-1_000.0, 65.0).is_err());
}

#[test]
fn single_touch_pans_with_time_glued_to_finger() {
    let mut chart = build_chart();
    let finger = ContactId::new(1);
    assert!(chart.begin_pinch(finger, 35.0));
    let down_time = chart.pixel_to_time(35.0);

    chart.continue_pinch(finger, 55.0).expect("pan");
    assert_eq!(chart.pixel_to_time(55.0), down_time);
    assert_eq!(chart.viewport().span(), 1_000);

    chart.end_pinch(finger);
    assert!(chart.gestures().contacts().is_empty());
}

#[test]
fn two_contacts_pinch_with_fixed_down_scale() {
    let mut chart = TrendChart::new(TrendChartConfig::new(0, 200)).expect("chart init");
    chart.tick(130, 100).expect("frame");
    // Two ticks per pixel with the draw rect starting at x = 15.
    let (a, b) = (ContactId::new(7), ContactId::new(8));
    assert!(chart.begin_pinch(a, 35.0));
    assert!(chart.begin_pinch(b, 75.0));
    assert!(!chart.begin_pinch(ContactId::new(9), 95.0));
    assert_eq!(chart.gestures().mode(), GestureMode::Pinching);

    let start_before = chart.viewport().start();
    chart.continue_pinch(a, 45.0).expect("pinch");
    chart.continue_pinch(b, 85.0).expect("pinch");
    assert_eq!(chart.viewport().start(), start_before - 20);
    assert_eq!(chart.viewport().span(), 200);

    // The ignored third contact does not move anything.
    chart
        .continue_pinch(ContactId::new(9), 10.0)
        .expect("ignored contact");
    assert_eq!(chart.viewport().start(), start_before - 20);
}

#[test]
fn pinch_scale_is_fixed_by_the_down_samples() {
    let mut chart = build_chart();
    let (a, b) = (ContactId::new(1), ContactId::new(2));
    chart.begin_pinch(a, 35.0);
    chart.begin_pinch(b, 75.0);

    // Moving only the second finger keeps the first time under the first finger.
    chart.continue_pinch(b, 95.0).expect("pinch");
    assert_eq!(chart.viewport().span(), 1_000);
    assert_eq!(chart.pixel_to_time(35.0), 200);
}

#[test]
fn degenerate_pinch_is_rejected() {
    let mut chart = build_chart();
    let (a, b) = (ContactId::new(1), ContactId::new(2));
    chart.begin_pinch(a, 40.0);
    chart.begin_pinch(b, 40.0);

    let err = chart.continue_pinch(a, 50.0).expect_err("zero spread");
    assert!(matches!(err, TrendError::InvalidPinchScale { .. }));
    assert_eq!(chart.viewport().range(), (0, 1_000));
}

#[test]
fn touch_on_ruler_drags_it_until_the_last_contact_lifts() {
    let mut chart = build_chart();
    let ruler = chart.add_ruler(500);
    chart.tick(130, 100);

    let finger = ContactId::new(3);
    chart.begin_pinch(finger, 68.0);
    assert_eq!(chart.gestures().selected_ruler(), Some(ruler));

    chart.continue_pinch(finger, 85.0).expect("ruler drag");
    assert_eq!(chart.ruler(ruler).expect("ruler").location, 700);
    assert_eq!(chart.viewport().range(), (0, 1_000));

    chart.end_pinch(finger);
    assert_eq!(chart.gestures().selected_ruler(), None);
    assert_eq!(chart.pending_dirty_level(), DirtyLevel::Overlay);
}

#[test]
fn extreme_gestures_fail_without_moving_the_view() {
    let mut chart = build_chart();
    assert!(chart.zoom_at_anchor(1.0e30, 0).is_err());
    assert!(chart.pan(-1.0e30).is_err());
    assert!(chart.wheel_zoom(1.0e30, 65.0).is_err());
    assert_eq!(chart.viewport().range(), (0, 1_000));

    chart.begin_drag(50.0);
    let err = chart.continue_drag(1.0e30).expect_err("overflowing drag");
    assert!(matches!(err, TrendError::InvalidData(_)));
    assert_eq!(chart.viewport().range(), (0, 1_000));
    chart.end_drag();

    let ruler = chart.add_ruler(500);
    chart.tick(130, 100);
    chart.begin_drag(65.0);
    assert!(chart.continue_drag(-1.0e30).is_err());
    assert_eq!(chart.ruler(ruler).expect("ruler").location, 500);
}

#[test]
fn extreme_touch_pan_is_rejected() {
    let mut chart = build_chart();
    let finger = ContactId::new(4);
    chart.begin_pinch(finger, 35.0);
    assert!(chart.continue_pinch(finger, -1.0e30).is_err());
    assert_eq!(chart.viewport().range(), (0, 1_000));
}
