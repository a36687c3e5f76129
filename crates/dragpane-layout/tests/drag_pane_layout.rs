#![forbid(unsafe_code)]

//! End-to-end container behavior: gesture streams in, events and offsets
//! out, with the settle loop ticked the way a host frame scheduler would.

use std::time::Duration;

use dragpane_core::{Rect, TouchEvent};
use dragpane_layout::{DragPaneLayout, Mode, PaneEvent, SavedState};
use web_time::Instant;

const MS_10: Duration = Duration::from_millis(10);
const MS_16: Duration = Duration::from_millis(16);

fn layout_with(mode: Mode, range: i32) -> (DragPaneLayout, Instant) {
    let mut layout = DragPaneLayout::new();
    let now = Instant::now();
    layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
    layout.set_mode(mode, now);
    layout.set_drag_range(range, now);
    layout.on_layout(Rect::from_size(300, 600), now);
    layout.drain_events();
    (layout, now)
}

/// Tick the settle loop to completion, 16ms frames.
fn settle(layout: &mut DragPaneLayout, mut now: Instant) -> Instant {
    for _ in 0..1000 {
        if !layout.compute_scroll(now) {
            return now;
        }
        now += MS_16;
    }
    panic!("settle did not finish");
}

fn opened_count(events: &[PaneEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, PaneEvent::Opened { .. }))
        .count()
}

fn closed_count(events: &[PaneEvent]) -> usize {
    events.iter().filter(|e| matches!(e, PaneEvent::Closed)).count()
}

// -- programmatic open/close ------------------------------------------------

#[test]
fn programmatic_open_then_close() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.open_pane(t);
    let t = settle(&mut layout, t);
    let events = layout.drain_events();
    assert_eq!(opened_count(&events), 1);
    assert_eq!(closed_count(&events), 0);
    assert!(matches!(
        events.last(),
        Some(PaneEvent::Opened { mode: Mode::Right, offset }) if *offset == -1.0
    ));
    assert!(layout.is_opened());
    assert_eq!(layout.offset(), -1.0);

    layout.close_pane(t);
    let _ = settle(&mut layout, t);
    let events = layout.drain_events();
    assert_eq!(closed_count(&events), 1);
    assert!(matches!(events.last(), Some(PaneEvent::Closed)));
    assert!(layout.is_closed());
    assert_eq!(layout.offset(), 0.0);
}

#[test]
fn left_mode_opens_to_positive_offset() {
    let (mut layout, t) = layout_with(Mode::Left, 100);
    layout.open_pane(t);
    settle(&mut layout, t);
    assert_eq!(layout.offset(), 1.0);
    assert!(layout.is_opened());
}

#[test]
fn close_while_closed_emits_nothing() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    layout.close_pane(t);
    assert!(!layout.compute_scroll(t));
    assert!(layout.drain_events().is_empty());
}

#[test]
fn settle_offsets_shrink_monotonically_while_closing() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    layout.open_pane(t);
    let t = settle(&mut layout, t);
    layout.drain_events();

    layout.close_pane(t);
    settle(&mut layout, t);
    let events = layout.drain_events();
    let mut last_abs = 1.0f32;
    for event in &events {
        if let PaneEvent::Dragged { offset, .. } = event {
            assert!(offset.abs() <= last_abs, "offset magnitude grew: {events:?}");
            assert!(*offset <= 0.0);
            last_abs = offset.abs();
        }
    }
    assert!(matches!(events.last(), Some(PaneEvent::Closed)));
}

// -- drag gestures ----------------------------------------------------------

#[test]
fn slow_release_past_half_snaps_open() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(130.0, 100.0, t + MS_10));
    layout.on_touch_event(&TouchEvent::moved(110.0, 100.0, t + MS_10 * 2));
    layout.on_touch_event(&TouchEvent::moved(90.0, 100.0, t + MS_10 * 3));
    assert!((layout.offset() + 0.6).abs() < 1e-6);
    // The pointer rests long enough that no fling velocity remains.
    let up = t + Duration::from_millis(500);
    layout.on_touch_event(&TouchEvent::up(90.0, 100.0, up));

    settle(&mut layout, up);
    let events = layout.drain_events();
    assert_eq!(opened_count(&events), 1);
    assert!(layout.is_opened());
    assert_eq!(layout.offset(), -1.0);
}

#[test]
fn slow_release_before_half_snaps_closed() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(110.0, 100.0, t + MS_10));
    let up = t + Duration::from_millis(500);
    layout.on_touch_event(&TouchEvent::up(110.0, 100.0, up));

    settle(&mut layout, up);
    let events = layout.drain_events();
    assert_eq!(closed_count(&events), 1);
    assert_eq!(opened_count(&events), 0);
    assert!(layout.is_closed());
    assert!(!layout.save_state().is_open);
}

#[test]
fn fling_opens_before_the_halfway_point() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.on_touch_event(&TouchEvent::down(250.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(235.0, 100.0, t + MS_10));
    layout.on_touch_event(&TouchEvent::moved(220.0, 100.0, t + MS_10 * 2));
    layout.on_touch_event(&TouchEvent::moved(205.0, 100.0, t + MS_10 * 3));
    assert!((layout.offset() + 0.45).abs() < 1e-6);
    let up = t + MS_10 * 3;
    layout.on_touch_event(&TouchEvent::up(205.0, 100.0, up));

    settle(&mut layout, up);
    assert!(layout.is_opened());
    assert_eq!(layout.offset(), -1.0);
}

#[test]
fn zero_drag_range_never_moves() {
    let (mut layout, t) = layout_with(Mode::Right, 0);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(80.0, 100.0, t + MS_10));
    layout.on_touch_event(&TouchEvent::up(80.0, 100.0, t + MS_10 * 2));

    let events = layout.drain_events();
    assert!(
        events
            .iter()
            .all(|e| !matches!(e, PaneEvent::Dragged { .. })),
        "a zero-range pane must not move: {events:?}"
    );
    assert_eq!(layout.offset(), 0.0);
    assert!(layout.is_closed());
}

#[test]
fn both_mode_commits_only_past_half_on_matching_side() {
    let (mut layout, t) = layout_with(Mode::Both, 100);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(170.0, 100.0, t + MS_10));
    layout.on_touch_event(&TouchEvent::moved(190.0, 100.0, t + MS_10 * 2));
    layout.on_touch_event(&TouchEvent::moved(210.0, 100.0, t + MS_10 * 3));
    let up = t + Duration::from_millis(500);
    layout.on_touch_event(&TouchEvent::up(210.0, 100.0, up));

    settle(&mut layout, up);
    let events = layout.drain_events();
    assert!(matches!(
        events.last(),
        Some(PaneEvent::Opened { mode: Mode::Both, offset }) if *offset == 1.0
    ));
    assert_eq!(layout.offset(), 1.0);
}

#[test]
fn both_mode_fling_toward_the_far_side_closes() {
    let (mut layout, t) = layout_with(Mode::Both, 100);

    // Slide right, pause, then fling left without crossing center.
    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(170.0, 100.0, t + MS_10));
    layout.on_touch_event(&TouchEvent::moved(190.0, 100.0, t + Duration::from_millis(200)));
    layout.on_touch_event(&TouchEvent::moved(175.0, 100.0, t + Duration::from_millis(210)));
    layout.on_touch_event(&TouchEvent::moved(160.0, 100.0, t + Duration::from_millis(220)));
    let up = t + Duration::from_millis(220);
    layout.on_touch_event(&TouchEvent::up(160.0, 100.0, up));

    settle(&mut layout, up);
    // The pane never crossed center, so the fling may not jump it to the
    // opposite rest; it closes instead.
    assert!(layout.is_closed());
    assert!(matches!(layout.drain_events().last(), Some(PaneEvent::Closed)));
}

#[test]
fn new_pane_mid_drag_aborts_the_gesture() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(110.0, 100.0, t + MS_10));
    layout.drain_events();

    layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
    layout.on_touch_event(&TouchEvent::moved(70.0, 100.0, t + MS_10 * 2));
    layout.on_touch_event(&TouchEvent::up(70.0, 100.0, t + MS_10 * 3));
    assert!(layout.drain_events().is_empty());
    assert!((layout.offset() + 0.4).abs() < 1e-6);
}

#[test]
fn cancelled_takeover_mid_settle_emits_no_settled_event() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(110.0, 100.0, t + MS_10));
    let up = t + Duration::from_millis(400);
    layout.on_touch_event(&TouchEvent::up(110.0, 100.0, up));
    layout.drain_events();

    // Touch the settling pane (reclaiming it), then the system cancels.
    layout.on_touch_event(&TouchEvent::down(110.0, 100.0, up + MS_16));
    layout.on_touch_event(&TouchEvent::cancel(110.0, 100.0, up + MS_16 * 2));

    let events = layout.drain_events();
    assert_eq!(opened_count(&events), 0);
    assert_eq!(closed_count(&events), 0);
    assert!(!layout.compute_scroll(up + MS_16 * 3));
    // Stranded mid-travel: neither open nor closed.
    assert!(!layout.is_opened());
    assert!(!layout.is_closed());
}

// -- intercept & ancestor policy --------------------------------------------

#[test]
fn disabled_drag_opening_ignores_touches_while_closed() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    layout.set_drag_openable(false);

    assert!(!layout.on_intercept_touch_event(&TouchEvent::down(150.0, 100.0, t)));
    assert!(!layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t)));

    // Programmatic opening still works, and an open pane handles touches.
    layout.open_pane(t);
    let t = settle(&mut layout, t);
    assert!(layout.is_opened());
    assert!(layout.on_touch_event(&TouchEvent::down(50.0, 100.0, t)));
}

#[test]
fn touches_on_an_open_pane_are_intercepted() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    layout.open_pane(t);
    let t = settle(&mut layout, t);
    layout.drain_events();

    // Pane rests at -100; (50, 100) is on it.
    assert!(layout.on_intercept_touch_event(&TouchEvent::down(50.0, 100.0, t)));
}

#[test]
fn ancestor_intercept_needs_vertical_travel_while_closed() {
    let (mut layout, t) = layout_with(Mode::Right, 100);

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    assert!(!layout.ancestor_intercept_allowed());
    layout.on_touch_event(&TouchEvent::moved(150.0, 110.0, t + MS_10));
    assert!(!layout.ancestor_intercept_allowed(), "below threshold");
    layout.on_touch_event(&TouchEvent::moved(150.0, 135.0, t + MS_10 * 2));
    assert!(layout.ancestor_intercept_allowed());
}

#[test]
fn ancestor_intercept_never_allowed_while_open() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    layout.open_pane(t);
    let t = settle(&mut layout, t);

    layout.on_touch_event(&TouchEvent::down(50.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(50.0, 140.0, t + MS_10));
    assert!(!layout.ancestor_intercept_allowed());
}

// -- lifecycle & persistence ------------------------------------------------

#[test]
fn restored_snapshot_reopens_on_first_layout() {
    let (mut source, t) = layout_with(Mode::Left, 120);
    source.open_pane(t);
    settle(&mut source, t);
    let ss = source.save_state();
    assert!(ss.is_open);

    let json = serde_json::to_string(&ss).unwrap();
    let ss: SavedState = serde_json::from_str(&json).unwrap();

    let mut layout = DragPaneLayout::new();
    layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
    layout.restore_state(&ss);
    assert!(layout.is_closed(), "restore must not move the pane");

    let t2 = Instant::now();
    layout.on_layout(Rect::from_size(300, 600), t2);
    settle(&mut layout, t2);
    let events = layout.drain_events();
    assert_eq!(opened_count(&events), 1);
    assert_eq!(layout.mode(), Mode::Left);
    assert_eq!(layout.drag_range(), 120);
    assert_eq!(layout.offset(), 1.0);
}

#[test]
fn both_mode_restore_reopens_the_remembered_side() {
    let (mut source, t) = layout_with(Mode::Both, 100);
    source.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    source.on_touch_event(&TouchEvent::moved(180.0, 100.0, t + MS_10));
    source.on_touch_event(&TouchEvent::moved(210.0, 100.0, t + MS_10 * 2));
    let up = t + Duration::from_millis(500);
    source.on_touch_event(&TouchEvent::up(210.0, 100.0, up));
    settle(&mut source, up);
    assert_eq!(source.offset(), 1.0);
    let ss = source.save_state();
    assert_eq!(ss.both_mode_offset_state, 1);

    let mut layout = DragPaneLayout::new();
    layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
    layout.restore_state(&ss);
    let t2 = Instant::now();
    layout.on_layout(Rect::from_size(300, 600), t2);
    settle(&mut layout, t2);
    assert_eq!(layout.offset(), 1.0, "reopened on the positive side");
}

#[test]
fn first_layout_rule_runs_once_per_attach() {
    let ss = SavedState {
        is_open: true,
        is_drag_openable: true,
        mode: Mode::Right,
        both_mode_offset_state: 0,
        drag_range: 100,
    };
    let mut layout = DragPaneLayout::new();
    layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
    layout.restore_state(&ss);

    let t = Instant::now();
    layout.on_layout(Rect::from_size(300, 600), t);
    let t = settle(&mut layout, t);
    assert_eq!(opened_count(&layout.drain_events()), 1);

    // Same-width relayout: nothing to re-apply.
    layout.on_layout(Rect::from_size(300, 600), t);
    assert!(!layout.compute_scroll(t));
    assert!(layout.drain_events().is_empty());

    // Detach/reattach: the rule runs again, but the pane is already at its
    // preserved rest, so nothing moves and no duplicate event fires.
    layout.on_detached_from_window();
    layout.on_attached_to_window();
    layout.on_layout(Rect::from_size(300, 600), t);
    assert!(!layout.compute_scroll(t));
    assert!(layout.drain_events().is_empty());
    assert!(layout.is_opened());
}

#[test]
fn width_change_recomputes_ratio_and_reapplies_state() {
    let mut layout = DragPaneLayout::new();
    let t = Instant::now();
    layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
    layout.set_drag_range_ratio(0.4, t);
    layout.on_layout(Rect::from_size(300, 600), t);
    assert_eq!(layout.drag_range(), 120);

    layout.open_pane(t);
    let t = settle(&mut layout, t);
    layout.drain_events();

    // Host relayouts wider; range follows the ratio and the open pane snaps
    // back to its new fully-open rest.
    layout.on_layout(Rect::from_size(400, 600), t);
    settle(&mut layout, t);
    assert_eq!(layout.drag_range(), 160);
    assert_eq!(layout.offset(), -1.0);
    assert!(layout.is_opened());
    assert!(matches!(
        layout.drain_events().last(),
        Some(PaneEvent::Opened { .. })
    ));
}

#[test]
fn mode_switch_away_from_both_closes_first() {
    let (mut layout, t) = layout_with(Mode::Both, 100);
    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(180.0, 100.0, t + MS_10));
    layout.on_touch_event(&TouchEvent::moved(210.0, 100.0, t + MS_10 * 2));
    let up = t + Duration::from_millis(500);
    layout.on_touch_event(&TouchEvent::up(210.0, 100.0, up));
    let t = settle(&mut layout, up);
    assert_eq!(layout.offset(), 1.0);
    layout.drain_events();

    layout.set_mode(Mode::Left, t);
    settle(&mut layout, t);
    assert_eq!(layout.mode(), Mode::Left);
    assert!(layout.is_closed());
    assert!(matches!(layout.drain_events().last(), Some(PaneEvent::Closed)));
}

// -- transforms -------------------------------------------------------------

#[test]
fn transform_follows_the_drag() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    layout.set_secondary_pane(Some(200));

    layout.on_touch_event(&TouchEvent::down(150.0, 100.0, t));
    layout.on_touch_event(&TouchEvent::moved(90.0, 100.0, t + MS_10));

    let transform = layout.transform();
    assert!((transform.drag_pane_scale - 0.88).abs() < 1e-6);
    let secondary = transform.secondary.unwrap();
    assert!((secondary.translate_x - 40.0).abs() < 1e-6);
    assert!((secondary.scale - 0.92).abs() < 1e-6);
    assert_eq!(transform.overlay_argb, 0x3E00_0000);
}

#[test]
fn pane_bounds_track_the_offset() {
    let (mut layout, t) = layout_with(Mode::Right, 100);
    assert_eq!(layout.drag_pane_bounds(), Some(Rect::new(0, 0, 300, 600)));
    layout.open_pane(t);
    settle(&mut layout, t);
    assert_eq!(layout.drag_pane_bounds(), Some(Rect::new(-100, 0, 300, 600)));
}
