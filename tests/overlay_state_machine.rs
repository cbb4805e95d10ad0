
use fakes::{overlay, FakeSurface, MemoryLocationStore};
use overlay_timer::geometry::{Coordinate, Rect};
use overlay_timer::overlay::{DragState, MouseButton};
use overlay_timer::signals::Signal;
use overlay_timer::timer::TimerState;
use std::time::Duration;

fn primary_work_area() -> Rect {
    Rect::new(0, 0, 1920, 1040)
}

#[test]
fn countdown_runs_to_zero_then_expires_once() {
    let surface = FakeSurface::default();
    let store = MemoryLocationStore::default();
    let mut overlay = overlay(&surface, &store);
    overlay.set_default_duration(Duration::from_secs(3));

    assert_eq!(overlay.toggle(), Signal::TimerStarted);
    assert_eq!(
        overlay.timer_state(),
        TimerState::Running {
            remaining: Duration::from_secs(3)
        }
    );
    assert_eq!(
        surface.0.borrow().tick_interval,
        Some(Duration::from_secs(1))
    );

    let mut seen = Vec::new();
    for _ in 0..3 {
        assert_eq!(overlay.tick(), None);
        seen.push(overlay.display_text());
    }
    assert_eq!(seen, vec!["00:02", "00:01", "00:00"]);

    assert_eq!(overlay.tick(), Some(Signal::TimerExpired));
    assert_eq!(overlay.timer_state(), TimerState::Expired);
    assert!(!surface.0.borrow().ticking());

    // stale ticks after expiry are ignored
    assert_eq!(overlay.tick(), None);
    assert_eq!(overlay.display_text(), "00:00");
}

#[test]
fn toggle_while_running_resets_to_current_default() {
    let surface = FakeSurface::default();
    let mut overlay = overlay(&surface, &MemoryLocationStore::default());

    overlay.toggle();
    overlay.tick();
    overlay.tick();
    assert_eq!(overlay.toggle(), Signal::TimerStopped);
    assert_eq!(
        overlay.timer_state(),
        TimerState::Idle {
            remaining: Duration::from_secs(90)
        }
    );
    assert_eq!(surface.0.borrow().text(), "01:30");
}

#[test]
fn toggle_after_expiry_restarts_from_default() {
    let mut overlay = overlay(&FakeSurface::default(), &MemoryLocationStore::default());
    overlay.set_default_duration(Duration::from_secs(1));
    overlay.toggle();
    overlay.tick();
    overlay.tick();
    assert_eq!(overlay.timer_state(), TimerState::Expired);

    assert_eq!(overlay.toggle(), Signal::TimerStarted);
    assert_eq!(
        overlay.timer_state(),
        TimerState::Running {
            remaining: Duration::from_secs(1)
        }
    );
}

#[test]
fn changing_duration_mid_run_cancels_the_run() {
    let surface = FakeSurface::default();
    let mut overlay = overlay(&surface, &MemoryLocationStore::default());
    overlay.toggle();
    for _ in 0..10 {
        overlay.tick();
    }

    let signal = overlay.set_default_duration(Duration::from_secs(75));
    assert_eq!(signal, Signal::DurationChanged(Duration::from_secs(75)));
    assert!(!overlay.timer_state().is_running());
    assert_eq!(overlay.timer_state().remaining(), Duration::from_secs(75));
    assert!(!surface.0.borrow().ticking());
}

#[test]
fn long_durations_show_unbounded_minutes() {
    let mut overlay = overlay(&FakeSurface::default(), &MemoryLocationStore::default());
    overlay.set_default_duration(Duration::from_secs(100 * 60 + 5));
    assert_eq!(overlay.display_text(), "100:05");
}

#[test]
fn applied_locations_stay_inside_the_work_area() {
    let surface = FakeSurface::with_work_area(primary_work_area());
    let mut overlay = overlay(&surface, &MemoryLocationStore::default());
    let size = overlay.size();
    let area = primary_work_area();

    for desired in [
        Coordinate::new(-5000, 9999),
        Coordinate::new(9999, -5000),
        Coordinate::new(1919, 1039),
        Coordinate::new(500, 500),
    ] {
        overlay.apply_location(desired);
        let placed = overlay.location();
        assert!(placed.x >= area.left && placed.x + size.width <= area.right, "{placed:?}");
        assert!(placed.y >= area.top && placed.y + size.height <= area.bottom, "{placed:?}");
        assert_eq!(surface.0.borrow().location, Some(placed));
    }
}

#[test]
fn unavailable_work_area_applies_location_verbatim() {
    let surface = FakeSurface::default();
    let mut overlay = overlay(&surface, &MemoryLocationStore::default());
    overlay.apply_location(Coordinate::new(-5000, 9999));
    assert_eq!(overlay.location(), Coordinate::new(-5000, 9999));
}

#[test]
fn drag_follows_cursor_minus_anchor_and_persists_on_release() {
    let surface = FakeSurface::with_work_area(primary_work_area());
    let store = MemoryLocationStore::default();
    let mut overlay = overlay(&surface, &store);

    overlay.mouse_down(MouseButton::Primary, Coordinate::new(10, 10));
    assert_eq!(
        overlay.drag_state(),
        DragState::Dragging {
            anchor: Coordinate::new(10, 10)
        }
    );

    overlay.mouse_move(Coordinate::new(300, 300));
    assert_eq!(overlay.location(), Coordinate::new(290, 290));
    assert_eq!(surface.0.borrow().location, Some(Coordinate::new(290, 290)));
    assert_eq!(store.saves(), 0);

    overlay.mouse_up(MouseButton::Primary);
    assert_eq!(overlay.drag_state(), DragState::NotDragging);
    assert_eq!(store.saved(), Some(Coordinate::new(290, 290)));
    assert_eq!(store.saves(), 1);
}

#[test]
fn second_press_mid_drag_keeps_the_first_anchor() {
    let surface = FakeSurface::with_work_area(primary_work_area());
    let store = MemoryLocationStore::default();
    let mut overlay = overlay(&surface, &store);

    overlay.mouse_down(MouseButton::Primary, Coordinate::new(10, 10));
    overlay.mouse_down(MouseButton::Primary, Coordinate::new(50, 50));
    assert_eq!(
        overlay.drag_state(),
        DragState::Dragging {
            anchor: Coordinate::new(10, 10)
        }
    );

    overlay.mouse_move(Coordinate::new(300, 300));
    assert_eq!(overlay.location(), Coordinate::new(290, 290));
}

#[test]
fn lost_capture_ends_the_drag_and_persists() {
    let surface = FakeSurface::with_work_area(primary_work_area());
    let store = MemoryLocationStore::default();
    let mut overlay = overlay(&surface, &store);

    overlay.mouse_down(MouseButton::Primary, Coordinate::new(10, 10));
    overlay.mouse_move(Coordinate::new(400, 200));
    overlay.end_drag();
    assert_eq!(overlay.drag_state(), DragState::NotDragging);
    assert_eq!(store.saved(), Some(Coordinate::new(390, 190)));

    // later moves with the button up no longer drag
    overlay.mouse_move(Coordinate::new(800, 800));
    assert_eq!(overlay.location(), Coordinate::new(390, 190));

    overlay.end_drag();
    assert_eq!(store.saves(), 1);
}

#[test]
fn drag_is_not_clamped_while_moving() {
    let surface = FakeSurface::with_work_area(primary_work_area());
    let mut overlay = overlay(&surface, &MemoryLocationStore::default());

    overlay.mouse_down(MouseButton::Primary, Coordinate::new(0, 0));
    overlay.mouse_move(Coordinate::new(-200, -200));
    assert_eq!(overlay.location(), Coordinate::new(-200, -200));
}

#[test]
fn mouse_moves_without_a_drag_are_ignored() {
    let surface = FakeSurface::default();
    let mut overlay = overlay(&surface, &MemoryLocationStore::default());
    overlay.mouse_move(Coordinate::new(700, 700));
    assert_eq!(overlay.location(), Coordinate::new(100, 100));
}

#[test]
fn stored_location_is_used_at_construction() {
    let store = MemoryLocationStore::holding(Coordinate::new(42, 58));
    let overlay = overlay(&FakeSurface::default(), &store);
    assert_eq!(overlay.location(), Coordinate::new(42, 58));
    assert_eq!(store.saves(), 0);
}

#[test]
fn reset_moves_to_default_and_persists() {
    let store = MemoryLocationStore::holding(Coordinate::new(800, 600));
    let mut overlay = overlay(&FakeSurface::default(), &store);

    overlay.reset_location_to_default();
    assert_eq!(overlay.location(), Coordinate::new(100, 100));
    assert_eq!(store.saved(), Some(Coordinate::new(100, 100)));
}
