mod common;

use map_shell::domain::core::{GeoPoint, Point};
use map_shell::domain::gesture::{GestureKind, ManipulationEvent};
use map_shell::domain::navigation::{
    NavigationState, OFF_ROUTE_MESSAGE, PositionFix, TURN_ROUND_MESSAGE, TurnDescriptor,
};
use map_shell::engine::{EngineCall, EngineError, NavigatorScript};

fn geo_at(controller: &map_shell::app::MapController<map_shell::engine::RecordingEngine>, at: Point) -> GeoPoint {
    let map = controller.engine().map_point_at(at);
    GeoPoint::new(map.x, map.y)
}

fn fix() -> PositionFix {
    PositionFix::at(10.0, -71.0, 42.0)
}

#[test]
fn consecutive_taps_chain_into_routes() {
    let mut controller = common::controller();
    let (p1, p2, p3) = (
        Point::new(50.0, 60.0),
        Point::new(200.0, 150.0),
        Point::new(300.0, 40.0),
    );
    let (g1, g2, g3) = (
        geo_at(&controller, p1),
        geo_at(&controller, p2),
        geo_at(&controller, p3),
    );

    controller.handle_event(ManipulationEvent::Tap(p1));
    assert!(controller.engine().calls().is_empty());
    assert_eq!(controller.route_endpoints().end(), g1);

    controller.handle_event(ManipulationEvent::Tap(p2));
    controller.handle_event(ManipulationEvent::Tap(p3));

    assert_eq!(
        controller.engine().calls(),
        &[
            EngineCall::StartNavigation { from: g1, to: g2 },
            EngineCall::RenderedBitmap,
            EngineCall::StartNavigation { from: g2, to: g3 },
            EngineCall::RenderedBitmap,
        ]
    );
    assert_eq!(controller.route_endpoints().start(), g2);
    assert_eq!(controller.route_endpoints().end(), g3);
}

#[test]
fn identical_taps_still_request_a_route() {
    let mut controller = common::controller();
    let p = Point::new(120.0, 80.0);
    let g = geo_at(&controller, p);

    controller.handle_event(ManipulationEvent::Tap(p));
    controller.handle_event(ManipulationEvent::Tap(p));

    assert_eq!(
        controller.engine().calls().first(),
        Some(&EngineCall::StartNavigation { from: g, to: g })
    );
}

#[test]
fn failed_route_search_leaves_map_unchanged() {
    let mut controller = common::controller();
    controller.engine_mut().fail_call("start_navigation", EngineError::NoRoute);

    controller.handle_event(ManipulationEvent::Tap(Point::new(10.0, 10.0)));
    controller.handle_event(ManipulationEvent::Tap(Point::new(20.0, 20.0)));

    assert_eq!(controller.engine().calls().len(), 1);
    assert!(!controller.engine().calls().contains(&EngineCall::RenderedBitmap));
}

#[test]
fn route_taps_are_converted_from_logical_units() {
    let mut controller = common::controller_with(map_shell::config::ShellConfig {
        view_width: 400.0,
        view_height: 300.0,
        device_scale: 2.0,
        ..Default::default()
    });
    let expected = controller.engine().map_point_at(Point::new(100.0, 80.0));

    controller.handle_event(ManipulationEvent::Tap(Point::new(50.0, 40.0)));

    assert_eq!(controller.route_endpoints().end(), GeoPoint::new(expected.x, expected.y));
}

#[test]
fn tap_during_gesture_is_dropped() {
    let mut controller = common::controller();
    controller.handle_event(ManipulationEvent::zoom(1.2, Point::new(100.0, 100.0)));
    controller.handle_event(ManipulationEvent::Tap(Point::new(10.0, 10.0)));
    controller.handle_event(ManipulationEvent::Ended(GestureKind::Zoom));

    assert!(controller.route_endpoints().end().is_default());
    assert!(
        !controller
            .engine()
            .calls()
            .iter()
            .any(|call| matches!(call, EngineCall::StartNavigation { .. }))
    );
}

#[test]
fn navigation_messages_follow_engine_state() {
    let mut controller = common::controller();
    controller.engine_mut().script_navigation(NavigatorScript {
        state: NavigationState::Turn,
        first_turn: Some(TurnDescriptor::new("turn left", 120.7, false)),
        second_turn: Some(TurnDescriptor::new("turn right", 300.0, true)),
        ..NavigatorScript::default()
    });
    let update = controller.navigate(&fix()).unwrap();
    assert_eq!(update.message.as_deref(), Some("turn left after 120m"));

    controller.engine_mut().script_navigation(NavigatorScript {
        state: NavigationState::TurnRound,
        ..NavigatorScript::default()
    });
    let update = controller.navigate(&fix()).unwrap();
    assert_eq!(update.message.as_deref(), Some(TURN_ROUND_MESSAGE));

    controller.engine_mut().script_navigation(NavigatorScript {
        state: NavigationState::OffRoute,
        ..NavigatorScript::default()
    });
    let update = controller.navigate(&fix()).unwrap();
    assert_eq!(update.message.as_deref(), Some(OFF_ROUTE_MESSAGE));
    assert_eq!(controller.navigator().message(), Some(OFF_ROUTE_MESSAGE));
}

#[test]
fn turn_state_without_turn_has_no_message() {
    let mut controller = common::controller();
    controller.engine_mut().script_navigation(NavigatorScript {
        state: NavigationState::Turn,
        ..NavigatorScript::default()
    });
    let update = controller.navigate(&fix()).unwrap();
    assert_eq!(update.state, NavigationState::Turn);
    assert_eq!(update.message, None);
}

#[test]
fn navigation_refreshes_bitmap_after_fix() {
    let mut controller = common::controller();
    controller.navigate(&fix()).unwrap();
    assert_eq!(
        controller.engine().calls(),
        &[EngineCall::Navigate(fix()), EngineCall::RenderedBitmap]
    );
}

#[test]
fn rejected_fix_reports_nothing() {
    let mut controller = common::controller();
    controller
        .engine_mut()
        .fail_call("navigate", EngineError::Status { call: "navigate", status: 5 });
    assert!(controller.navigate(&fix()).is_none());
    assert!(!controller.engine().calls().contains(&EngineCall::RenderedBitmap));
}

#[test]
fn fix_during_gesture_defers_bitmap_refresh() {
    let mut controller = common::controller();
    controller.handle_event(ManipulationEvent::pan(Point::new(5.0, 0.0), Point::new(10.0, 10.0)));
    controller.navigate(&fix()).unwrap();
    assert_eq!(controller.engine().calls(), &[EngineCall::Navigate(fix())]);

    controller.handle_event(ManipulationEvent::Cancelled(GestureKind::Pan));
    assert_eq!(controller.engine().calls().last(), Some(&EngineCall::RenderedBitmap));
}

#[test]
fn engine_status_failure_keeps_map() {
    let mut controller = common::controller();
    controller.engine_mut().script_route_status(60);

    controller.handle_event(ManipulationEvent::Tap(Point::new(10.0, 10.0)));
    controller.handle_event(ManipulationEvent::Tap(Point::new(90.0, 70.0)));

    assert_eq!(controller.engine().calls().len(), 1);
    assert!(!controller.route_endpoints().start().is_default());
}

#[test]
fn clearing_route_starts_a_fresh_pair() {
    let mut controller = common::controller();
    controller.handle_event(ManipulationEvent::Tap(Point::new(10.0, 10.0)));
    controller.handle_event(ManipulationEvent::Tap(Point::new(90.0, 70.0)));
    controller.engine_mut().script_navigation(NavigatorScript {
        state: NavigationState::OffRoute,
        ..NavigatorScript::default()
    });
    controller.navigate(&fix()).unwrap();
    assert_eq!(controller.navigator().message(), Some(OFF_ROUTE_MESSAGE));

    controller.handle_key(map_shell::input::KeyEvent::ClearRoute);
    assert!(controller.route_endpoints().start().is_default());
    assert!(controller.route_endpoints().end().is_default());
    assert_eq!(controller.navigator().message(), None);

    controller.engine_mut().clear_calls();
    controller.handle_event(ManipulationEvent::Tap(Point::new(200.0, 100.0)));
    assert!(controller.engine().calls().is_empty());
}
