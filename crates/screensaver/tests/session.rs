//! End-to-end session scenarios against an in-memory store.

use proptest::prelude::*;
use screensaver::core::{Defaults, LoopToken, MemoryBackend, ParameterStore, Size, WidgetKind};
use screensaver::widgets::{ColorSpace, Phase};
use screensaver::{PanelEvent, PanelGroup, PanelModel, PanelOutcome, Session};
use std::rc::Rc;

fn session_with(store: Rc<ParameterStore>) -> Session {
    Session::new(store, Rc::new(Defaults::default()))
}

fn color_count(model: &PanelModel) -> usize {
    model
        .groups
        .iter()
        .find_map(|g| match g {
            PanelGroup::Colors { rows } => Some(rows.len()),
            _ => None,
        })
        .unwrap_or(0)
}

fn run_for(session: &mut Session, token: LoopToken, from_ms: f64, to_ms: f64) {
    let mut now = from_ms;
    while now <= to_ms {
        session.tick(token, now);
        now += 16.0;
    }
}

#[test]
fn test_first_visit_shows_linear_gradient() {
    let store = Rc::new(ParameterStore::in_memory());
    let mut session = session_with(Rc::clone(&store));
    session.set_viewport(Size::new(1280.0, 720.0));

    assert_eq!(session.bootstrap(), WidgetKind::LinearGradient);
    assert_eq!(
        store.get_raw("selectedScreensaver").as_deref(),
        Some("linear-gradient")
    );
    let widget = session.active().unwrap();
    assert_eq!(widget.phase(), Phase::Running);
    assert!(widget.is_animating());
    assert_eq!(color_count(session.panel().unwrap()), 4);

    let speed_default = session
        .registry()
        .describe(WidgetKind::LinearGradient, &store)
        .into_iter()
        .find(|d| d.name == "speed")
        .and_then(|d| d.default.as_number())
        .unwrap();
    let speed = session.active_mut().unwrap().as_speed().unwrap().speed();
    assert_eq!(speed, speed_default);
}

#[test]
fn test_persisted_selection_restored() {
    let backend = MemoryBackend::with_entries([("selectedScreensaver", "color-cycle")]);
    let mut session = session_with(Rc::new(ParameterStore::new(backend)));
    assert_eq!(session.bootstrap(), WidgetKind::ColorCycle);
}

#[test]
fn test_unknown_persisted_selection_falls_back() {
    let backend = MemoryBackend::with_entries([("selectedScreensaver", "fireworks")]);
    let mut session = session_with(Rc::new(ParameterStore::new(backend)));
    assert_eq!(session.bootstrap(), WidgetKind::LinearGradient);
}

#[test]
fn test_bootstrap_is_repeatable() {
    let mut session = session_with(Rc::new(ParameterStore::in_memory()));
    session.bootstrap();
    let previous_kind = session.active_kind();
    session.bootstrap();
    assert_eq!(session.active_kind(), previous_kind);
}

#[test]
fn test_switching_keeps_one_live_widget() {
    let mut session = session_with(Rc::new(ParameterStore::in_memory()));
    session.set_viewport(Size::new(800.0, 600.0));
    session.bootstrap();
    let old_token = session.loop_token().unwrap();

    let mut retired = Vec::new();
    for kind in [
        WidgetKind::ConicGradient,
        WidgetKind::ColorCycle,
        WidgetKind::SolidColor,
        WidgetKind::LinearGradient,
    ] {
        retired.extend(session.switch_to(kind));
    }
    assert_eq!(retired.len(), 4);
    assert!(retired
        .iter()
        .all(|w| w.phase() == Phase::Stopped && w.style().is_empty()));

    // a frame queued for the first widget must not move the current one
    let before = session.active().unwrap().style().clone();
    session.tick(old_token, 10_000.0);
    assert_eq!(session.active().unwrap().style(), &before);
}

#[test]
fn test_structural_color_edit_rebuilds_panel() {
    let store = Rc::new(ParameterStore::in_memory());
    let mut session = session_with(Rc::clone(&store));
    session.switch_to(WidgetKind::ConicGradient);
    assert_eq!(color_count(session.panel().unwrap()), 5);

    assert_eq!(session.dispatch(&PanelEvent::ColorAdded), PanelOutcome::Rebuilt);
    assert_eq!(color_count(session.panel().unwrap()), 6);

    assert_eq!(
        session.dispatch(&PanelEvent::ColorDeleted { index: 5 }),
        PanelOutcome::Rebuilt
    );
    assert_eq!(color_count(session.panel().unwrap()), 5);
    assert_eq!(
        store.get_raw("screensaver-conic-gradient-colors").as_deref(),
        Some(r##"["#0084ff","#04ff00","#ff00ea","#ff9100","#7300ff"]"##)
    );

    // out-of-range delete changes nothing
    assert_eq!(
        session.dispatch(&PanelEvent::ColorDeleted { index: 42 }),
        PanelOutcome::Applied
    );
    assert_eq!(color_count(session.panel().unwrap()), 5);
}

#[test]
fn test_huge_indices_from_host_json_are_ignored() {
    let store = Rc::new(ParameterStore::in_memory());
    let mut session = session_with(Rc::clone(&store));
    session.switch_to(WidgetKind::LinearGradient);

    for name in ["color_moved_down", "color_moved_up", "color_duplicated", "color_deleted"] {
        let json = format!(r#"{{"event":"{name}","index":{}}}"#, usize::MAX);
        let event: PanelEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(session.dispatch(&event), PanelOutcome::Applied);
    }
    assert_eq!(color_count(session.panel().unwrap()), 4);
    assert_eq!(store.get_raw("screensaver-linear-gradient-colors"), None);
}

#[test]
fn test_last_color_cannot_be_deleted() {
    let mut session = session_with(Rc::new(ParameterStore::in_memory()));
    session.switch_to(WidgetKind::ColorCycle);
    session.dispatch(&PanelEvent::ColorDeleted { index: 0 });
    session.dispatch(&PanelEvent::ColorDeleted { index: 0 });
    assert_eq!(color_count(session.panel().unwrap()), 1);
    session.dispatch(&PanelEvent::ColorDeleted { index: 0 });
    assert_eq!(color_count(session.panel().unwrap()), 1);
    let PanelGroup::Colors { rows } = session.panel().unwrap().groups.last().unwrap() else {
        panic!("colors last");
    };
    assert!(!rows[0].can_delete);
}

#[test]
fn test_edits_survive_reload() {
    let store = Rc::new(ParameterStore::in_memory());
    {
        let mut session = session_with(Rc::clone(&store));
        session.switch_to(WidgetKind::LinearGradient);
        session.dispatch(&PanelEvent::RangeSlid {
            name: "speed".into(),
            value: 6.5,
        });
        session.dispatch(&PanelEvent::ChoiceSelected {
            name: "colorSpace".into(),
            value: "oklch".into(),
        });
        session.dispatch(&PanelEvent::ChoiceToggled {
            name: "colorSpace".into(),
            enabled: true,
        });
        session.dispatch(&PanelEvent::ColorMovedDown { index: 0 });
    }

    let mut session = session_with(store);
    session.bootstrap();
    let widget = session.active_mut().unwrap();
    assert_eq!(widget.as_speed().unwrap().speed(), 6.5);
    assert_eq!(
        widget.as_color_space().unwrap().effective_color_space(),
        Some(ColorSpace::Oklch)
    );
    let colors = widget.as_color_sequence().unwrap().colors().clone();
    assert_eq!(colors.as_slice(), ["#0000ff", "#ff0000", "#00ff00", "#ffff00"]);
}

#[test]
fn test_zero_speed_halts_then_resumes() {
    let mut session = session_with(Rc::new(ParameterStore::in_memory()));
    session.set_viewport(Size::new(640.0, 480.0));
    session.switch_to(WidgetKind::LinearGradient);
    let token = session.loop_token().unwrap();
    run_for(&mut session, token, 0.0, 500.0);

    session.dispatch(&PanelEvent::RangeSlid {
        name: "speed".into(),
        value: 0.0,
    });
    assert_eq!(session.loop_token(), None);
    let frozen = session.active().unwrap().style().clone();
    run_for(&mut session, token, 500.0, 2000.0);
    assert_eq!(session.active().unwrap().style(), &frozen);

    session.dispatch(&PanelEvent::RangeSlid {
        name: "speed".into(),
        value: 3.0,
    });
    let resumed = session.loop_token().unwrap();
    assert_ne!(resumed, token);
    run_for(&mut session, resumed, 2000.0, 3000.0);
    assert_ne!(session.active().unwrap().style(), &frozen);
}

#[test]
fn test_storage_failure_keeps_session_working() {
    let store = Rc::new(ParameterStore::new(
        screensaver::core::UnavailableBackend,
    ));
    let mut session = session_with(Rc::clone(&store));
    session.bootstrap();
    session.dispatch(&PanelEvent::ColorAdded);
    assert_eq!(color_count(session.panel().unwrap()), 5);
    assert_eq!(
        store.get_raw("selectedScreensaver").as_deref(),
        Some("linear-gradient")
    );
}

proptest! {
    #[test]
    fn prop_color_list_never_empty(ops in proptest::collection::vec(0u8..5, 1..40)) {
        let mut session = session_with(Rc::new(ParameterStore::in_memory()));
        session.switch_to(WidgetKind::ColorCycle);
        for (i, op) in ops.into_iter().enumerate() {
            let index = i % 4;
            let event = match op {
                0 => PanelEvent::ColorAdded,
                1 => PanelEvent::ColorDeleted { index },
                2 => PanelEvent::ColorDuplicated { index },
                3 => PanelEvent::ColorMovedUp { index },
                _ => PanelEvent::ColorMovedDown { index },
            };
            session.dispatch(&event);
            prop_assert!(color_count(session.panel().unwrap()) >= 1);
        }
    }
}
