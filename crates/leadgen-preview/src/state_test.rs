use leadgen_core::TemplateSet;
use uuid::Uuid;

use super::*;
use crate::fake;

fn set(count: u32) -> TemplateSet {
    fake::template_set(Uuid::new_v4(), count)
}

fn ready_with(count: u32, policy: RegenerateFailurePolicy) -> PreviewMachine {
    let mut machine = PreviewMachine::new(policy);
    machine.apply(PreviewEvent::Mount).unwrap();
    machine.apply(PreviewEvent::Loaded(set(count))).unwrap();
    machine
}

#[test]
fn starts_idle_with_discard_policy() {
    let machine = PreviewMachine::default();
    assert_eq!(machine.phase(), PreviewPhase::Idle);
    assert_eq!(machine.policy(), RegenerateFailurePolicy::Discard);
    assert_eq!(machine.state().status_line(), "");
}

#[test]
fn mount_then_loaded_selects_first_variant() {
    let machine = ready_with(3, RegenerateFailurePolicy::Discard);
    let view = machine.state().ready().expect("ready");
    assert_eq!(view.selected_index(), 0);
    assert!(!view.fullscreen());
    assert_eq!(view.selected().map(|t| t.variant_number), Some(1));
    assert_eq!(machine.state().status_line(), "3 templates available");
}

#[test]
fn loading_then_generating_then_ready() {
    let mut machine = PreviewMachine::default();
    machine.apply(PreviewEvent::Mount).unwrap();
    assert_eq!(machine.state().status_line(), "Loading templates…");

    machine.apply(PreviewEvent::GenerationStarted).unwrap();
    assert_eq!(
        machine.state(),
        &PreviewState::Generating {
            kind: GenerationKind::Initial,
            previous: None
        }
    );
    assert!(machine.state().status_line().starts_with("Generating templates with AI"));

    machine.apply(PreviewEvent::Loaded(set(1))).unwrap();
    assert_eq!(machine.state().status_line(), "1 template available");
}

#[test]
fn empty_result_is_ready_with_regenerate_prompt() {
    let machine = ready_with(0, RegenerateFailurePolicy::Discard);
    let view = machine.state().ready().expect("ready");
    assert!(view.is_empty());
    assert!(view.selected().is_none());
    assert!(machine.state().status_line().contains("Regenerate"));
}

#[test]
fn failure_then_retry_reloads() {
    let mut machine = PreviewMachine::default();
    machine.apply(PreviewEvent::Mount).unwrap();
    machine
        .apply(PreviewEvent::Failed("Failed to load templates. Please try again.".into()))
        .unwrap();
    assert_eq!(machine.phase(), PreviewPhase::Error);
    assert_eq!(
        machine.state().status_line(),
        "Failed to load templates. Please try again."
    );

    machine.apply(PreviewEvent::Retry).unwrap();
    assert_eq!(machine.phase(), PreviewPhase::Loading);
}

#[test]
fn select_variant_checks_bounds_and_keeps_state() {
    let mut machine = ready_with(3, RegenerateFailurePolicy::Discard);
    machine.apply(PreviewEvent::SelectVariant(2)).unwrap();
    assert_eq!(machine.state().ready().unwrap().selected_index(), 2);

    let err = machine.apply(PreviewEvent::SelectVariant(3)).unwrap_err();
    assert_eq!(
        err,
        InvalidTransition {
            phase: PreviewPhase::Ready,
            event: "select-variant"
        }
    );
    assert_eq!(machine.state().ready().unwrap().selected_index(), 2);
}

#[test]
fn toggle_fullscreen_flips() {
    let mut machine = ready_with(2, RegenerateFailurePolicy::Discard);
    machine.apply(PreviewEvent::ToggleFullscreen).unwrap();
    assert!(machine.state().ready().unwrap().fullscreen());
    machine.apply(PreviewEvent::ToggleFullscreen).unwrap();
    assert!(!machine.state().ready().unwrap().fullscreen());
}

#[test]
fn regenerate_resets_selection_and_fullscreen() {
    let mut machine = ready_with(3, RegenerateFailurePolicy::Discard);
    machine.apply(PreviewEvent::SelectVariant(1)).unwrap();
    machine.apply(PreviewEvent::ToggleFullscreen).unwrap();

    machine.apply(PreviewEvent::RegenerateRequested).unwrap();
    assert_eq!(
        machine.state(),
        &PreviewState::Generating {
            kind: GenerationKind::Regenerate,
            previous: None
        }
    );

    machine.apply(PreviewEvent::Loaded(set(3))).unwrap();
    let view = machine.state().ready().unwrap();
    assert_eq!(view.selected_index(), 0);
    assert!(!view.fullscreen());
}

#[test]
fn discard_policy_drops_previous_set_on_failure() {
    let mut machine = ready_with(3, RegenerateFailurePolicy::Discard);
    machine.apply(PreviewEvent::RegenerateRequested).unwrap();
    machine.apply(PreviewEvent::Failed("boom".into())).unwrap();
    assert!(machine.state().error().unwrap().last_good().is_none());
}

#[test]
fn retain_policy_keeps_last_good_across_failures() {
    let mut machine = ready_with(2, RegenerateFailurePolicy::RetainLastGood);
    let original = machine.state().ready().unwrap().templates().clone();

    machine.apply(PreviewEvent::RegenerateRequested).unwrap();
    machine.apply(PreviewEvent::Failed("boom".into())).unwrap();
    assert_eq!(machine.state().error().unwrap().last_good(), Some(&original));

    // A second regenerate from the error keeps carrying the same set.
    machine.apply(PreviewEvent::RegenerateRequested).unwrap();
    machine.apply(PreviewEvent::Failed("again".into())).unwrap();
    assert_eq!(machine.state().error().unwrap().last_good(), Some(&original));
}

#[test]
fn invalid_events_leave_state_unchanged() {
    let mut machine = PreviewMachine::default();
    for event in [
        PreviewEvent::Retry,
        PreviewEvent::GenerationStarted,
        PreviewEvent::Loaded(set(1)),
        PreviewEvent::Failed("x".into()),
        PreviewEvent::RegenerateRequested,
        PreviewEvent::SelectVariant(0),
        PreviewEvent::ToggleFullscreen,
    ] {
        assert!(machine.apply(event).is_err());
        assert_eq!(machine.state(), &PreviewState::Idle);
    }

    machine.apply(PreviewEvent::Mount).unwrap();
    let err = machine.apply(PreviewEvent::Mount).unwrap_err();
    assert_eq!(err.to_string(), "cannot apply mount while loading");
    assert!(machine.apply(PreviewEvent::RegenerateRequested).is_err());
    assert_eq!(machine.phase(), PreviewPhase::Loading);
}

#[test]
fn error_state_refuses_view_events() {
    let mut machine = PreviewMachine::default();
    machine.apply(PreviewEvent::Mount).unwrap();
    machine.apply(PreviewEvent::Failed("x".into())).unwrap();
    assert!(machine.apply(PreviewEvent::SelectVariant(0)).is_err());
    assert!(machine.apply(PreviewEvent::ToggleFullscreen).is_err());
    assert!(machine.apply(PreviewEvent::Loaded(set(1))).is_err());
}
