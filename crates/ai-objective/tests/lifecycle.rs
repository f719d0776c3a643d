mod support;

use ai_objective::{
    Capabilities, CompletionState, Objective, ObjectiveCx, SchedulerState, TraceKind,
    VecTraceSink,
};
use support::{bump, counter, tick, Goal, Probe, RecordingWorld, AGENT};

#[test]
fn completed_child_is_pruned_and_notifies_once() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let child_probe = Probe::default();
    child_probe.finish();
    let completed = counter();

    let mut parent = Objective::new(AGENT, Goal::new("parent"), 1.0);
    let mut child = Objective::new(AGENT, Goal::new("child").with_probe(&child_probe), 1.0);
    child.on_completed(bump(&completed));
    let child_id = child.id();
    parent.add_sub_objective(child);

    {
        let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
        assert!(!parent.is_completed(&mut cx, &world));
        // Memoized: a second read in the same tick does not re-run anything.
        assert!(!parent.is_completed(&mut cx, &world));
    }

    assert!(parent.sub_objectives().is_empty());
    assert!(!parent.sub_objectives().contains(child_id));
    assert_eq!(completed.get(), 1);
    assert_eq!(child_probe.checks.get(), 1);
    assert_eq!(sink.count(child_id.raw(), TraceKind::Completed), 1);
    assert_eq!(parent.completion_state(), CompletionState::Pending);
}

#[test]
fn parent_is_never_done_while_children_are_live() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let parent_probe = Probe::default();
    parent_probe.finish();

    let mut parent = Objective::new(AGENT, Goal::new("parent").with_probe(&parent_probe), 1.0);
    parent.add_sub_objective(Objective::new(AGENT, Goal::new("child"), 1.0));

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    assert!(!parent.is_completed(&mut cx, &world));
    assert_eq!(parent_probe.checks.get(), 0);
    assert_eq!(parent.sub_objectives().len(), 1);
}

#[test]
fn failed_child_abandons_parent_when_policy_says_so() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let child_probe = Probe::default();
    child_probe.give_up.set(true);
    let parent_abandoned = counter();
    let child_abandoned = counter();

    let mut parent = Objective::new(AGENT, Goal::new("parent"), 1.0);
    parent.on_abandoned(bump(&parent_abandoned));
    let mut child = Objective::new(AGENT, Goal::new("child").with_probe(&child_probe), 1.0);
    child.on_abandoned(bump(&child_abandoned));
    let child_id = child.id();
    parent.add_sub_objective(child);

    {
        let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
        assert!(!parent.is_completed(&mut cx, &world));
    }

    assert!(!parent.sub_objectives().contains(child_id));
    assert!(!parent.can_be_completed());
    assert_eq!(parent_abandoned.get(), 1);
    assert_eq!(child_abandoned.get(), 1);
    assert_eq!(sink.count(parent.id().raw(), TraceKind::Abandoned), 1);
    assert!(sink
        .events
        .iter()
        .any(|e| e.objective == child_id.raw() && matches!(e.event, TraceKind::Pruned(_))));
}

#[test]
fn failed_child_is_dropped_quietly_when_parent_tolerates_it() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let child_probe = Probe::default();
    child_probe.give_up.set(true);
    let parent_probe = Probe::default();

    let tolerant = Capabilities::default().abandon_when_subgoals_fail(false);
    let mut parent = Objective::new(
        AGENT,
        Goal::new("parent").with_probe(&parent_probe).with_caps(tolerant),
        1.0,
    );
    parent.add_sub_objective(Objective::new(
        AGENT,
        Goal::new("child").with_probe(&child_probe),
        1.0,
    ));

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    assert!(!parent.is_completed(&mut cx, &world));
    assert!(parent.can_be_completed());
    assert!(parent.sub_objectives().is_empty());
    // With its children gone the parent evaluates its own check in the same pass.
    assert_eq!(parent_probe.checks.get(), 1);
}

#[test]
fn abandoning_twice_notifies_once() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let abandoned = counter();

    let mut objective = Objective::new(AGENT, Goal::new("idle"), 1.0);
    objective.on_abandoned(bump(&abandoned));

    {
        let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
        objective.abandon(&mut cx);
        objective.abandon(&mut cx);
    }

    assert!(objective.is_abandoned());
    assert_eq!(abandoned.get(), 1);
    assert_eq!(sink.count(objective.id().raw(), TraceKind::Abandoned), 1);
}

#[test]
fn reset_forces_a_fresh_check() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let probe = Probe::default();
    probe.finish();
    let mut objective = Objective::new(AGENT, Goal::new("fetch").with_probe(&probe), 1.0);

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    assert!(objective.is_completed(&mut cx, &world));
    assert_eq!(probe.checks.get(), 1);

    probe.done.set(false);
    objective.reset();
    assert_eq!(objective.completion_state(), CompletionState::NotChecked);
    assert!(!objective.is_completed(&mut cx, &world));
    assert_eq!(probe.checks.get(), 2);
}

#[test]
fn reset_clears_abandonment_and_rearms_the_notification() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let abandoned = counter();

    let mut objective = Objective::new(AGENT, Goal::new("idle"), 1.0);
    objective.on_abandoned(bump(&abandoned));

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    objective.abandon(&mut cx);
    objective.reset();
    assert!(objective.can_be_completed());

    objective.abandon(&mut cx);
    assert_eq!(abandoned.get(), 2);
}

#[test]
fn update_is_the_recheck_boundary() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let probe = Probe::default();
    let mut objective = Objective::new(AGENT, Goal::new("wait").with_probe(&probe), 1.0);

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    assert!(!objective.is_completed(&mut cx, &world));
    probe.finish();
    assert!(!objective.is_completed(&mut cx, &world));
    assert_eq!(probe.checks.get(), 1);

    objective.update(&mut cx, &world);
    assert_eq!(objective.completion_state(), CompletionState::NotChecked);
    assert!(objective.is_completed(&mut cx, &world));
    assert_eq!(probe.checks.get(), 2);
}

#[test]
fn looping_objective_never_completes_on_its_own() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let mut world = RecordingWorld::default();

    let probe = Probe::default();
    probe.finish();
    let mut patrol =
        Objective::new(AGENT, Goal::new("patrol").with_probe(&probe), 1.0).looping(true);

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    for _ in 0..3 {
        patrol.update(&mut cx, &world);
        patrol.try_complete(&mut cx, &mut world);
    }

    assert!(!patrol.is_completed(&mut cx, &world));
    assert_eq!(probe.checks.get(), 0);
    assert_eq!(world.acted, vec!["patrol", "patrol", "patrol"]);
}

#[test]
fn abandoned_objective_does_not_complete() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let world = RecordingWorld::default();

    let probe = Probe::default();
    probe.finish();
    let mut objective = Objective::new(AGENT, Goal::new("fetch").with_probe(&probe), 1.0);

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    objective.abandon(&mut cx);
    assert!(!objective.is_completed(&mut cx, &world));
    assert_eq!(probe.checks.get(), 0);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let state = SchedulerState::default();
    let mut sink = VecTraceSink::default();
    let abandoned = counter();

    let mut objective = Objective::new(AGENT, Goal::new("idle"), 1.0);
    let listener = objective.on_abandoned(bump(&abandoned));
    assert!(objective
        .observers_mut(ai_objective::Lifecycle::Abandoned)
        .unsubscribe(listener));

    let mut cx = ObjectiveCx::new(tick(0), &state, &mut sink);
    objective.abandon(&mut cx);
    assert_eq!(abandoned.get(), 0);
}
