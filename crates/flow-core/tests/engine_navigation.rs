
use flow_core::{flow_step, step, Envelope, FlowPersistence, FlowStep, GraphBuilder, StepDescriptor, StepGraph,
                Workflow, WorkflowEngine, WorkflowError, WorkflowEventKind, WorkflowState};
use test_support::{finish_probe, Call, RecordingResponder};

flow_step!(Screen { input: Envelope, output: Envelope });
flow_step!(A { input: (), output: (), should_load(_s) { false } });
flow_step!(B { input: (), output: String });
flow_step!(C { input: String, output: () });
flow_step!(Gate { input: u32, output: u32, should_load(s) { s.input == 0 } });
flow_step!(Tail { input: u32, output: () });
flow_step!(Summary { input: String, output: () });

/// Sólo se presenta si falta el nombre; al saltarse lo normaliza.
struct NameDefaults {
    name: String,
}

impl FlowStep for NameDefaults {
    type Input = String;
    type Output = String;

    fn create(input: String) -> Self {
        Self { name: input }
    }

    fn should_load(&self) -> bool {
        self.name.is_empty()
    }

    fn skipped_output(&self) -> Option<String> {
        Some(self.name.to_uppercase())
    }
}

fn screens(n: usize) -> StepGraph {
    let mut b = GraphBuilder::new();
    for i in 0..n {
        b.append(StepDescriptor::of::<Screen>().with_name(format!("S{i}")));
    }
    b.build()
}

fn abc() -> StepGraph {
    Workflow::new(step::<A>().persistence(FlowPersistence::RemovedAfterProceeding))
        .then_ignoring_input(step::<B>().persistence(FlowPersistence::PersistUntilRemoved))
        .then(step::<C>())
        .build()
}

#[test]
fn n_loading_steps_complete_after_n_proceeds() {
    let n = 4;
    let mut engine = WorkflowEngine::new(screens(n), RecordingResponder::default());
    let (seen, on_finish) = finish_probe();
    engine.launch_with(Envelope::Empty, on_finish).expect("launch");

    let mut proceeds = 0u32;
    while engine.state().is_active() {
        engine.proceed_active(Envelope::new(proceeds)).expect("proceed");
        proceeds += 1;
    }

    assert_eq!(proceeds as usize, n);
    assert_eq!(engine.state(), WorkflowState::Completed);
    let calls = &engine.responder().calls;
    assert_eq!(calls.len(), n + 1);
    assert_eq!(calls[0], Call::Launch("S0".into()));
    for i in 1..n {
        assert_eq!(calls[i],
                   Call::Proceed { to: format!("S{i}"),
                                   from: format!("S{}", i - 1) });
    }
    assert_eq!(calls[n], Call::Complete);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].extract::<u32>(), Some(3));
    assert!(engine.live_positions().is_empty());
}

#[test]
fn skipped_and_removed_step_is_unreachable() {
    let mut engine = WorkflowEngine::new(abc(), RecordingResponder::default());

    let b = engine.launch(Envelope::Empty).expect("launch").expect("B loads");
    assert_eq!(engine.responder().calls, vec![Call::Launch("B".into())]);

    let c = engine.proceed(b, Envelope::new(String::from("v"))).expect("proceed").expect("C loads");
    assert_eq!(engine.responder().calls[1],
               Call::Proceed { to: "C".into(),
                               from: "B".into() });
    assert_eq!(engine.step::<C>(c).map(|s| s.input.as_str()), Some("v"));

    let back = engine.back_up().expect("back to B");
    assert_eq!(back, b);
    assert_eq!(engine.responder().calls[2],
               Call::BackUp { from: "C".into(),
                              to: "B".into() });

    assert_eq!(engine.back_up(), Err(WorkflowError::CannotBackUp));
    assert_eq!(engine.state(), WorkflowState::Active(b));
    assert!(!engine.responder().touched().contains(&"A".to_string()));
}

#[test]
fn back_up_right_after_launch_fails_and_keeps_position() {
    let graph = Workflow::new(step::<B>()).then(step::<C>()).build();
    let mut engine = WorkflowEngine::new(graph, RecordingResponder::default());
    let b = engine.launch(Envelope::Empty).expect("launch").expect("B");

    assert_eq!(engine.back_up(), Err(WorkflowError::CannotBackUp));
    assert_eq!(engine.state(), WorkflowState::Active(b));
    assert_eq!(engine.responder().calls, vec![Call::Launch("B".into())]);
}

#[test]
fn abandon_twice_invokes_callback_once() {
    let mut engine = WorkflowEngine::new(screens(2), RecordingResponder::default());
    let (seen, on_finish) = finish_probe();
    engine.launch_with(Envelope::new(1u8), on_finish).expect("launch");

    engine.abandon();
    engine.abandon();

    assert_eq!(engine.state(), WorkflowState::NotStarted);
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].is_empty());
    assert_eq!(engine.responder().calls, vec![Call::Launch("S0".into()), Call::Abandon]);
    assert!(engine.live_positions().is_empty());
}

#[test]
fn abandon_after_completion_notifies_without_second_callback() {
    let mut engine = WorkflowEngine::new(screens(1), RecordingResponder::default());
    let (seen, on_finish) = finish_probe();
    let s0 = engine.launch_with(Envelope::Empty, on_finish).expect("launch").expect("S0");
    engine.proceed(s0, Envelope::new(7u32)).expect("proceed");
    assert_eq!(engine.state(), WorkflowState::Completed);

    engine.abandon();

    assert_eq!(engine.state(), WorkflowState::NotStarted);
    assert_eq!(engine.responder().calls,
               vec![Call::Launch("S0".into()), Call::Complete, Call::Abandon]);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].extract::<u32>(), Some(7));
}

#[test]
fn responder_may_finish_itself_without_double_call() {
    let mut engine = WorkflowEngine::new(screens(1), RecordingResponder::finishing_inside());
    let (seen, on_finish) = finish_probe();
    engine.launch_with(Envelope::Empty, on_finish).expect("launch");
    engine.proceed_active(Envelope::new(9u16)).expect("complete");

    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].extract::<u16>(), Some(9));
    assert_eq!(engine.responder().completed_with.len(), 1);
}

#[test]
fn launch_without_loadable_step_completes_immediately() {
    let graph = Workflow::new(step::<A>()).build();
    let mut engine = WorkflowEngine::new(graph, RecordingResponder::default());
    let (seen, on_finish) = finish_probe();

    let active = engine.launch_with(Envelope::new(7u32), on_finish).expect("launch");

    assert_eq!(active, None);
    assert_eq!(engine.state(), WorkflowState::Completed);
    assert_eq!(engine.responder().calls, vec![Call::Complete]);
    assert_eq!(seen.borrow()[0].extract::<u32>(), Some(7));
}

#[test]
fn launch_is_refused_while_active_or_completed() {
    let mut engine = WorkflowEngine::new(screens(1), RecordingResponder::default());
    engine.launch(Envelope::Empty).expect("launch");
    assert_eq!(engine.launch(Envelope::Empty), Err(WorkflowError::AlreadyLaunched));

    engine.proceed_active(Envelope::Empty).expect("complete");
    assert_eq!(engine.launch(Envelope::Empty), Err(WorkflowError::AlreadyCompleted));
    assert_eq!(engine.back_up(), Err(WorkflowError::AlreadyCompleted));
}

#[test]
fn navigation_before_launch_reports_not_started() {
    let mut engine = WorkflowEngine::new(screens(2), RecordingResponder::default());
    assert_eq!(engine.back_up(), Err(WorkflowError::NotStarted));
    assert_eq!(engine.proceed_active(Envelope::Empty), Err(WorkflowError::NotStarted));
}

#[test]
fn skipped_step_can_rewrite_arguments() {
    let graph = Workflow::new(step::<NameDefaults>()).then(step::<Summary>()).build();
    let mut engine = WorkflowEngine::new(graph, RecordingResponder::default());

    let summary = engine.launch(Envelope::new(String::from("ana"))).expect("launch").expect("Summary");

    assert_eq!(engine.step::<Summary>(summary).map(|s| s.input.clone()), Some("ANA".to_string()));
    assert_eq!(engine.responder().calls, vec![Call::Launch("Summary".into())]);
}

#[test]
fn persisted_skip_is_reachable_backwards() {
    let mut b = GraphBuilder::new();
    b.append(StepDescriptor::of::<B>())
     .append(StepDescriptor::of::<A>().with_persistence(FlowPersistence::PersistWhenSkipped))
     .append(StepDescriptor::of::<C>());
    let mut engine = WorkflowEngine::new(b.build(), RecordingResponder::default());

    let first = engine.launch(Envelope::Empty).expect("launch").expect("B");
    engine.proceed(first, Envelope::new(String::from("x"))).expect("proceed");
    let names: Vec<String> = engine.live_positions().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["B", "A", "C"]);

    let a = engine.back_up().expect("back to A");
    assert_eq!(a.index(), 1);
    assert!(engine.instance(a).expect("live").is_loaded());
    assert_eq!(engine.back_up().expect("back to B"), first);
    assert_eq!(engine.responder().calls[2..],
               [Call::BackUp { from: "C".into(),
                               to: "A".into() },
                Call::BackUp { from: "A".into(),
                               to: "B".into() }]);
}

#[test]
fn loaded_step_removed_after_proceeding() {
    let graph = Workflow::new(step::<B>().persistence(FlowPersistence::RemovedAfterProceeding)).then(step::<C>())
                                                                                             .build();
    let mut engine = WorkflowEngine::new(graph, RecordingResponder::default());
    let b = engine.launch(Envelope::Empty).expect("launch").expect("B");
    engine.proceed(b, Envelope::new(String::from("x"))).expect("proceed");

    assert_eq!(engine.back_up(), Err(WorkflowError::CannotBackUp));
    assert!(engine.events()
                  .iter()
                  .any(|e| matches!(&e.kind, WorkflowEventKind::Pruned { step_name, .. } if step_name == "B")));
    assert_eq!(engine.proceed(b, Envelope::Empty), Err(WorkflowError::StaleHandle { index: 0 }));
}

#[test]
fn persistence_can_depend_on_forward_arguments() {
    let graph = || {
        Workflow::new(step::<Gate>().dynamic_persistence(|args| match args.extract::<u32>() {
                                        Some(n) if n > 10 => FlowPersistence::RemovedAfterProceeding,
                                        _ => FlowPersistence::PersistWhenSkipped,
                                    })).then(step::<Tail>())
                                       .build()
    };

    let mut big = WorkflowEngine::new(graph(), RecordingResponder::default());
    big.launch(Envelope::new(42u32)).expect("launch");
    assert_eq!(big.back_up(), Err(WorkflowError::CannotBackUp));

    let mut small = WorkflowEngine::new(graph(), RecordingResponder::default());
    small.launch(Envelope::new(5u32)).expect("launch");
    let gate = small.back_up().expect("gate persisted");
    assert_eq!(small.position(gate).expect("position").persistence, FlowPersistence::PersistWhenSkipped);
}

#[test]
fn input_type_mismatch_is_a_skip() {
    let mut b = GraphBuilder::new();
    b.append(StepDescriptor::of::<C>()).append(StepDescriptor::of::<B>());
    let mut engine = WorkflowEngine::new(b.build(), RecordingResponder::default());

    let active = engine.launch(Envelope::new(5u32)).expect("launch").expect("B");
    assert_eq!(active.index(), 1);

    let live: Vec<String> = engine.live_positions().into_iter().map(|p| p.name).collect();
    assert_eq!(live, vec!["B".to_string()]);
    let skipped = WorkflowEventKind::Skipped { step_index: 0,
                                               step_name: "C".into(),
                                               persisted: false };
    assert!(engine.events().iter().any(|e| e.kind == skipped));
}

#[test]
fn mismatched_step_is_never_presented_on_back_up() {
    let mut b = GraphBuilder::new();
    b.append(StepDescriptor::of::<C>()).append(StepDescriptor::of::<Screen>());
    let mut engine = WorkflowEngine::new(b.build(), RecordingResponder::default());

    let screen = engine.launch(Envelope::new(5u32)).expect("launch").expect("Screen");

    assert_eq!(engine.back_up(), Err(WorkflowError::CannotBackUp));
    assert_eq!(engine.state(), WorkflowState::Active(screen));
    assert_eq!(engine.responder().calls, vec![Call::Launch("Screen".into())]);
}

#[test]
fn proceed_is_single_shot_per_handle() {
    let graph = Workflow::new(step::<B>()).then(step::<C>()).build();
    let mut engine = WorkflowEngine::new(graph, RecordingResponder::default());
    let b = engine.launch(Envelope::Empty).expect("launch").expect("B");

    engine.proceed(b, Envelope::new(String::from("x"))).expect("first");
    assert_eq!(engine.proceed(b, Envelope::new(String::from("x"))), Err(WorkflowError::NotActive { index: 0 }));
    assert_eq!(engine.responder().calls.len(), 2);
}

#[test]
fn typed_proceed_checks_step_type() {
    let graph = Workflow::new(step::<B>()).then(step::<C>()).build();
    let mut engine = WorkflowEngine::new(graph, RecordingResponder::default());
    let b = engine.launch(Envelope::Empty).expect("launch").expect("B");

    let err = engine.proceed_with::<C>(b, ()).unwrap_err();
    assert!(matches!(err, WorkflowError::ContractViolation(ref v) if v.expected.ends_with("C") && v.found.ends_with("B")));
    assert_eq!(engine.state(), WorkflowState::Active(b));

    let c = engine.proceed_with::<B>(b, String::from("typed")).expect("proceed").expect("C");
    assert_eq!(engine.force_step::<C>(c).map(|s| s.input.clone()), Ok("typed".to_string()));
}

#[test]
fn release_prunes_retained_positions_only() {
    let mut b = GraphBuilder::new();
    b.append(StepDescriptor::of::<B>())
     .append(StepDescriptor::of::<A>())
     .append(StepDescriptor::of::<C>());
    let mut engine = WorkflowEngine::new(b.build(), RecordingResponder::default());
    let first = engine.launch(Envelope::Empty).expect("launch").expect("B");
    let c = engine.proceed(first, Envelope::new(String::from("x"))).expect("proceed").expect("C");

    let a = engine.live_positions()[1].handle;
    assert_eq!(engine.release(c), Err(WorkflowError::ReleaseActive));
    engine.release(a).expect("release A");
    assert_eq!(engine.release(a), Err(WorkflowError::StaleHandle { index: 1 }));

    assert_eq!(engine.back_up().expect("back"), first);
    assert!(engine.events()
                  .iter()
                  .any(|e| matches!(&e.kind, WorkflowEventKind::Released { step_index: 1, .. })));
}

#[test]
fn reset_drops_callback_and_allows_relaunch() {
    let mut engine = WorkflowEngine::new(screens(2), RecordingResponder::default());
    let (seen, on_finish) = finish_probe();
    engine.launch_with(Envelope::Empty, on_finish).expect("launch");
    let first_run = engine.run_id();

    engine.reset();
    assert_eq!(engine.state(), WorkflowState::NotStarted);
    assert!(seen.borrow().is_empty());
    assert_eq!(engine.responder().calls.len(), 1);

    engine.launch(Envelope::Empty).expect("relaunch");
    assert_ne!(engine.run_id(), first_run);
    engine.abandon();
    assert!(seen.borrow().is_empty());
}

#[test]
fn events_follow_transitions_in_order() {
    let mut engine = WorkflowEngine::new(abc(), RecordingResponder::default());
    let b = engine.launch(Envelope::Empty).expect("launch").expect("B");
    engine.proceed(b, Envelope::new(String::from("v"))).expect("proceed");
    engine.back_up().expect("back");

    let events = engine.events();
    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3, 4, 5]);
    let kinds: Vec<WorkflowEventKind> = events.into_iter().map(|e| e.kind).collect();
    assert_eq!(kinds,
               vec![WorkflowEventKind::Launched { definition_hash: engine.graph().definition_hash().to_string(),
                                                  step_count: 3 },
                    WorkflowEventKind::Skipped { step_index: 0,
                                                 step_name: "A".into(),
                                                 persisted: false },
                    WorkflowEventKind::Loaded { step_index: 1,
                                                step_name: "B".into(),
                                                persistence: FlowPersistence::PersistUntilRemoved },
                    WorkflowEventKind::Loaded { step_index: 2,
                                                step_name: "C".into(),
                                                persistence: FlowPersistence::PersistUntilRemoved },
                    WorkflowEventKind::Proceeded { from: 1, to: Some(2) },
                    WorkflowEventKind::BackedUp { from: 2, to: 1 },]);
}

#[test]
fn null_event_store_records_nothing() {
    let mut engine = WorkflowEngine::with_event_store(screens(1), RecordingResponder::default(), flow_core::NullEventStore);
    engine.launch(Envelope::Empty).expect("launch");
    assert!(engine.events().is_empty());
}

#[test]
fn relaunched_engine_keeps_bounded_history() {
    let mut engine = WorkflowEngine::new(screens(1), RecordingResponder::default());
    for _ in 0..flow_core::constants::RETAINED_RUNS + 3 {
        engine.reset();
        engine.launch(Envelope::Empty).expect("launch");
    }
    assert_eq!(engine.event_store().runs().count(), flow_core::constants::RETAINED_RUNS);
    assert_eq!(engine.events().len(), 2);
}
