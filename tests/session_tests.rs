use anyhow::{Result, bail};
use rubric::grade::{
    self, Ledger, Outcome, Rubric, RubricError, Scorer, Session, SessionState, Step, StepFlow,
    StepFn, UNGRADED_MARKER, execute,
};

/// Records which steps ran, in order.
#[derive(Default)]
struct Trace {
    ran: Vec<String>,
}

fn step(order: u32, description: &str, body: StepFn<Trace>) -> Step<Trace> {
    Step::builder()
        .order(order)
        .description(description)
        .out_of(1.0)
        .body(body)
        .build()
}

fn ok(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    scorer.comment("ok", 1.0);
    Ok(StepFlow::Continue)
}

fn stop_missing_file(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    scorer.comment("missing file", 0.0);
    Ok(StepFlow::Stop)
}

fn stop_after_two(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    scorer.comment("first", 0.25);
    scorer.comment("second", 0.5);
    Ok(StepFlow::Stop)
}

fn fault(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    bail!("attribute 'href' missing")
}

fn fault_after_comment(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    scorer.comment("partial", 0.5);
    bail!("ran out of elements")
}

fn panics(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    let columns: Vec<u32> = Vec::new();
    let _ = columns[3];
    Ok(StepFlow::Continue)
}

fn silent(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    Ok(StepFlow::Continue)
}

fn chatty(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    scorer.comment("one", 0.1);
    scorer.comment("two", 0.2);
    scorer.award(0.3);
    Ok(StepFlow::Continue)
}

fn generous(trace: &mut Trace, scorer: &mut Scorer<'_>) -> Result<StepFlow> {
    trace.ran.push(scorer.description().to_string());
    scorer.award(7.5);
    Ok(StepFlow::Continue)
}

fn sum(report: &grade::Report) -> f64 {
    report.entries().iter().map(|e| e.points()).sum()
}

#[test]
fn three_passing_steps_total_three() {
    let rubric = Rubric::new("all ok", [
        step(1, "first", ok),
        step(2, "second", ok),
        step(3, "third", ok),
    ])
    .expect("valid rubric");

    let mut trace = Trace::default();
    let report = grade::run(&rubric, &mut trace);

    assert_eq!(report.entries().len(), 3);
    assert_eq!(report.total(), 3.0);
    assert_eq!(report.total(), sum(&report));
    assert!(report.entries().iter().all(|e| e.text() == "ok"));
    assert!(!report.stopped());
}

#[test]
fn early_stop_skips_remaining_steps() {
    let rubric = Rubric::new("stops", [
        step(1, "load", stop_missing_file),
        step(2, "second", ok),
        step(3, "third", ok),
    ])
    .expect("valid rubric");

    let mut trace = Trace::default();
    let report = grade::run(&rubric, &mut trace);

    assert_eq!(trace.ran, vec!["load"]);
    assert_eq!(report.entries().len(), 1);
    assert_eq!(report.entries()[0].text(), "missing file");
    assert_eq!(report.total(), 0.0);
    assert!(report.stopped());
}

#[test]
fn early_stop_keeps_comments_recorded_before_it() {
    let rubric = Rubric::new("stops", [
        step(1, "first", ok),
        step(2, "second", stop_after_two),
        step(3, "third", ok),
    ])
    .expect("valid rubric");

    let report = grade::run(&rubric, &mut Trace::default());

    let texts: Vec<&str> = report.entries().iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["ok", "first", "second"]);
    assert_eq!(report.total(), 1.75);
}

#[test]
fn faulting_step_is_recorded_and_grading_continues() {
    let rubric = Rubric::new("faults", [
        step(1, "it should link a stylesheet", fault),
        step(2, "second", ok),
    ])
    .expect("valid rubric");

    let mut trace = Trace::default();
    let report = grade::run(&rubric, &mut trace);

    assert_eq!(trace.ran, vec!["it should link a stylesheet", "second"]);
    assert_eq!(report.entries().len(), 2);
    assert_eq!(
        report.entries()[0].text(),
        format!("it should link a stylesheet {UNGRADED_MARKER}")
    );
    assert_eq!(report.entries()[0].points(), 0.0);
    assert_eq!(report.entries()[1].text(), "ok");
    assert_eq!(report.total(), 1.0);
}

#[test]
fn panicking_step_is_treated_as_a_fault() {
    let rubric = Rubric::new("panics", [step(1, "indexes past the end", panics), step(2, "after", ok)])
        .expect("valid rubric");

    let mut trace = Trace::default();
    let report = grade::run(&rubric, &mut trace);

    assert_eq!(trace.ran.len(), 2);
    assert_eq!(report.entries()[0].text(), "indexes past the end (unable to grade)");
    assert_eq!(report.total(), 1.0);
}

#[test]
fn fault_after_comment_keeps_the_comment_and_adds_one_marker() {
    let rubric = Rubric::new("partial", [step(1, "partial step", fault_after_comment)])
        .expect("valid rubric");

    let report = grade::run(&rubric, &mut Trace::default());

    let texts: Vec<&str> = report.entries().iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["partial", "partial step (unable to grade)"]);
    assert_eq!(report.total(), 0.5);
    assert_eq!(report.total(), sum(&report));
}

#[test]
fn entry_count_follows_what_steps_record() {
    let rubric = Rubric::new("mixed", [
        step(1, "quiet", silent),
        step(2, "chatty", chatty),
        step(3, "generous", generous),
    ])
    .expect("valid rubric");

    let report = grade::run(&rubric, &mut Trace::default());

    let texts: Vec<&str> = report.entries().iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["one", "two", "chatty", "generous"]);
    assert!((report.total() - 8.1).abs() < 1e-9);
    assert_eq!(report.total(), sum(&report));
    assert_eq!(report.out_of(), 3.0);
}

#[test]
fn silent_steps_total_positive_zero() {
    let rubric = Rubric::new("quiet", [step(1, "a", silent), step(2, "b", silent)])
        .expect("valid rubric");

    let report = grade::run(&rubric, &mut Trace::default());

    assert!(report.entries().is_empty());
    assert_eq!(report.total(), 0.0);
    assert!(report.total().is_sign_positive());
    assert_eq!(report.to_string().lines().nth(1), Some("TOTAL GRADE 0.00"));

    let json: serde_json::Value =
        serde_json::from_str(&report.to_gradescope_json().expect("serialize report"))
            .expect("valid json");
    assert_eq!(json["score"].as_f64().map(f64::is_sign_positive), Some(true));
}

#[test]
fn steps_run_by_order_key_not_declaration_order() {
    let rubric = Rubric::new("shuffled", [
        step(30, "c", silent),
        step(2, "a", silent),
        step(11, "b", silent),
    ])
    .expect("valid rubric");

    let orders: Vec<u32> = rubric.steps().iter().map(|s| s.order()).collect();
    assert_eq!(orders, vec![2, 11, 30]);

    let mut trace = Trace::default();
    grade::run(&rubric, &mut trace);
    assert_eq!(trace.ran, vec!["a", "b", "c"]);
}

#[test]
fn duplicate_order_keys_are_rejected() {
    let err = Rubric::new("dupes", [step(1, "a", ok), step(2, "b", ok), step(1, "c", ok)])
        .expect_err("duplicate keys must fail");

    assert_eq!(err, RubricError::DuplicateOrder {
        rubric: "dupes".to_string(),
        order:  1,
    });
}

#[test]
fn blank_descriptions_are_rejected() {
    let err = Rubric::new("blank", [step(1, "a", ok), step(2, "   ", ok)])
        .expect_err("blank description must fail");

    assert_eq!(err, RubricError::MissingDescription {
        rubric: "blank".to_string(),
        order:  2,
    });
}

#[test]
fn empty_rubrics_are_rejected() {
    let err = Rubric::<Trace>::new("nothing", Vec::new()).expect_err("empty rubric must fail");
    assert_eq!(err, RubricError::Empty("nothing".to_string()));
}

#[test]
fn session_reaches_complete_and_does_not_rerun() {
    let rubric = Rubric::new("once", [step(1, "a", ok)]).expect("valid rubric");
    let mut trace = Trace::default();
    let mut session = Session::new(&rubric);
    assert_eq!(session.state(), SessionState::Running);

    let report = session.run(&mut trace);
    assert_eq!(session.state(), SessionState::Complete);
    assert_eq!(report.total(), 1.0);

    let again = session.run(&mut trace);
    assert!(again.entries().is_empty());
    assert_eq!(trace.ran.len(), 1);
}

#[test]
fn executor_classifies_outcomes() {
    let mut ledger = Ledger::new();
    let mut trace = Trace::default();

    assert_eq!(
        execute(&step(1, "a", ok), &mut trace, &mut ledger),
        Outcome::Passed { points: 1.0 }
    );
    assert_eq!(execute(&step(2, "b", silent), &mut trace, &mut ledger), Outcome::Failed);
    assert!(execute(&step(3, "c", stop_missing_file), &mut trace, &mut ledger).is_stop());

    match execute(&step(4, "d", fault), &mut trace, &mut ledger) {
        Outcome::Errored {
            comment,
            diagnostic,
        } => {
            assert_eq!(comment, "d (unable to grade)");
            assert!(diagnostic.contains("attribute 'href' missing"));
        }
        other => panic!("expected an errored outcome, got {other:?}"),
    }

    // The executor leaves the synthesized comment to the session.
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.total(), 1.0);
}
