//! Verifies the interpreter's trace-level instrumentation.
//!
//! Gated on the `tracing` feature through the test target's
//! `required-features`.

use std::sync::mpsc;

use tailwater::{Effect, Outcome};
use tracing_test::traced_test;

#[test]
#[traced_test]
fn suspension_and_resumption_are_traced() {
    let (tx, rx) = mpsc::channel();
    let effect = Effect::<i32, String>::from_async(|resume| {
        std::thread::spawn(move || resume.succeed(21));
    })
    .map(|n| n * 2);

    effect.run(move |outcome| tx.send(outcome).unwrap());
    assert_eq!(rx.recv().unwrap(), Outcome::success(42));

    assert!(logs_contain("suspending on async instruction"));
    assert!(logs_contain("run complete, delivering terminal outcome"));
}

#[test]
#[traced_test]
fn synchronous_runs_do_not_trace_a_suspension() {
    let (tx, rx) = mpsc::channel();
    Effect::<i32, String>::succeed(42).run(move |outcome| tx.send(outcome).unwrap());
    assert_eq!(rx.recv().unwrap(), Outcome::success(42));

    assert!(!logs_contain("suspending on async instruction"));
    assert!(logs_contain("run complete, delivering terminal outcome"));
}
