//! Algebraic behavior of the effect combinators, checked end to end
//! through the interpreter.

use tailwater::{Effect, Outcome, testing::run_now};

// ========== Sequencing laws ==========

#[test]
fn left_identity() {
    // succeed(a).and_then(f) == f(a)
    let f = |n: i32| Effect::<i32, String>::succeed(n * 2);
    let lhs = Effect::<i32, String>::succeed(21).and_then(f);
    let rhs = f(21);
    assert_eq!(run_now(lhs), run_now(rhs));
}

#[test]
fn right_identity() {
    // m.and_then(succeed) == m
    let lhs = Effect::<i32, String>::sync(|| 42).and_then(Effect::succeed);
    let rhs = Effect::<i32, String>::sync(|| 42);
    assert_eq!(run_now(lhs), run_now(rhs));
}

#[test]
fn associativity() {
    // (m.and_then(f)).and_then(g) == m.and_then(|x| f(x).and_then(g))
    let f = |n: i32| Effect::<i32, String>::succeed(n + 1);
    let g = |n: i32| Effect::<i32, String>::succeed(n * 10);

    let lhs = Effect::<i32, String>::succeed(3).and_then(f).and_then(g);
    let rhs = Effect::<i32, String>::succeed(3).and_then(move |x| f(x).and_then(g));
    assert_eq!(run_now(lhs), run_now(rhs));
}

#[test]
fn associativity_holds_through_a_failure() {
    let f = |_: i32| Effect::<i32, String>::fail("boom".to_string());
    let g = |n: i32| Effect::<i32, String>::succeed(n * 10);

    let lhs = Effect::<i32, String>::succeed(3).and_then(f).and_then(g);
    let rhs = Effect::<i32, String>::succeed(3).and_then(move |x| f(x).and_then(g));
    assert_eq!(run_now(lhs), run_now(rhs));
    assert_eq!(
        run_now(Effect::<i32, String>::succeed(3).and_then(f).and_then(g)),
        Outcome::failure("boom".to_string())
    );
}

// ========== Recovery laws ==========

#[test]
fn recovery_identity_on_failure() {
    // fail(e).or_else(h) == h(e)
    let h = |e: String| Effect::<i32, String>::succeed(e.len() as i32);
    let lhs = Effect::<i32, String>::fail("boom".to_string()).or_else(h);
    let rhs = h("boom".to_string());
    assert_eq!(run_now(lhs), run_now(rhs));
}

#[test]
fn recovery_is_transparent_on_success() {
    // succeed(a).or_else(h) == succeed(a)
    let lhs = Effect::<i32, String>::succeed(42)
        .or_else(|_| Effect::<i32, String>::fail("unreachable".to_string()));
    assert_eq!(run_now(lhs), Outcome::success(42));
}

#[test]
fn map_composition() {
    // m.map(f).map(g) == m.map(|x| g(f(x)))
    let lhs = Effect::<i32, String>::succeed(3).map(|n| n + 1).map(|n| n * 10);
    let rhs = Effect::<i32, String>::succeed(3).map(|n| (n + 1) * 10);
    assert_eq!(run_now(lhs), run_now(rhs));
}

// ========== Laziness ==========

#[test]
fn nothing_executes_before_run() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let side_effects = Arc::new(AtomicUsize::new(0));
    let a = Arc::clone(&side_effects);
    let b = Arc::clone(&side_effects);

    let effect = Effect::<i32, String>::sync(move || {
        a.fetch_add(1, Ordering::SeqCst);
        1
    })
    .and_then(move |n| {
        b.fetch_add(1, Ordering::SeqCst);
        Effect::succeed(n + 1)
    });

    assert_eq!(side_effects.load(Ordering::SeqCst), 0);
    assert_eq!(run_now(effect), Outcome::success(2));
    assert_eq!(side_effects.load(Ordering::SeqCst), 2);
}

#[test]
fn each_run_reexecutes_the_description() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let runs = Arc::new(AtomicUsize::new(0));
    let build = {
        let runs = Arc::clone(&runs);
        move || {
            let counter = Arc::clone(&runs);
            Effect::<usize, String>::sync(move || counter.fetch_add(1, Ordering::SeqCst))
        }
    };

    assert_eq!(run_now(build()), Outcome::success(0));
    assert_eq!(run_now(build()), Outcome::success(1));
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}
