//! Integration tests for the bracket resource pattern, exercising it the
//! way application code composes it: with real chains, recoveries, and
//! suspensions around the resource scope.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use tailwater::{bracket, Effect, Outcome, testing::run_now};

#[derive(Clone)]
struct Connection {
    id: u32,
}

fn open(pool: &Arc<AtomicUsize>) -> Effect<Connection, String> {
    let pool = Arc::clone(pool);
    Effect::sync(move || {
        pool.fetch_add(1, Ordering::SeqCst);
        Connection { id: 7 }
    })
}

fn close(pool: &Arc<AtomicUsize>) -> impl FnOnce(Connection) + Send + 'static {
    let pool = Arc::clone(pool);
    move |_conn| {
        pool.fetch_sub(1, Ordering::SeqCst);
    }
}

#[test]
fn the_resource_is_returned_after_a_query() {
    let open_connections = Arc::new(AtomicUsize::new(0));

    let effect = bracket(
        open(&open_connections),
        |conn| Effect::succeed(format!("row from conn {}", conn.id)),
        close(&open_connections),
    );

    assert_eq!(
        run_now(effect),
        Outcome::success("row from conn 7".to_string())
    );
    assert_eq!(open_connections.load(Ordering::SeqCst), 0);
}

#[test]
fn the_resource_is_returned_after_a_failed_query() {
    let open_connections = Arc::new(AtomicUsize::new(0));

    let effect = bracket(
        open(&open_connections),
        |_conn| Effect::<String, String>::fail("query timed out".to_string()),
        close(&open_connections),
    );

    assert_eq!(
        run_now(effect),
        Outcome::failure("query timed out".to_string())
    );
    assert_eq!(open_connections.load(Ordering::SeqCst), 0);
}

#[test]
fn recovery_outside_the_bracket_sees_the_body_failure() {
    let open_connections = Arc::new(AtomicUsize::new(0));

    let effect = bracket(
        open(&open_connections),
        |_conn| Effect::<String, String>::fail("query timed out".to_string()),
        close(&open_connections),
    )
    .or_else(|e| Effect::<String, String>::succeed(format!("fallback after {}", e)));

    assert_eq!(
        run_now(effect),
        Outcome::success("fallback after query timed out".to_string())
    );
    assert_eq!(open_connections.load(Ordering::SeqCst), 0);
}

#[test]
fn release_happens_before_continuations_outside_the_bracket() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let at_release = Arc::clone(&events);
    let after_bracket = Arc::clone(&events);

    let effect = bracket(
        Effect::<u32, String>::succeed(1),
        |n| Effect::succeed(n + 1),
        move |_n| at_release.lock().unwrap().push("release"),
    )
    .and_then(move |n| {
        after_bracket.lock().unwrap().push("after");
        Effect::succeed(n)
    });

    assert_eq!(run_now(effect), Outcome::success(2));
    assert_eq!(*events.lock().unwrap(), vec!["release", "after"]);
}

#[test]
fn an_async_body_still_releases_exactly_once() {
    let open_connections = Arc::new(AtomicUsize::new(0));

    let effect = bracket(
        open(&open_connections),
        |conn| {
            Effect::<u32, String>::from_async(move |resume| {
                std::thread::spawn(move || resume.succeed(conn.id * 6));
            })
        },
        close(&open_connections),
    );

    let (tx, rx) = mpsc::channel();
    effect.run(move |outcome| tx.send(outcome).unwrap());
    assert_eq!(rx.recv().unwrap(), Outcome::success(42));
    assert_eq!(open_connections.load(Ordering::SeqCst), 0);
}

#[test]
fn brackets_compose_with_sequencing_between_them() {
    let open_connections = Arc::new(AtomicUsize::new(0));
    let first_pool = Arc::clone(&open_connections);
    let second_pool = Arc::clone(&open_connections);

    let effect = bracket(
        open(&first_pool),
        |conn| Effect::succeed(conn.id),
        close(&first_pool),
    )
    .and_then(move |first_id| {
        bracket(
            open(&second_pool),
            move |conn| Effect::succeed(first_id + conn.id),
            close(&second_pool),
        )
    });

    assert_eq!(run_now(effect), Outcome::success(14));
    assert_eq!(open_connections.load(Ordering::SeqCst), 0);
}
