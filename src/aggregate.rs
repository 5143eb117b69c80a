//! Multi-effect aggregation helpers.
//!
//! This module provides the combinators that operate on collections of
//! effects:
//! - [`all`] - start every effect's run at once, collect successes in
//!   input order, fail with the first error observed
//! - [`chain`] - fold a sequence of continuation functions over an
//!   initial effect
//!
//! Both are conveniences layered over [`Effect`]'s primitives; the
//! interpreter knows nothing about them.

use std::sync::{Arc, Mutex};

use crate::effect::{Effect, Resume};
use crate::outcome::Outcome;

/// A boxed continuation step for [`chain`].
pub type ChainStep<A, E> = Box<dyn FnOnce(A) -> Effect<A, E> + Send>;

struct AllState<A, E> {
    slots: Vec<Option<A>>,
    remaining: usize,
    resume: Option<Resume<Vec<A>, E>>,
}

/// Run every effect independently and collect their successes in input
/// order.
///
/// Each child run owns its own continuation stack and starts immediately
/// when the aggregate effect is interpreted; children with asynchronous
/// instructions therefore make progress concurrently. The aggregate
/// completes with failure as soon as any child fails. There is no
/// cancellation: still-running siblings keep running, and their
/// later-arriving outcomes are ignored by the aggregator rather than
/// suppressed at the source.
///
/// An empty input completes immediately with an empty vector.
///
/// # Examples
///
/// ```rust
/// use tailwater::{all, Effect, Outcome, testing::run_now};
///
/// let effect = all(vec![
///     Effect::<i32, String>::succeed(1),
///     Effect::<i32, String>::succeed(2),
///     Effect::<i32, String>::succeed(3),
/// ]);
/// assert_eq!(run_now(effect), Outcome::success(vec![1, 2, 3]));
///
/// let effect = all(vec![
///     Effect::<i32, String>::succeed(1),
///     Effect::<i32, String>::fail("boom".to_string()),
///     Effect::<i32, String>::succeed(3),
/// ]);
/// assert_eq!(run_now(effect), Outcome::failure("boom".to_string()));
/// ```
pub fn all<A, E>(effects: Vec<Effect<A, E>>) -> Effect<Vec<A>, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    Effect::from_async(move |resume| {
        let count = effects.len();
        if count == 0 {
            return resume.succeed(Vec::new());
        }

        let state = Arc::new(Mutex::new(AllState {
            slots: (0..count).map(|_| None).collect(),
            remaining: count,
            resume: Some(resume),
        }));

        for (index, effect) in effects.into_iter().enumerate() {
            let shared = Arc::clone(&state);
            effect.run(move |outcome| {
                let mut state = shared.lock().expect("aggregation state poisoned");
                if state.resume.is_none() {
                    // A sibling already failed; this outcome arrived too
                    // late to matter.
                    #[cfg(feature = "tracing")]
                    tracing::trace!(index, "ignoring sibling outcome after aggregation completed");
                    return;
                }
                match outcome {
                    Outcome::Success(value) => {
                        state.slots[index] = Some(value);
                        state.remaining -= 1;
                        if state.remaining == 0 {
                            let values = state
                                .slots
                                .iter_mut()
                                .map(|slot| slot.take().expect("every slot filled"))
                                .collect();
                            let resume = state.resume.take().expect("resume still pending");
                            drop(state);
                            resume.succeed(values);
                        }
                    }
                    Outcome::Failure(error) => {
                        let resume = state.resume.take().expect("resume still pending");
                        drop(state);
                        resume.fail(error);
                    }
                }
            });
        }
    })
}

/// Fold a sequence of continuation functions over an initial effect.
///
/// Each step is applied with [`Effect::and_then`], so the steps run in
/// order and the first failure skips everything after it.
///
/// # Examples
///
/// ```rust
/// use tailwater::{chain, ChainStep, Effect, Outcome, testing::run_now};
///
/// let steps: Vec<ChainStep<i32, String>> = vec![
///     Box::new(|n| Effect::succeed(n + 1)),
///     Box::new(|n| Effect::succeed(n * 10)),
/// ];
///
/// let effect = chain(Effect::succeed(3), steps);
/// assert_eq!(run_now(effect), Outcome::success(40));
/// ```
pub fn chain<A, E>(
    initial: Effect<A, E>,
    steps: impl IntoIterator<Item = ChainStep<A, E>>,
) -> Effect<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    steps
        .into_iter()
        .fold(initial, |effect, step| effect.and_then(step))
}
