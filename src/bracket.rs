//! Bracket pattern for safe resource management.
//!
//! The bracket pattern has three phases:
//! 1. **Acquire**: an effect that obtains the resource
//! 2. **Use**: a function from the resource to the body effect
//! 3. **Release**: a procedure that gives the resource back
//!
//! [`bracket`] assembles the three into one composite effect out of the
//! ordinary sequencing and recovery combinators; the interpreter executes
//! the result with no special-casing. Release runs exactly once after the
//! body reaches either outcome, runs if constructing the body effect
//! panics, and never runs when acquisition itself fails.

use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

use crate::effect::Effect;

/// Acquire a resource, use it, and guarantee release.
///
/// The release procedure runs exactly once as soon as the body effect has
/// reached a terminal outcome, whether success or failure. If `use_fn`
/// itself panics while constructing the body effect, release runs before
/// the panic resumes. If `acquire` fails, the failure propagates and
/// release never runs.
///
/// There is no cancellation in the core: if the body suspends on an
/// asynchronous instruction, release waits for the resumption.
///
/// # Examples
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use tailwater::{bracket, Effect, Outcome, testing::run_now};
///
/// let released = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&released);
///
/// let effect = bracket(
///     // Acquire: open a connection
///     Effect::<String, String>::succeed("conn-7".to_string()),
///     // Use: query through it
///     |conn| Effect::succeed(format!("result via {}", conn)),
///     // Release: give it back, exactly once
///     move |_conn| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     },
/// );
///
/// assert_eq!(
///     run_now(effect),
///     Outcome::success("result via conn-7".to_string()),
/// );
/// assert_eq!(released.load(Ordering::SeqCst), 1);
/// ```
pub fn bracket<R, A, E>(
    acquire: Effect<R, E>,
    use_fn: impl FnOnce(R) -> Effect<A, E> + Send + 'static,
    release: impl FnOnce(R) + Send + 'static,
) -> Effect<A, E>
where
    R: Clone + Send + 'static,
    A: Send + 'static,
    E: Send + 'static,
{
    acquire.and_then(move |resource| {
        let body = match catch_unwind(AssertUnwindSafe({
            let resource = resource.clone();
            move || use_fn(resource)
        })) {
            Ok(body) => body,
            Err(panic) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("body construction panicked; releasing resource before unwinding");
                release(resource);
                resume_unwind(panic);
            }
        };
        // Materialize the body's outcome so one continuation observes
        // both paths and release runs exactly once.
        body.attempt::<E>().and_then(move |outcome| {
            release(resource);
            Effect::from_outcome(outcome)
        })
    })
}
