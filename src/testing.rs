//! Testing utilities and helpers for Tailwater
//!
//! This module provides ergonomic utilities for testing code that runs
//! effects. It includes a synchronous runner for effects without
//! asynchronous instructions, assertion macros, and property-based testing
//! support.
//!
//! # Examples
//!
//! ## Synchronous runner
//!
//! ```rust
//! use tailwater::{Effect, Outcome, testing::run_now};
//!
//! let effect = Effect::<i32, String>::succeed(21).map(|n| n * 2);
//! assert_eq!(run_now(effect), Outcome::success(42));
//! ```
//!
//! ## Assertion Macros
//!
//! ```rust
//! use tailwater::{Outcome, assert_success, assert_failure};
//!
//! let success = Outcome::<_, String>::success(42);
//! assert_success!(success);
//!
//! let failure = Outcome::<i32, _>::failure("error".to_string());
//! assert_failure!(failure);
//! ```

use std::sync::{Arc, Mutex};

use crate::effect::Effect;
use crate::outcome::Outcome;

/// Run an effect that completes synchronously and return its outcome.
///
/// This is the workhorse of effect tests: it runs the effect with a
/// callback that records the outcome, then takes the recording. It only
/// works for effects whose every instruction resolves before `run`
/// returns; an effect that suspends on an asynchronous instruction leaves
/// nothing recorded.
///
/// # Panics
///
/// Panics if the effect did not complete before `run` returned, which
/// almost always means it contains an asynchronous instruction whose
/// starter defers completion. Drive those with a channel or
/// [`Effect::run_future`] instead.
///
/// # Example
///
/// ```rust
/// use tailwater::{Effect, Outcome, testing::run_now};
///
/// let effect = Effect::<i32, String>::sync(|| 40).map(|n| n + 2);
/// assert_eq!(run_now(effect), Outcome::success(42));
/// ```
pub fn run_now<A, E>(effect: Effect<A, E>) -> Outcome<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    let slot = Arc::new(Mutex::new(None));
    let recorder = Arc::clone(&slot);
    effect.run(move |outcome| {
        *recorder.lock().expect("outcome slot poisoned") = Some(outcome);
    });
    let outcome = slot
        .lock()
        .expect("outcome slot poisoned")
        .take()
        .expect("effect did not complete synchronously; it suspended on an async instruction");
    outcome
}

/// Assert that an outcome is a success.
///
/// This macro will panic if the outcome is a `Failure`.
///
/// # Example
///
/// ```rust
/// use tailwater::{Outcome, assert_success};
///
/// let outcome = Outcome::<_, String>::success(42);
/// assert_success!(outcome);
/// ```
#[macro_export]
macro_rules! assert_success {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(_) => {}
            $crate::Outcome::Failure(e) => {
                panic!("Expected Success, got Failure: {:?}", e);
            }
        }
    };
}

/// Assert that an outcome is a failure.
///
/// This macro will panic if the outcome is a `Success`.
///
/// # Example
///
/// ```rust
/// use tailwater::{Outcome, assert_failure};
///
/// let outcome = Outcome::<i32, _>::failure("error".to_string());
/// assert_failure!(outcome);
/// ```
#[macro_export]
macro_rules! assert_failure {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure(_) => {}
            $crate::Outcome::Success(v) => {
                panic!("Expected Failure, got Success: {:?}", v);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl<A, E> Arbitrary for Outcome<A, E>
where
    A: Arbitrary + std::fmt::Debug + 'static,
    E: Arbitrary + std::fmt::Debug + 'static,
    A::Strategy: 'static,
    E::Strategy: 'static,
{
    type Parameters = (A::Parameters, E::Parameters);
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        let (a_params, e_params) = args;
        prop_oneof![
            any_with::<A>(a_params).prop_map(Outcome::success),
            any_with::<E>(e_params).prop_map(Outcome::failure),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_now_returns_a_success_outcome() {
        let effect = Effect::<i32, String>::succeed(42);
        assert_eq!(run_now(effect), Outcome::success(42));
    }

    #[test]
    fn run_now_returns_a_failure_outcome() {
        let effect = Effect::<i32, String>::fail("boom".to_string());
        assert_eq!(run_now(effect), Outcome::failure("boom".to_string()));
    }

    #[test]
    #[should_panic(expected = "did not complete synchronously")]
    fn run_now_panics_when_the_effect_suspends() {
        // A starter that never completes: the resume handle is dropped.
        let effect = Effect::<i32, String>::from_async(|_resume| {});
        let _ = run_now(effect);
    }

    #[test]
    fn assert_success_macro() {
        let outcome = Outcome::<_, String>::success(42);
        assert_success!(outcome);
    }

    #[test]
    fn assert_failure_macro() {
        let outcome = Outcome::<i32, _>::failure("error".to_string());
        assert_failure!(outcome);
    }

    #[test]
    #[should_panic(expected = "Expected Success, got Failure")]
    fn assert_success_panics_on_failure() {
        let outcome = Outcome::<i32, _>::failure("error".to_string());
        assert_success!(outcome);
    }

    #[test]
    #[should_panic(expected = "Expected Failure, got Success")]
    fn assert_failure_panics_on_success() {
        let outcome = Outcome::<_, String>::success(42);
        assert_failure!(outcome);
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn outcome_arbitrary_generates_valid_instances(
                outcome in any::<Outcome<i32, String>>()
            ) {
                match outcome {
                    Outcome::Success(_) => assert!(outcome.is_success()),
                    Outcome::Failure(_) => assert!(outcome.is_failure()),
                }
            }
        }
    }
}
