//! # Tailwater
//!
//! > *"The water behind the boat does the pushing"*
//!
//! A Rust library for lazy, composable effects with callback-based
//! execution.
//!
//! ## Philosophy
//!
//! **Tailwater** separates *describing* a computation from *running* it:
//! - An [`Effect`] is an immutable description. Building one performs no
//!   work; combinators return new descriptions and never mutate.
//! - [`Effect::run`] interprets the description on a trampoline with an
//!   explicit continuation stack, so arbitrarily deep chains never
//!   overflow the native call stack, and delivers exactly one terminal
//!   [`Outcome`] to a completion callback.
//! - Failures short-circuit to the nearest recovery; successes skip
//!   pending recoveries. Asynchronous steps suspend the run and resume it
//!   on the same continuation stack.
//!
//! ## Quick Example
//!
//! ```rust
//! use tailwater::{Effect, Outcome, testing::run_now};
//!
//! fn parse(input: &'static str) -> Effect<i32, String> {
//!     Effect::sync(move || input.trim().to_string()).and_then(|s| {
//!         match s.parse::<i32>() {
//!             Ok(n) => Effect::succeed(n),
//!             Err(e) => Effect::fail(format!("not a number: {}", e)),
//!         }
//!     })
//! }
//!
//! let effect = parse(" 21 ")
//!     .map(|n| n * 2)
//!     .or_else(|_| Effect::<i32, String>::succeed(0));
//!
//! assert_eq!(run_now(effect), Outcome::success(42));
//! ```
//!
//! Running is callback-based at the core; with the `async` feature (or via
//! [`Effect::run_future`]) an effect can also be awaited as a future.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod aggregate;
pub mod bracket;
pub mod effect;
pub mod outcome;
pub mod testing;

mod interpreter;
mod stack;

// Re-exports
pub use aggregate::{all, chain, ChainStep};
pub use bracket::bracket;
pub use effect::{Effect, Resume};
pub use outcome::Outcome;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::aggregate::{all, chain, ChainStep};
    pub use crate::bracket::bracket;
    pub use crate::effect::{Effect, Resume};
    pub use crate::outcome::Outcome;
}
