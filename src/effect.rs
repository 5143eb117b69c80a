//! Effect values: immutable descriptions of computations.
//!
//! An [`Effect<A, E>`] describes a computation that, once run, either
//! succeeds with an `A` or fails with an `E`. Building an effect performs
//! no work: constructors and combinators only assemble an instruction
//! tree, and nothing executes until [`Effect::run`] hands the tree to the
//! interpreter. Because effects are plain data, the same value can be run
//! any number of times; each run owns its own continuation stack.
//!
//! # Core Concepts
//!
//! - **Describe now, run later**: constructors never invoke thunks or
//!   starters; the interpreter does, when it reaches them
//! - **Two primitives**: sequencing ([`Effect::and_then`]) and recovery
//!   ([`Effect::or_else`]); every other combinator is derived from those
//! - **Stack safety**: arbitrarily deep chains of sequencing and recovery
//!   run in constant native stack space
//!
//! # Examples
//!
//! ## Building and running a chain
//!
//! ```rust
//! use tailwater::{Effect, Outcome, testing::run_now};
//!
//! let effect = Effect::<i32, String>::succeed(1)
//!     .and_then(|x| Effect::succeed(x + 1))
//!     .and_then(|_| Effect::<i32, String>::fail("boom".to_string()))
//!     .or_else(|_| Effect::<i32, String>::succeed(-1));
//!
//! assert_eq!(run_now(effect), Outcome::success(-1));
//! ```
//!
//! ## Deferred synchronous work
//!
//! ```rust
//! use tailwater::{Effect, Outcome, testing::run_now};
//!
//! // The closure does not run here...
//! let effect = Effect::<i32, String>::sync(|| 40 + 2);
//!
//! // ...it runs here.
//! assert_eq!(run_now(effect), Outcome::success(42));
//! ```
//!
//! ## Asynchronous completion
//!
//! ```rust
//! use tailwater::{Effect, Outcome};
//!
//! # tokio_test::block_on(async {
//! let effect = Effect::<i32, String>::from_async(|resume| {
//!     std::thread::spawn(move || {
//!         resume.succeed(42);
//!     });
//! });
//!
//! assert_eq!(effect.run_future().await, Ok(42));
//! # });
//! ```

use std::any::Any;
use std::marker::PhantomData;

use crate::interpreter;
use crate::outcome::Outcome;

// ============================================================================
// Erased representation
// ============================================================================

/// A type-erased intermediate value flowing between continuations.
pub(crate) type AnyValue = Box<dyn Any + Send>;

/// A deferred synchronous computation.
pub(crate) type Thunk = Box<dyn FnOnce() -> AnyValue + Send>;

/// A type-erased continuation: consumes an intermediate value, yields the
/// next instruction tree. Success handlers (fed a success value) and
/// failure handlers (fed an error) share this one signature.
pub(crate) type Arrow = Box<dyn FnOnce(AnyValue) -> Repr + Send>;

/// The terminal result of a run, with both channels erased.
pub(crate) type ErasedOutcome = Outcome<AnyValue, AnyValue>;

/// The completion callback threaded through one run.
pub(crate) type ErasedComplete = Box<dyn FnOnce(ErasedOutcome) + Send>;

/// An asynchronous starter: invoked with the callback that resumes the run.
pub(crate) type Starter = Box<dyn FnOnce(ErasedComplete) + Send>;

/// The closed instruction set the interpreter dispatches on.
///
/// Each node carries exactly one payload. `FlatMap` and `Recover` form a
/// tree whose depth is unbounded by construction; the interpreter converts
/// that depth into continuation-stack entries, never call-stack frames.
pub(crate) enum Repr {
    /// A value that needs no work.
    Succeed(AnyValue),
    /// A deferred synchronous computation.
    Sync(Thunk),
    /// A deferred computation that reports its outcome through a callback.
    Async(Starter),
    /// Sequencing: run the source, feed its success value to the arrow.
    FlatMap(Box<Repr>, Arrow),
    /// An error that needs no work.
    Fail(AnyValue),
    /// Recovery: run the source, feed its failure to the arrow.
    Recover(Box<Repr>, Arrow),
}

/// Recover the concrete type of an erased intermediate value.
///
/// A mismatch here means a continuation was fed a value produced by the
/// wrong source. That is a defect in effect construction, not a runtime
/// condition the caller can handle, so it panics immediately.
pub(crate) fn reclaim<T: 'static>(value: AnyValue) -> T {
    match value.downcast::<T>() {
        Ok(boxed) => *boxed,
        Err(_) => panic!("continuation received a value of an unexpected type"),
    }
}

fn erase<T: Send + 'static>(value: T) -> AnyValue {
    Box::new(value)
}

// ============================================================================
// Public effect value
// ============================================================================

/// An immutable description of a computation that succeeds with `A` or
/// fails with `E`.
///
/// Effects are inert data. Running one walks its instruction tree through
/// the trampolined interpreter, which guarantees that chains of
/// [`and_then`](Effect::and_then) and [`or_else`](Effect::or_else) of any
/// depth execute in constant native stack space.
///
/// # Type Parameters
///
/// * `A` - The type of the success value
/// * `E` - The type of the error value
///
/// # Example
///
/// ```rust
/// use tailwater::{Effect, Outcome, testing::run_now};
///
/// let effect = Effect::<i32, String>::succeed(5)
///     .map(|x| x * 2)
///     .and_then(|x| Effect::succeed(x + 10));
///
/// assert_eq!(run_now(effect), Outcome::success(20));
/// ```
pub struct Effect<A, E> {
    pub(crate) repr: Repr,
    marker: PhantomData<fn() -> (A, E)>,
}

// Manual Debug implementation since the instruction tree holds closures
impl<A, E> std::fmt::Debug for Effect<A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.repr {
            Repr::Succeed(_) => "Succeed",
            Repr::Sync(_) => "Sync",
            Repr::Async(_) => "Async",
            Repr::FlatMap(_, _) => "FlatMap",
            Repr::Fail(_) => "Fail",
            Repr::Recover(_, _) => "Recover",
        };
        f.debug_struct("Effect").field("instruction", &tag).finish()
    }
}

impl<A, E> Effect<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn from_repr(repr: Repr) -> Self {
        Effect {
            repr,
            marker: PhantomData,
        }
    }

    // ========== Constructors ==========

    /// Create an effect that already has its result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(42);
    /// assert_eq!(run_now(effect), Outcome::success(42));
    /// ```
    pub fn succeed(value: A) -> Self {
        Self::from_repr(Repr::Succeed(erase(value)))
    }

    /// Create an effect that has already failed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::fail("boom".to_string());
    /// assert_eq!(run_now(effect), Outcome::failure("boom".to_string()));
    /// ```
    pub fn fail(error: E) -> Self {
        Self::from_repr(Repr::Fail(erase(error)))
    }

    /// Create an effect from a deferred synchronous computation.
    ///
    /// The thunk is not invoked until the interpreter reaches this
    /// instruction. The interpreter does not catch panics raised by the
    /// thunk; they unwind out of the `run` call. A computation that can
    /// fail belongs in the typed channel instead, via
    /// [`from_result`](Effect::from_result) or `sync(..).and_then(..)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::sync(|| 6 * 7);
    /// assert_eq!(run_now(effect), Outcome::success(42));
    /// ```
    pub fn sync(thunk: impl FnOnce() -> A + Send + 'static) -> Self {
        Self::from_repr(Repr::Sync(Box::new(move || erase(thunk()))))
    }

    /// Create an effect from a deferred asynchronous computation.
    ///
    /// The starter is not invoked until the interpreter reaches this
    /// instruction. When it is, the interpreter suspends, hands the
    /// starter a [`Resume`] handle, and returns control to the caller of
    /// `run`; completing the handle re-enters the interpreter.
    ///
    /// # Caller obligations
    ///
    /// The starter must complete its [`Resume`] exactly once. Move
    /// semantics prevent completing it twice; completing it zero times
    /// leaves the run permanently unfinished. The starter must also defer
    /// completion past the current point of control (hand the handle to a
    /// task, thread, or reactor). A starter that completes synchronously
    /// re-enters the interpreter within the same call frame and is exempt
    /// from the stack-safety guarantee.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome};
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<i32, String>::from_async(|resume| {
    ///     std::thread::spawn(move || resume.succeed(42));
    /// });
    /// assert_eq!(effect.run_future().await, Ok(42));
    /// # });
    /// ```
    pub fn from_async(starter: impl FnOnce(Resume<A, E>) + Send + 'static) -> Self {
        Self::from_repr(Repr::Async(Box::new(move |complete| {
            starter(Resume {
                complete,
                marker: PhantomData,
            });
        })))
    }

    /// Lift a `Result` into an effect.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::from_result(Ok(42));
    /// assert_eq!(run_now(effect), Outcome::success(42));
    ///
    /// let effect = Effect::<i32, String>::from_result(Err("boom".to_string()));
    /// assert_eq!(run_now(effect), Outcome::failure("boom".to_string()));
    /// ```
    pub fn from_result(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Effect::succeed(value),
            Err(error) => Effect::fail(error),
        }
    }

    /// Lift an [`Outcome`] into an effect.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::from_outcome(Outcome::<i32, String>::success(42));
    /// assert_eq!(run_now(effect), Outcome::success(42));
    /// ```
    pub fn from_outcome(outcome: Outcome<A, E>) -> Self {
        Self::from_result(outcome.into_result())
    }

    /// Adapt a future into an asynchronous effect.
    ///
    /// The future is spawned on the ambient tokio runtime when the
    /// interpreter reaches this instruction, which satisfies the deferred
    /// completion obligation of [`from_async`](Effect::from_async).
    ///
    /// # Panics
    ///
    /// Panics at run time if no tokio runtime is available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<i32, String>::from_future(async { Ok(42) });
    /// assert_eq!(effect.run_future().await, Ok(42));
    /// # });
    /// ```
    #[cfg(feature = "async")]
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: std::future::Future<Output = Result<A, E>> + Send + 'static,
    {
        Self::from_async(move |resume| {
            tokio::spawn(async move {
                resume.complete(future.await.into());
            });
        })
    }

    // ========== Primitive combinators ==========

    /// Sequence another effect after this one.
    ///
    /// If this effect succeeds, its value is fed to `f` to obtain the next
    /// effect; a failure skips `f` entirely. This is one of the two
    /// primitive node builders (monadic bind); chains of any depth run in
    /// constant native stack space.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(5)
    ///     .and_then(|x| Effect::succeed(x * 2));
    /// assert_eq!(run_now(effect), Outcome::success(10));
    ///
    /// // Error propagation skips the continuation
    /// let effect = Effect::<i32, String>::fail("boom".to_string())
    ///     .and_then(|x| Effect::succeed(x * 2));
    /// assert_eq!(run_now(effect), Outcome::failure("boom".to_string()));
    /// ```
    pub fn and_then<B>(self, f: impl FnOnce(A) -> Effect<B, E> + Send + 'static) -> Effect<B, E>
    where
        B: Send + 'static,
    {
        Effect::from_repr(Repr::FlatMap(
            Box::new(self.repr),
            Box::new(move |value| f(reclaim::<A>(value)).repr),
        ))
    }

    /// Recover from a failure with another effect.
    ///
    /// If this effect fails, its error is fed to `handler` to obtain a
    /// replacement effect; a success skips `handler` entirely. The
    /// replacement may carry a different error type, so recovery
    /// boundaries can change `E`. This is the second primitive node
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::fail("boom".to_string())
    ///     .or_else(|_| Effect::<i32, String>::succeed(42));
    /// assert_eq!(run_now(effect), Outcome::success(42));
    ///
    /// // No recovery on the success path
    /// let effect = Effect::<i32, String>::succeed(7)
    ///     .or_else(|_| Effect::<i32, String>::succeed(42));
    /// assert_eq!(run_now(effect), Outcome::success(7));
    /// ```
    pub fn or_else<E2>(
        self,
        handler: impl FnOnce(E) -> Effect<A, E2> + Send + 'static,
    ) -> Effect<A, E2>
    where
        E2: Send + 'static,
    {
        Effect::from_repr(Repr::Recover(
            Box::new(self.repr),
            Box::new(move |error| handler(reclaim::<E>(error)).repr),
        ))
    }

    // ========== Derived combinators ==========

    /// Transform the success value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(21).map(|x| x * 2);
    /// assert_eq!(run_now(effect), Outcome::success(42));
    /// ```
    pub fn map<B>(self, f: impl FnOnce(A) -> B + Send + 'static) -> Effect<B, E>
    where
        B: Send + 'static,
    {
        self.and_then(move |value| Effect::succeed(f(value)))
    }

    /// Transform the error value.
    ///
    /// Error transforms never run on the success path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::fail("boom".to_string())
    ///     .map_err(|e| format!("failed: {}", e));
    /// assert_eq!(run_now(effect), Outcome::failure("failed: boom".to_string()));
    /// ```
    pub fn map_err<E2>(self, f: impl FnOnce(E) -> E2 + Send + 'static) -> Effect<A, E2>
    where
        E2: Send + 'static,
    {
        self.or_else(move |error| Effect::fail(f(error)))
    }

    /// Recover from a failure with a plain value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect: Effect<i32, String> =
    ///     Effect::<i32, String>::fail("boom".to_string()).recover(|_| -1);
    /// assert_eq!(run_now(effect), Outcome::success(-1));
    /// ```
    pub fn recover<E2>(self, f: impl FnOnce(E) -> A + Send + 'static) -> Effect<A, E2>
    where
        E2: Send + 'static,
    {
        self.or_else(move |error| Effect::succeed(f(error)))
    }

    /// Fail with an error if the predicate rejects the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(25)
    ///     .check(|age| *age >= 18, || "too young".to_string());
    /// assert_eq!(run_now(effect), Outcome::success(25));
    ///
    /// let effect = Effect::<i32, String>::succeed(15)
    ///     .check(|age| *age >= 18, || "too young".to_string());
    /// assert_eq!(run_now(effect), Outcome::failure("too young".to_string()));
    /// ```
    pub fn check(
        self,
        predicate: impl FnOnce(&A) -> bool + Send + 'static,
        error_fn: impl FnOnce() -> E + Send + 'static,
    ) -> Self {
        self.and_then(move |value| {
            if predicate(&value) {
                Effect::succeed(value)
            } else {
                Effect::fail(error_fn())
            }
        })
    }

    /// Perform a side effect and return the original value.
    ///
    /// If the side effect fails, the whole computation fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(42).tap(|value| {
    ///     assert_eq!(*value, 42);
    ///     Effect::succeed(())
    /// });
    /// assert_eq!(run_now(effect), Outcome::success(42));
    /// ```
    pub fn tap(self, f: impl FnOnce(&A) -> Effect<(), E> + Send + 'static) -> Self
    where
        A: Clone,
    {
        self.and_then(move |value| {
            let keep = value.clone();
            f(&value).map(move |_| keep)
        })
    }

    /// Materialize the outcome into the success channel.
    ///
    /// The returned effect always succeeds, carrying the original run's
    /// [`Outcome`] as its value. This is the building block for
    /// combinators that must observe both paths with a single
    /// continuation, such as [`bracket`](crate::bracket).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect: Effect<Outcome<i32, String>, String> =
    ///     Effect::<i32, String>::fail("boom".to_string()).attempt();
    /// assert_eq!(
    ///     run_now(effect),
    ///     Outcome::success(Outcome::failure("boom".to_string())),
    /// );
    /// ```
    pub fn attempt<E2>(self) -> Effect<Outcome<A, E>, E2>
    where
        E2: Send + 'static,
    {
        self.map(Outcome::Success)
            .or_else(|error| Effect::succeed(Outcome::Failure(error)))
    }

    /// Sequence two effects and pair their results.
    ///
    /// `other` runs only if `self` succeeds. For independent, concurrent
    /// execution use [`all`](crate::all).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(1)
    ///     .zip(Effect::succeed("two".to_string()));
    /// assert_eq!(run_now(effect), Outcome::success((1, "two".to_string())));
    /// ```
    pub fn zip<B>(self, other: Effect<B, E>) -> Effect<(A, B), E>
    where
        B: Send + 'static,
    {
        self.and_then(move |a| other.map(move |b| (a, b)))
    }

    /// Sequence two effects and combine their results with a function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::{Effect, Outcome, testing::run_now};
    ///
    /// let effect = Effect::<i32, String>::succeed(20)
    ///     .zip_with(Effect::succeed(22), |a, b| a + b);
    /// assert_eq!(run_now(effect), Outcome::success(42));
    /// ```
    pub fn zip_with<B, C>(
        self,
        other: Effect<B, E>,
        f: impl FnOnce(A, B) -> C + Send + 'static,
    ) -> Effect<C, E>
    where
        B: Send + 'static,
        C: Send + 'static,
    {
        self.zip(other).map(move |(a, b)| f(a, b))
    }

    // ========== Execution ==========

    /// Run the effect, delivering its terminal [`Outcome`] to `complete`.
    ///
    /// The callback is invoked exactly once per run: either before `run`
    /// returns (for chains with no asynchronous instruction) or later,
    /// when the pending asynchronous instruction completes. Running the
    /// same effect value twice performs the computation twice, each run
    /// with its own continuation stack.
    ///
    /// Panics raised by [`sync`](Effect::sync) thunks are not caught; they
    /// unwind out of this call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::mpsc;
    /// use tailwater::{Effect, Outcome};
    ///
    /// let (tx, rx) = mpsc::channel();
    /// Effect::<i32, String>::succeed(42).run(move |outcome| {
    ///     tx.send(outcome).unwrap();
    /// });
    /// assert_eq!(rx.recv().unwrap(), Outcome::success(42));
    /// ```
    pub fn run(self, complete: impl FnOnce(Outcome<A, E>) + Send + 'static) {
        interpreter::run(
            self.repr,
            Box::new(move |erased: ErasedOutcome| {
                complete(erased.map(reclaim::<A>).map_err(reclaim::<E>));
            }),
        );
    }

    /// Run the effect and resolve the terminal outcome as a future.
    ///
    /// A thin adapter over [`run`](Effect::run): the completion callback
    /// fulfills a oneshot channel the returned future awaits. The future
    /// resolves exactly once, to `Ok` on success or `Err` on failure.
    ///
    /// # Panics
    ///
    /// Panics if the run is abandoned without completing, which can only
    /// happen when an async starter drops its [`Resume`] handle. That is a
    /// contract violation by the starter, reported as a defect rather than
    /// mapped into the typed error channel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tailwater::Effect;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = Effect::<i32, String>::succeed(21).map(|x| x * 2);
    /// assert_eq!(effect.run_future().await, Ok(42));
    /// # });
    /// ```
    pub async fn run_future(self) -> Result<A, E> {
        let (tx, rx) = futures::channel::oneshot::channel();
        self.run(move |outcome| {
            // The receiver may have been dropped; nothing to deliver to.
            let _ = tx.send(outcome);
        });
        match rx.await {
            Ok(outcome) => outcome.into_result(),
            Err(_) => panic!("effect run was abandoned without delivering an outcome"),
        }
    }
}

impl<A, E> From<Result<A, E>> for Effect<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    fn from(result: Result<A, E>) -> Self {
        Effect::from_result(result)
    }
}

impl<A, E> From<Outcome<A, E>> for Effect<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    fn from(outcome: Outcome<A, E>) -> Self {
        Effect::from_outcome(outcome)
    }
}

// ============================================================================
// Completion handle for async starters
// ============================================================================

/// The completion handle passed to an asynchronous starter.
///
/// Consuming the handle resumes the suspended run with the supplied
/// outcome. The handle is consumed by value, so it can be completed at
/// most once; completing it is the starter's obligation, and dropping it
/// without completing leaves the run permanently unfinished.
pub struct Resume<A, E> {
    complete: ErasedComplete,
    marker: PhantomData<fn(A, E)>,
}

impl<A, E> std::fmt::Debug for Resume<A, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resume")
            .field("complete", &"<callback>")
            .finish()
    }
}

impl<A, E> Resume<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    /// Resume the run with the given outcome.
    pub fn complete(self, outcome: Outcome<A, E>) {
        (self.complete)(outcome.map(erase).map_err(erase));
    }

    /// Resume the run with a success value.
    pub fn succeed(self, value: A) {
        self.complete(Outcome::Success(value));
    }

    /// Resume the run with an error.
    pub fn fail(self, error: E) {
        self.complete(Outcome::Failure(error));
    }
}
