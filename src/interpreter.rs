//! The trampolined interpreter.
//!
//! One call to [`run`] walks an instruction tree in a loop: a single
//! mutable current-instruction slot, the run's continuation stack, and the
//! completion callback. Sequencing and recovery nodes push a frame and
//! descend; terminal-ish nodes resolve against the stack. The loop never
//! recurses, so the depth of the instruction tree never becomes native
//! call-stack depth.
//!
//! The only place a fresh call frame is created is the asynchronous
//! resumption: an `Async` instruction suspends the loop, hands its starter
//! a callback owning the driver state, and that callback re-enters the
//! loop with the same continuation stack when the starter completes.
//! Because a well-behaved starter defers completion past the current point
//! of control, the re-entry happens after `run` has already returned, on
//! an otherwise empty stack.
//!
//! The loop's only exits are one invocation of the completion callback or
//! a suspension awaiting an async completion. There is no other terminal
//! state, and no interpreter state outlives the run: no singleton, no
//! shared queue.

use crate::effect::{ErasedComplete, ErasedOutcome, Repr};
use crate::outcome::Outcome;
use crate::stack::ContinuationStack;

/// Run an instruction tree to completion.
///
/// `complete` is invoked exactly once: synchronously, if no `Async`
/// instruction is reached, or from the async completion otherwise.
pub(crate) fn run(effect: Repr, complete: ErasedComplete) {
    Driver {
        stack: ContinuationStack::new(),
        complete,
    }
    .step(effect);
}

/// The state owned by one run: its continuation stack and its completion
/// callback. The driver moves into an async starter's callback at every
/// suspension and comes back out at resumption, so the same stack serves
/// the whole run.
struct Driver {
    stack: ContinuationStack,
    complete: ErasedComplete,
}

impl Driver {
    /// The trampoline proper. Loops until the tree yields a terminal
    /// outcome or suspends on an `Async` instruction.
    fn step(mut self, root: Repr) {
        let mut current = root;
        loop {
            match current {
                Repr::Succeed(value) => match self.stack.next_success() {
                    Some(handler) => current = handler(value),
                    None => return self.finish(Outcome::Success(value)),
                },
                Repr::Sync(thunk) => {
                    // Panics in the thunk are deliberately not caught here;
                    // they unwind out of the caller's `run`.
                    let value = thunk();
                    match self.stack.next_success() {
                        Some(handler) => current = handler(value),
                        None => return self.finish(Outcome::Success(value)),
                    }
                }
                Repr::Fail(error) => match self.stack.next_failure() {
                    Some(handler) => current = handler(error),
                    None => return self.finish(Outcome::Failure(error)),
                },
                Repr::FlatMap(source, continuation) => {
                    self.stack.push_success(continuation);
                    current = *source;
                }
                Repr::Recover(source, handler) => {
                    self.stack.push_failure(handler);
                    current = *source;
                }
                Repr::Async(starter) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("suspending on async instruction");
                    return starter(Box::new(move |outcome| self.resume(outcome)));
                }
            }
        }
    }

    /// Re-enter the loop after an asynchronous completion, resolving the
    /// delivered outcome against the same continuation stack the run
    /// suspended with.
    fn resume(mut self, outcome: ErasedOutcome) {
        #[cfg(feature = "tracing")]
        tracing::trace!("resuming after async completion");
        match outcome {
            Outcome::Success(value) => match self.stack.next_success() {
                Some(handler) => self.step(handler(value)),
                None => self.finish(Outcome::Success(value)),
            },
            Outcome::Failure(error) => match self.stack.next_failure() {
                Some(handler) => self.step(handler(error)),
                None => self.finish(Outcome::Failure(error)),
            },
        }
    }

    fn finish(self, outcome: ErasedOutcome) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            success = outcome.is_success(),
            "run complete, delivering terminal outcome"
        );
        (self.complete)(outcome);
    }
}
