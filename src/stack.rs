//! The run-scoped continuation stack.
//!
//! Every interpreter invocation owns exactly one `ContinuationStack`. Each
//! frame records what to do next with either a success value or an error;
//! resolving an outcome pops frames from the top, discarding every frame
//! of the non-matching kind, until a matching handler is found or the
//! stack is exhausted. That discard-while-scanning pop is the whole
//! short-circuit mechanism: a failure jumps over any number of pending
//! success handlers to the nearest recovery, and a success jumps over any
//! number of pending failure handlers to the nearest continuation, with no
//! explicit unwinding.

use crate::effect::Arrow;

/// One pending "what happens next" handler.
///
/// Created when the interpreter unpacks a `FlatMap` (success frame) or
/// `Recover` (failure frame) node; consumed when a terminal-ish value of
/// the matching kind reaches it, or discarded while scanning for the other
/// kind.
pub(crate) enum Frame {
    /// Run this handler with the success value.
    Success(Arrow),
    /// Run this handler with the error.
    Failure(Arrow),
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frame::Success(_) => f.write_str("Success(<handler>)"),
            Frame::Failure(_) => f.write_str("Failure(<handler>)"),
        }
    }
}

/// A LIFO stack of continuation frames, exclusively owned by one run.
///
/// Frames are pushed as the interpreter descends through sequencing and
/// recovery nodes, so the top of the stack is always the innermost pending
/// handler: continuations fire in last-pushed/first-resolved order, which
/// is exactly program order.
#[derive(Debug, Default)]
pub(crate) struct ContinuationStack {
    frames: Vec<Frame>,
}

impl ContinuationStack {
    pub(crate) fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Append a success handler.
    #[inline]
    pub(crate) fn push_success(&mut self, handler: Arrow) {
        self.frames.push(Frame::Success(handler));
    }

    /// Append a failure handler.
    #[inline]
    pub(crate) fn push_failure(&mut self, handler: Arrow) {
        self.frames.push(Frame::Failure(handler));
    }

    /// Pop the nearest success handler, discarding failure frames on the
    /// way down. Returns `None` when the stack is exhausted, which makes
    /// the current success value terminal.
    pub(crate) fn next_success(&mut self) -> Option<Arrow> {
        while let Some(frame) = self.frames.pop() {
            if let Frame::Success(handler) = frame {
                return Some(handler);
            }
        }
        None
    }

    /// Pop the nearest failure handler, discarding success frames on the
    /// way down. Returns `None` when the stack is exhausted, which makes
    /// the current error terminal.
    pub(crate) fn next_failure(&mut self) -> Option<Arrow> {
        while let Some(frame) = self.frames.pop() {
            if let Frame::Failure(handler) = frame {
                return Some(handler);
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{reclaim, AnyValue, Repr};

    fn success_arrow(label: i32) -> Arrow {
        Box::new(move |value: AnyValue| {
            let n = reclaim::<i32>(value);
            Repr::Succeed(Box::new(n + label))
        })
    }

    fn failure_arrow(label: i32) -> Arrow {
        Box::new(move |value: AnyValue| {
            let n = reclaim::<i32>(value);
            Repr::Fail(Box::new(n + label))
        })
    }

    fn payload_of(repr: Repr) -> i32 {
        match repr {
            Repr::Succeed(value) | Repr::Fail(value) => reclaim::<i32>(value),
            _ => panic!("test arrows only build terminal nodes"),
        }
    }

    #[test]
    fn next_success_returns_frames_in_lifo_order() {
        let mut stack = ContinuationStack::new();
        stack.push_success(success_arrow(1));
        stack.push_success(success_arrow(2));

        let top = stack.next_success().expect("top frame");
        assert_eq!(payload_of(top(Box::new(0i32))), 2);

        let bottom = stack.next_success().expect("bottom frame");
        assert_eq!(payload_of(bottom(Box::new(0i32))), 1);

        assert!(stack.next_success().is_none());
    }

    #[test]
    fn next_success_discards_failure_frames_while_scanning() {
        let mut stack = ContinuationStack::new();
        stack.push_success(success_arrow(7));
        stack.push_failure(failure_arrow(100));
        stack.push_failure(failure_arrow(200));

        let handler = stack.next_success().expect("success frame below");
        assert_eq!(payload_of(handler(Box::new(0i32))), 7);
        // The discarded failure frames are gone for good.
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn next_failure_discards_success_frames_while_scanning() {
        let mut stack = ContinuationStack::new();
        stack.push_failure(failure_arrow(9));
        stack.push_success(success_arrow(1));
        stack.push_success(success_arrow(2));

        let handler = stack.next_failure().expect("failure frame below");
        assert_eq!(payload_of(handler(Box::new(0i32))), 9);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn exhausted_stack_yields_none_for_both_kinds() {
        let mut stack = ContinuationStack::new();
        assert!(stack.next_success().is_none());
        assert!(stack.next_failure().is_none());
    }

    #[test]
    fn scanning_consumes_even_when_no_match_exists() {
        let mut stack = ContinuationStack::new();
        stack.push_success(success_arrow(1));
        stack.push_success(success_arrow(2));

        assert!(stack.next_failure().is_none());
        // The scan drained the non-matching frames.
        assert_eq!(stack.len(), 0);
    }
}
