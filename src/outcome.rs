//! The terminal result of running an effect.
//!
//! # Outcome vs Result
//!
//! `Outcome<A, E>` is the vocabulary effects use to report how a run ended:
//! exactly one `Success(A)` or `Failure(E)` is delivered to the completion
//! callback of every run. It converts losslessly to and from
//! `std::result::Result`, and exists as its own type so the crate's
//! completion boundary has a name that is independent of `?`-oriented
//! control flow.
//!
//! Use `Outcome` when:
//! - Receiving the terminal value of an effect run
//! - Handing a result to a [`Resume`](crate::Resume) completion handle
//!
//! Use `Result` when:
//! - Writing ordinary fallible Rust that wants the `?` operator
//!
//! # Examples
//!
//! ```rust
//! use tailwater::Outcome;
//!
//! let success: Outcome<i32, String> = Outcome::success(42);
//! let failure: Outcome<i32, String> = Outcome::failure("boom".to_string());
//!
//! let description = success.fold(
//!     |value| format!("succeeded with {}", value),
//!     |error| format!("failed with {}", error),
//! );
//! assert_eq!(description, "succeeded with 42");
//!
//! assert_eq!(failure.into_result(), Err("boom".to_string()));
//! ```

/// The outcome of one effect run: `Success(A)` or `Failure(E)`.
///
/// Every interpreter run delivers exactly one `Outcome` to its completion
/// callback, never zero and never more than one. The type is plain data
/// with the usual fold/map/and_then combinators.
///
/// # Example
///
/// ```rust
/// use tailwater::Outcome;
///
/// let outcome: Outcome<i32, String> = Outcome::success(21);
/// let doubled = outcome.map(|n| n * 2);
/// assert_eq!(doubled, Outcome::success(42));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome<A, E> {
    /// The run produced a value.
    Success(A),
    /// The run produced an error.
    Failure(E),
}

impl<A, E> Outcome<A, E> {
    // ========== Constructors ==========

    /// Create a successful outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(42);
    /// assert!(outcome.is_success());
    /// ```
    #[inline]
    pub fn success(value: A) -> Self {
        Outcome::Success(value)
    }

    /// Create a failed outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::failure("boom".to_string());
    /// assert!(outcome.is_failure());
    /// ```
    #[inline]
    pub fn failure(error: E) -> Self {
        Outcome::Failure(error)
    }

    // ========== Predicates ==========

    /// Returns `true` if this is a `Success` value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(42);
    /// assert!(outcome.is_success());
    /// assert!(!outcome.is_failure());
    /// ```
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` if this is a `Failure` value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::failure("boom".to_string());
    /// assert!(outcome.is_failure());
    /// ```
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    // ========== Combinators ==========

    /// Collapse both variants into a single value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(42);
    /// let text = outcome.fold(|v| v.to_string(), |e| e);
    /// assert_eq!(text, "42");
    /// ```
    #[inline]
    pub fn fold<T>(self, on_success: impl FnOnce(A) -> T, on_failure: impl FnOnce(E) -> T) -> T {
        match self {
            Outcome::Success(value) => on_success(value),
            Outcome::Failure(error) => on_failure(error),
        }
    }

    /// Transform the success value, leaving a failure untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(21);
    /// assert_eq!(outcome.map(|n| n * 2), Outcome::success(42));
    ///
    /// let failure: Outcome<i32, String> = Outcome::failure("boom".to_string());
    /// assert_eq!(failure.map(|n| n * 2), Outcome::failure("boom".to_string()));
    /// ```
    #[inline]
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> Outcome<B, E> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Transform the error value, leaving a success untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::failure("boom".to_string());
    /// assert_eq!(
    ///     outcome.map_err(|e| format!("failed: {}", e)),
    ///     Outcome::failure("failed: boom".to_string()),
    /// );
    /// ```
    #[inline]
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<A, F> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    /// Chain another outcome-producing computation onto a success.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(5);
    /// let chained = outcome.and_then(|n| {
    ///     if n > 0 {
    ///         Outcome::success(n * 2)
    ///     } else {
    ///         Outcome::failure("not positive".to_string())
    ///     }
    /// });
    /// assert_eq!(chained, Outcome::success(10));
    /// ```
    #[inline]
    pub fn and_then<B>(self, f: impl FnOnce(A) -> Outcome<B, E>) -> Outcome<B, E> {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    // ========== Conversions ==========

    /// Convert into a `std::result::Result`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(42);
    /// assert_eq!(outcome.into_result(), Ok(42));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<A, E> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }

    /// Borrow the success value if present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::success(42);
    /// assert_eq!(outcome.success_ref(), Some(&42));
    /// ```
    #[inline]
    pub fn success_ref(&self) -> Option<&A> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Borrow the error value if present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tailwater::Outcome;
    ///
    /// let outcome: Outcome<i32, String> = Outcome::failure("boom".to_string());
    /// assert_eq!(outcome.failure_ref(), Some(&"boom".to_string()));
    /// ```
    #[inline]
    pub fn failure_ref(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }
}

impl<A, E> From<Result<A, E>> for Outcome<A, E> {
    #[inline]
    fn from(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }
}

impl<A, E> From<Outcome<A, E>> for Result<A, E> {
    #[inline]
    fn from(outcome: Outcome<A, E>) -> Self {
        outcome.into_result()
    }
}
