use thiserror::Error;

/// Result alias for `hitgraph`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph construction, purging and community detection.
///
/// Input problems are reported before any launch is issued. `Accelerator`
/// is reserved for execution failures and is never used for algorithmic
/// non-convergence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Shape mismatch between arrays that must agree.
    #[error("shape mismatch: expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// CSR arrays are internally inconsistent.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A loop did not reach its fixpoint within its iteration budget.
    #[error("did not converge after {iterations} iterations")]
    ConvergenceFailure {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// A launch failed to execute (thread pool, allocation, kernel panic).
    #[error("launch '{kernel}' failed: {message}")]
    Accelerator {
        /// Name of the failing launch.
        kernel: &'static str,
        /// Failure description.
        message: String,
    },

    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        Error::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether the error is a fatal execution failure rather than a data problem.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Accelerator { .. })
    }
}

/// Result of an iterate-to-fixpoint loop.
///
/// When the iteration budget runs out, `value` holds the best state reached
/// and `converged` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    /// Final (or best) state.
    pub value: T,
    /// Iterations executed.
    pub iterations: usize,
    /// Whether the stopping predicate was reached.
    pub converged: bool,
}

impl<T> Outcome<T> {
    pub(crate) fn converged(value: T, iterations: usize) -> Self {
        Self {
            value,
            iterations,
            converged: true,
        }
    }

    pub(crate) fn exhausted(value: T, iterations: usize) -> Self {
        Self {
            value,
            iterations,
            converged: false,
        }
    }

    /// Return the value, or `ConvergenceFailure` if the budget ran out.
    pub fn into_converged(self) -> Result<T> {
        if self.converged {
            Ok(self.value)
        } else {
            Err(Error::ConvergenceFailure {
                iterations: self.iterations,
            })
        }
    }

    /// Return the value regardless of convergence.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Map the carried value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            iterations: self.iterations,
            converged: self.converged,
        }
    }
}
