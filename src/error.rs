use std::error::Error;
use std::fmt;

/// Errors produced by the numerical routines and the expression engine.
#[derive(Clone, Debug, PartialEq)]
pub enum NumError {
    /// A step count of zero was passed to the integration engine.
    InvalidStepCount,
    /// The integrand (or another user expression) could not be evaluated
    /// at a sampled point.
    EvalFailure(String),
    /// The expression references a variable with no binding.
    UnknownVariable(String),
    /// The expression calls a function outside the permitted set.
    UnknownFunction(String),
    /// The expression text could not be parsed.
    ParseFailure(String),
    /// A non-positive tolerance was requested.
    BadTolerance,
    /// Bisection requires the function to change sign over the bracket.
    NoSignChange,
    /// Newton or chord hit a zero derivative (or secant denominator).
    VanishingDerivative,
    /// Fixed-point iteration rejected because `|phi'(x0)| >= 1`; carries
    /// the observed slope.
    ConvergenceNotGuaranteed(f64),
    /// The iteration cap was exhausted before the tolerance was met.
    MaxIterations(usize),
    /// Symbolic differentiation does not cover the named function.
    NotDifferentiable(&'static str),
    /// The matrix is singular, or numerically indistinguishable from it.
    SingularMatrix,
    /// Jacobi/Gauss-Seidel found a zero on the diagonal at the given row.
    ZeroDiagonal(usize),
    DimensionMismatch(String),
    NotEnoughPoints,
    DuplicateNodes,
}

impl fmt::Display for NumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumError::InvalidStepCount => write!(f, "step count must be positive"),
            NumError::EvalFailure(msg) => write!(f, "evaluation failed: {}", msg),
            NumError::UnknownVariable(name) => write!(f, "unknown variable '{}'", name),
            NumError::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            NumError::ParseFailure(msg) => write!(f, "parse error: {}", msg),
            NumError::BadTolerance => write!(f, "tolerance must be positive"),
            NumError::NoSignChange => {
                write!(f, "function does not change sign over the bracket")
            }
            NumError::VanishingDerivative => {
                write!(f, "derivative or secant denominator vanished during iteration")
            }
            NumError::ConvergenceNotGuaranteed(slope) => write!(
                f,
                "convergence not guaranteed: |phi'(x0)| = {:.4} >= 1",
                slope
            ),
            NumError::MaxIterations(limit) => {
                write!(f, "no convergence within {} iterations", limit)
            }
            NumError::NotDifferentiable(name) => {
                write!(f, "'{}' is not differentiable", name)
            }
            NumError::SingularMatrix => {
                write!(f, "matrix is singular, system has no unique solution")
            }
            NumError::ZeroDiagonal(row) => {
                write!(f, "zero diagonal element at row {}", row)
            }
            NumError::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
            NumError::NotEnoughPoints => write!(f, "not enough data points"),
            NumError::DuplicateNodes => write!(f, "interpolation nodes must be distinct"),
        }
    }
}

impl Error for NumError {}
