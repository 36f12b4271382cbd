//! Convenience re-exports of the crate's public surface.

pub use crate::deriv::{central_difference, derivative_check, DerivativeCheck};
pub use crate::error::NumError;
pub use crate::expr::{Context, Expr, MathFn};
pub use crate::interp::{lagrange_value, LagrangeInterpolant};
pub use crate::iterative::{gauss_seidel, jacobi};
pub use crate::linear::{determinant, invert, solve_cramer, solve_gauss, solve_inverse};
pub use crate::nonlinear::{fixed_point_system, IterationScheme, NonlinearSystem};
pub use crate::parser::parse;
pub use crate::polyfit::{mae, mse, polyfit, Polynomial};
pub use crate::quad::{
    gauss_legendre, integrate_all, integrate_expr, integrate_expression, rectangle_left,
    rectangle_mid, rectangle_right, simpson, trapezoid, MAX_GAUSS_DEGREE,
};
pub use crate::result::{QuadratureReport, RootResult, VectorSolution};
pub use crate::roots::{bisection, chord, fixed_point, newton, newton_symbolic};
