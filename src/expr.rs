//! Expression trees: evaluation against variable bindings and symbolic
//! differentiation. Expressions are produced by [`crate::parser::parse`]
//! and are a closed AST over a fixed function set; there is no dynamic
//! code path anywhere in evaluation.

use crate::error::NumError;
use std::fmt;

/// Built-in functions permitted in expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
}

impl MathFn {
    /// Look a function up by the name it is written with. `log` means the
    /// natural logarithm, matching the evaluator the originals exposed.
    pub fn from_name(name: &str) -> Option<MathFn> {
        match name {
            "sin" => Some(MathFn::Sin),
            "cos" => Some(MathFn::Cos),
            "tan" => Some(MathFn::Tan),
            "asin" | "arcsin" => Some(MathFn::Asin),
            "acos" | "arccos" => Some(MathFn::Acos),
            "atan" | "arctan" => Some(MathFn::Atan),
            "sinh" => Some(MathFn::Sinh),
            "cosh" => Some(MathFn::Cosh),
            "tanh" => Some(MathFn::Tanh),
            "exp" => Some(MathFn::Exp),
            "ln" | "log" => Some(MathFn::Ln),
            "log10" => Some(MathFn::Log10),
            "sqrt" => Some(MathFn::Sqrt),
            "abs" => Some(MathFn::Abs),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MathFn::Sin => "sin",
            MathFn::Cos => "cos",
            MathFn::Tan => "tan",
            MathFn::Asin => "asin",
            MathFn::Acos => "acos",
            MathFn::Atan => "atan",
            MathFn::Sinh => "sinh",
            MathFn::Cosh => "cosh",
            MathFn::Tanh => "tanh",
            MathFn::Exp => "exp",
            MathFn::Ln => "ln",
            MathFn::Log10 => "log10",
            MathFn::Sqrt => "sqrt",
            MathFn::Abs => "abs",
        }
    }

    fn apply(self, x: f64) -> Result<f64, NumError> {
        let value = match self {
            MathFn::Sin => x.sin(),
            MathFn::Cos => x.cos(),
            MathFn::Tan => x.tan(),
            MathFn::Asin | MathFn::Acos => {
                if x < -1.0 || x > 1.0 {
                    return Err(NumError::EvalFailure(format!(
                        "{} of {} outside [-1, 1]",
                        self.name(),
                        x
                    )));
                }
                if self == MathFn::Asin {
                    x.asin()
                } else {
                    x.acos()
                }
            }
            MathFn::Atan => x.atan(),
            MathFn::Sinh => x.sinh(),
            MathFn::Cosh => x.cosh(),
            MathFn::Tanh => x.tanh(),
            MathFn::Exp => x.exp(),
            MathFn::Ln | MathFn::Log10 => {
                if x <= 0.0 {
                    return Err(NumError::EvalFailure(format!(
                        "{} of non-positive value {}",
                        self.name(),
                        x
                    )));
                }
                if self == MathFn::Ln {
                    x.ln()
                } else {
                    x.log10()
                }
            }
            MathFn::Sqrt => {
                if x < 0.0 {
                    return Err(NumError::EvalFailure(format!(
                        "sqrt of negative value {}",
                        x
                    )));
                }
                x.sqrt()
            }
            MathFn::Abs => x.abs(),
        };
        finite(value, self.name())
    }
}

/// A parsed mathematical expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(MathFn, Box<Expr>),
}

/// Variable bindings for expression evaluation. A plain name/value list;
/// the handful of variables an expression uses never justifies a map.
#[derive(Clone, Debug, Default)]
pub struct Context {
    vars: Vec<(String, f64)>,
}

impl Context {
    pub fn new() -> Context {
        Context { vars: Vec::new() }
    }

    /// Bind `name` to `value`, replacing any existing binding.
    pub fn set(&mut self, name: &str, value: f64) -> &mut Context {
        if let Some(slot) = self.vars.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.vars.push((name.to_string(), value));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

fn finite(value: f64, what: &str) -> Result<f64, NumError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumError::EvalFailure(format!(
            "{} produced a non-finite value",
            what
        )))
    }
}

impl Expr {
    /// Evaluate against the given bindings. Domain violations (division by
    /// zero, `ln` of a non-positive value, ...) are reported as errors
    /// rather than silently becoming NaN.
    pub fn eval(&self, ctx: &Context) -> Result<f64, NumError> {
        match self {
            Expr::Num(v) => Ok(*v),
            Expr::Var(name) => ctx
                .get(name)
                .ok_or_else(|| NumError::UnknownVariable(name.clone())),
            Expr::Neg(u) => Ok(-u.eval(ctx)?),
            Expr::Add(u, v) => finite(u.eval(ctx)? + v.eval(ctx)?, "addition"),
            Expr::Sub(u, v) => finite(u.eval(ctx)? - v.eval(ctx)?, "subtraction"),
            Expr::Mul(u, v) => finite(u.eval(ctx)? * v.eval(ctx)?, "multiplication"),
            Expr::Div(u, v) => {
                let denom = v.eval(ctx)?;
                if denom == 0.0 {
                    return Err(NumError::EvalFailure("division by zero".to_string()));
                }
                finite(u.eval(ctx)? / denom, "division")
            }
            Expr::Pow(u, v) => {
                let base = u.eval(ctx)?;
                let exp = v.eval(ctx)?;
                finite(base.powf(exp), "power")
            }
            Expr::Func(func, u) => func.apply(u.eval(ctx)?),
        }
    }

    /// Evaluate with a single variable bound to `x`.
    pub fn eval_at(&self, var: &str, x: f64) -> Result<f64, NumError> {
        let mut ctx = Context::new();
        ctx.set(var, x);
        self.eval(&ctx)
    }

    /// Evaluate at each point of `xs`, reusing one binding.
    pub fn eval_many(&self, var: &str, xs: &[f64]) -> Result<Vec<f64>, NumError> {
        let mut ctx = Context::new();
        let mut out = Vec::with_capacity(xs.len());
        for &x in xs {
            ctx.set(var, x);
            out.push(self.eval(&ctx)?);
        }
        Ok(out)
    }

    /// Symbolic derivative with respect to `var`.
    pub fn diff(&self, var: &str) -> Result<Expr, NumError> {
        match self {
            Expr::Num(_) => Ok(Expr::Num(0.0)),
            Expr::Var(name) => Ok(Expr::Num(if name == var { 1.0 } else { 0.0 })),
            Expr::Neg(u) => Ok(neg(u.diff(var)?)),
            Expr::Add(u, v) => Ok(add(u.diff(var)?, v.diff(var)?)),
            Expr::Sub(u, v) => Ok(sub(u.diff(var)?, v.diff(var)?)),
            Expr::Mul(u, v) => Ok(add(
                mul(u.diff(var)?, (**v).clone()),
                mul((**u).clone(), v.diff(var)?),
            )),
            Expr::Div(u, v) => Ok(div(
                sub(
                    mul(u.diff(var)?, (**v).clone()),
                    mul((**u).clone(), v.diff(var)?),
                ),
                pow((**v).clone(), Expr::Num(2.0)),
            )),
            Expr::Pow(u, v) => {
                let du = u.diff(var)?;
                if let Expr::Num(c) = **v {
                    // d/dx u^c = c * u^(c-1) * u'
                    Ok(mul(
                        mul(Expr::Num(c), pow((**u).clone(), Expr::Num(c - 1.0))),
                        du,
                    ))
                } else {
                    // u^v * (v' ln u + v u' / u)
                    let dv = v.diff(var)?;
                    Ok(mul(
                        pow((**u).clone(), (**v).clone()),
                        add(
                            mul(dv, Expr::Func(MathFn::Ln, u.clone())),
                            div(mul((**v).clone(), du), (**u).clone()),
                        ),
                    ))
                }
            }
            Expr::Func(func, u) => {
                let du = u.diff(var)?;
                let inner = (**u).clone();
                let outer = match func {
                    MathFn::Sin => Expr::Func(MathFn::Cos, u.clone()),
                    MathFn::Cos => neg(Expr::Func(MathFn::Sin, u.clone())),
                    MathFn::Tan => div(
                        Expr::Num(1.0),
                        pow(Expr::Func(MathFn::Cos, u.clone()), Expr::Num(2.0)),
                    ),
                    MathFn::Asin => div(
                        Expr::Num(1.0),
                        Expr::Func(
                            MathFn::Sqrt,
                            Box::new(sub(
                                Expr::Num(1.0),
                                pow(inner.clone(), Expr::Num(2.0)),
                            )),
                        ),
                    ),
                    MathFn::Acos => neg(div(
                        Expr::Num(1.0),
                        Expr::Func(
                            MathFn::Sqrt,
                            Box::new(sub(
                                Expr::Num(1.0),
                                pow(inner.clone(), Expr::Num(2.0)),
                            )),
                        ),
                    )),
                    MathFn::Atan => div(
                        Expr::Num(1.0),
                        add(Expr::Num(1.0), pow(inner.clone(), Expr::Num(2.0))),
                    ),
                    MathFn::Sinh => Expr::Func(MathFn::Cosh, u.clone()),
                    MathFn::Cosh => Expr::Func(MathFn::Sinh, u.clone()),
                    MathFn::Tanh => div(
                        Expr::Num(1.0),
                        pow(Expr::Func(MathFn::Cosh, u.clone()), Expr::Num(2.0)),
                    ),
                    MathFn::Exp => Expr::Func(MathFn::Exp, u.clone()),
                    MathFn::Ln => div(Expr::Num(1.0), inner.clone()),
                    MathFn::Log10 => div(
                        Expr::Num(1.0),
                        mul(inner.clone(), Expr::Num(std::f64::consts::LN_10)),
                    ),
                    MathFn::Sqrt => div(
                        Expr::Num(1.0),
                        mul(Expr::Num(2.0), Expr::Func(MathFn::Sqrt, u.clone())),
                    ),
                    MathFn::Abs => return Err(NumError::NotDifferentiable("abs")),
                };
                Ok(mul(outer, du))
            }
        }
    }
}

// Smart constructors used by `diff` so derivative trees stay readable:
// they fold the zeros and ones the product/chain rules generate.

fn neg(u: Expr) -> Expr {
    match u {
        Expr::Num(v) => Expr::Num(-v),
        Expr::Neg(inner) => *inner,
        other => Expr::Neg(Box::new(other)),
    }
}

fn add(u: Expr, v: Expr) -> Expr {
    match (u, v) {
        (Expr::Num(a), Expr::Num(b)) => Expr::Num(a + b),
        (Expr::Num(a), v) if a == 0.0 => v,
        (u, Expr::Num(b)) if b == 0.0 => u,
        (u, v) => Expr::Add(Box::new(u), Box::new(v)),
    }
}

fn sub(u: Expr, v: Expr) -> Expr {
    match (u, v) {
        (Expr::Num(a), Expr::Num(b)) => Expr::Num(a - b),
        (u, Expr::Num(b)) if b == 0.0 => u,
        (Expr::Num(a), v) if a == 0.0 => neg(v),
        (u, v) => Expr::Sub(Box::new(u), Box::new(v)),
    }
}

fn mul(u: Expr, v: Expr) -> Expr {
    match (u, v) {
        (Expr::Num(a), Expr::Num(b)) => Expr::Num(a * b),
        (Expr::Num(a), _) if a == 0.0 => Expr::Num(0.0),
        (_, Expr::Num(b)) if b == 0.0 => Expr::Num(0.0),
        (Expr::Num(a), v) if a == 1.0 => v,
        (u, Expr::Num(b)) if b == 1.0 => u,
        (u, v) => Expr::Mul(Box::new(u), Box::new(v)),
    }
}

fn div(u: Expr, v: Expr) -> Expr {
    match (u, v) {
        (Expr::Num(a), _) if a == 0.0 => Expr::Num(0.0),
        (u, Expr::Num(b)) if b == 1.0 => u,
        (u, v) => Expr::Div(Box::new(u), Box::new(v)),
    }
}

fn pow(u: Expr, v: Expr) -> Expr {
    match (u, v) {
        (_, Expr::Num(b)) if b == 0.0 => Expr::Num(1.0),
        (u, Expr::Num(b)) if b == 1.0 => u,
        (u, v) => Expr::Pow(Box::new(u), Box::new(v)),
    }
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Neg(..) => 3,
            Expr::Pow(..) => 4,
            Expr::Num(_) | Expr::Var(_) | Expr::Func(..) => 5,
        }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter, min: u8) -> fmt::Result {
        let prec = self.precedence();
        if prec < min {
            write!(f, "(")?;
        }
        match self {
            Expr::Num(v) => write!(f, "{}", v)?,
            Expr::Var(name) => write!(f, "{}", name)?,
            Expr::Neg(u) => {
                write!(f, "-")?;
                u.fmt_prec(f, prec + 1)?;
            }
            Expr::Add(u, v) => {
                u.fmt_prec(f, prec)?;
                write!(f, " + ")?;
                v.fmt_prec(f, prec)?;
            }
            Expr::Sub(u, v) => {
                u.fmt_prec(f, prec)?;
                write!(f, " - ")?;
                v.fmt_prec(f, prec + 1)?;
            }
            Expr::Mul(u, v) => {
                u.fmt_prec(f, prec)?;
                write!(f, "*")?;
                v.fmt_prec(f, prec)?;
            }
            Expr::Div(u, v) => {
                u.fmt_prec(f, prec)?;
                write!(f, "/")?;
                v.fmt_prec(f, prec + 1)?;
            }
            Expr::Pow(u, v) => {
                u.fmt_prec(f, prec + 1)?;
                write!(f, "^")?;
                v.fmt_prec(f, prec)?;
            }
            Expr::Func(func, u) => {
                write!(f, "{}(", func.name())?;
                u.fmt_prec(f, 0)?;
                write!(f, ")")?;
            }
        }
        if prec < min {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}
