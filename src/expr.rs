//! Expression tree for two-variable mathematical formulas.
//!
//! This module defines the small arithmetic AST the crate interprets when
//! sampling a formula over a grid. The tree is deliberately closed: its
//! leaves are constants and the two coordinate variables, and its interior
//! nodes are plain arithmetic plus a fixed set of transcendental functions.
//! There is no call mechanism, no name lookup at evaluation time, and no
//! control flow, which is what makes evaluating user-supplied text safe.
//!
//! The expression tree is built recursively using `Box<Expr>` and can be:
//! - Evaluated at a coordinate pair with [`Expr::eval`]
//! - Folded ahead of time with [`Expr::fold_constants`]
//!
//! # Evaluation semantics
//! Evaluation is total over all finite and non-finite inputs: division by
//! zero, `log` of a negative number, etc. yield IEEE `NaN`/`Infinity` values
//! rather than errors. Evaluating the same tree at the same point twice
//! yields bit-identical results.

/// The two coordinate variables an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coord {
    X,
    Y,
}

/// An expression tree node representing mathematical operations.
///
/// Exponentiation is split three ways, mirroring how the parser sees it:
/// an integer-constant exponent compiles to [`Expr::Pow`] (evaluated with
/// `powi`), a float constant to [`Expr::PowFloat`], and anything else to
/// the general [`Expr::PowExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant floating point value
    Const(f64),
    /// One of the two coordinate variables
    Var(Coord),
    /// Addition of two expressions
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction of two expressions
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication of two expressions
    Mul(Box<Expr>, Box<Expr>),
    /// Division of two expressions
    Div(Box<Expr>, Box<Expr>),
    /// Negation of an expression
    Neg(Box<Expr>),
    /// Absolute value of an expression
    Abs(Box<Expr>),
    /// Exponentiation of an expression by an integer constant
    Pow(Box<Expr>, i64),
    /// Exponentiation of an expression by a floating point constant
    PowFloat(Box<Expr>, f64),
    /// Exponentiation of an expression by another expression
    PowExpr(Box<Expr>, Box<Expr>),
    /// Exponential function of an expression
    Exp(Box<Expr>),
    /// Natural logarithm of an expression
    Ln(Box<Expr>),
    /// Square root of an expression
    Sqrt(Box<Expr>),
    /// Sine of an expression (argument in radians)
    Sin(Box<Expr>),
    /// Cosine of an expression (argument in radians)
    Cos(Box<Expr>),
    /// Tangent of an expression (argument in radians)
    Tan(Box<Expr>),
}

// `powi` takes an i32; exponents outside its range would otherwise be
// silently truncated (x^4294967297 evaluating as x^1)
fn pow_int(base: f64, exp: i64) -> f64 {
    match i32::try_from(exp) {
        Ok(exp) => base.powi(exp),
        Err(_) => base.powf(exp as f64),
    }
}

impl Expr {
    /// Evaluates the expression at the coordinate pair `(x, y)`.
    ///
    /// Pure and total: non-finite intermediate values propagate through
    /// the usual IEEE 754 rules instead of raising errors.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Var(Coord::X) => x,
            Expr::Var(Coord::Y) => y,
            Expr::Add(l, r) => l.eval(x, y) + r.eval(x, y),
            Expr::Sub(l, r) => l.eval(x, y) - r.eval(x, y),
            Expr::Mul(l, r) => l.eval(x, y) * r.eval(x, y),
            Expr::Div(l, r) => l.eval(x, y) / r.eval(x, y),
            Expr::Neg(e) => -e.eval(x, y),
            Expr::Abs(e) => e.eval(x, y).abs(),
            Expr::Pow(base, exp) => pow_int(base.eval(x, y), *exp),
            Expr::PowFloat(base, exp) => base.eval(x, y).powf(*exp),
            Expr::PowExpr(base, exp) => base.eval(x, y).powf(exp.eval(x, y)),
            Expr::Exp(e) => e.eval(x, y).exp(),
            Expr::Ln(e) => e.eval(x, y).ln(),
            Expr::Sqrt(e) => e.eval(x, y).sqrt(),
            Expr::Sin(e) => e.eval(x, y).sin(),
            Expr::Cos(e) => e.eval(x, y).cos(),
            Expr::Tan(e) => e.eval(x, y).tan(),
        }
    }

    /// Folds constant subtrees into single `Const` nodes.
    ///
    /// Applied once when a formula is compiled so that grid evaluation does
    /// not recompute subexpressions like `2*pi` at every point. Folding uses
    /// the same operations as [`Expr::eval`], so it never changes results.
    pub fn fold_constants(&self) -> Expr {
        fn fold2(
            l: &Expr,
            r: &Expr,
            rebuild: impl Fn(Box<Expr>, Box<Expr>) -> Expr,
        ) -> Expr {
            let l = l.fold_constants();
            let r = r.fold_constants();
            let folded = rebuild(Box::new(l), Box::new(r));
            match &folded {
                Expr::Add(a, b) => {
                    if let (Expr::Const(a), Expr::Const(b)) = (a.as_ref(), b.as_ref()) {
                        return Expr::Const(a + b);
                    }
                }
                Expr::Sub(a, b) => {
                    if let (Expr::Const(a), Expr::Const(b)) = (a.as_ref(), b.as_ref()) {
                        return Expr::Const(a - b);
                    }
                }
                Expr::Mul(a, b) => {
                    if let (Expr::Const(a), Expr::Const(b)) = (a.as_ref(), b.as_ref()) {
                        return Expr::Const(a * b);
                    }
                }
                Expr::Div(a, b) => {
                    if let (Expr::Const(a), Expr::Const(b)) = (a.as_ref(), b.as_ref()) {
                        return Expr::Const(a / b);
                    }
                }
                Expr::PowExpr(a, b) => {
                    if let (Expr::Const(a), Expr::Const(b)) = (a.as_ref(), b.as_ref()) {
                        return Expr::Const(a.powf(*b));
                    }
                }
                _ => {}
            }
            folded
        }

        fn fold1(e: &Expr, rebuild: impl Fn(Box<Expr>) -> Expr, apply: impl Fn(f64) -> f64) -> Expr {
            let e = e.fold_constants();
            if let Expr::Const(c) = e {
                Expr::Const(apply(c))
            } else {
                rebuild(Box::new(e))
            }
        }

        match self {
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Add(l, r) => fold2(l, r, Expr::Add),
            Expr::Sub(l, r) => fold2(l, r, Expr::Sub),
            Expr::Mul(l, r) => fold2(l, r, Expr::Mul),
            Expr::Div(l, r) => fold2(l, r, Expr::Div),
            Expr::PowExpr(l, r) => fold2(l, r, Expr::PowExpr),
            Expr::Neg(e) => fold1(e, Expr::Neg, |c| -c),
            Expr::Abs(e) => fold1(e, Expr::Abs, f64::abs),
            Expr::Exp(e) => fold1(e, Expr::Exp, f64::exp),
            Expr::Ln(e) => fold1(e, Expr::Ln, f64::ln),
            Expr::Sqrt(e) => fold1(e, Expr::Sqrt, f64::sqrt),
            Expr::Sin(e) => fold1(e, Expr::Sin, f64::sin),
            Expr::Cos(e) => fold1(e, Expr::Cos, f64::cos),
            Expr::Tan(e) => fold1(e, Expr::Tan, f64::tan),
            Expr::Pow(base, exp) => {
                let b = base.fold_constants();
                if let Expr::Const(c) = b {
                    Expr::Const(pow_int(c, *exp))
                } else {
                    Expr::Pow(Box::new(b), *exp)
                }
            }
            Expr::PowFloat(base, exp) => {
                let b = base.fold_constants();
                if let Expr::Const(c) = b {
                    Expr::Const(c.powf(*exp))
                } else {
                    Expr::PowFloat(Box::new(b), *exp)
                }
            }
        }
    }
}
