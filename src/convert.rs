//! Conversion module for transforming evalexpr AST nodes into the crate's
//! expression representation.
//!
//! This is the allow-list boundary of the crate. The evalexpr parser accepts
//! a much richer language than a two-variable formula needs — assignments,
//! chains, tuples, comparisons, arbitrary identifiers — and everything
//! outside plain arithmetic over `x` and `y` is rejected here, at conversion
//! time, before anything is ever evaluated. Rejection happens by
//! construction: only the listed operators and names have a translation into
//! [`Expr`], so there is no dynamic facility left for an expression to reach.
//!
//! The main entry point is [`build_ast`], which recursively traverses the
//! evalexpr operator tree and builds up the arithmetic expression tree.

use crate::{
    errors::InvalidExpressionError,
    expr::{Coord, Expr},
};
use evalexpr::{Node, Operator, Value};

/// Functions an expression may call, with their evaluation targets.
///
/// `log` binds to the natural logarithm (`ln` is accepted as an alias),
/// matching the usual convention of numerical libraries.
const ALLOWED_FUNCTIONS: &[&str] = &["sin", "cos", "tan", "exp", "log", "ln", "sqrt", "abs"];

/// Converts an evalexpr AST node into the crate's expression representation.
///
/// Recursively traverses the operator tree, mapping arithmetic operators,
/// numeric constants, the variables `x`/`y`, the constants `pi`/`e`, and the
/// allow-listed functions. Any other construct yields an
/// [`InvalidExpressionError`].
///
/// # Examples of supported operations
/// * Basic arithmetic: `+`, `-`, `*`, `/`, unary negation
/// * Exponentiation: `x^2` (integer), `x^0.5` (float), `x^y` (general)
/// * Functions: `sin`, `cos`, `tan`, `exp`, `log`/`ln`, `sqrt`, `abs`
/// * Constants: numeric literals, `pi`, `e`
pub fn build_ast(node: &Node) -> Result<Expr, InvalidExpressionError> {
    match node.operator() {
        // Addition operator - combines multiple children into a series of binary Add expressions
        Operator::Add => {
            let children = node.children();
            children
                .iter()
                .skip(1)
                .try_fold(build_ast(&children[0])?, |acc, child| {
                    Ok(Expr::Add(Box::new(acc), Box::new(build_ast(child)?)))
                })
        }
        // Multiplication operator - combines multiple children into a series of binary Mul expressions
        Operator::Mul => {
            let children = node.children();
            children.iter().skip(1).try_fold(
                build_ast(&children[0])?,
                |acc, child| -> Result<Expr, InvalidExpressionError> {
                    Ok(Expr::Mul(Box::new(acc), Box::new(build_ast(child)?)))
                },
            )
        }
        // Subtraction operator - creates a binary Sub expression
        Operator::Sub => {
            let children = node.children();
            Ok(Expr::Sub(
                Box::new(build_ast(&children[0])?),
                Box::new(build_ast(&children[1])?),
            ))
        }
        // Division operator - creates a binary Div expression
        Operator::Div => {
            let children = node.children();
            Ok(Expr::Div(
                Box::new(build_ast(&children[0])?),
                Box::new(build_ast(&children[1])?),
            ))
        }
        // Negation operator - creates a Neg expression
        Operator::Neg => {
            let children = node.children();
            Ok(Expr::Neg(Box::new(build_ast(&children[0])?)))
        }
        // Constant value - must be numeric
        Operator::Const { value } => match value {
            Value::Float(f) => Ok(Expr::Const(*f)),
            Value::Int(i) => Ok(Expr::Const(*i as f64)),
            _ => Err(InvalidExpressionError::UnsupportedOperator(format!(
                "non-numeric constant: {:?}",
                value
            ))),
        },
        // Variable reference - only the grid variables and math constants resolve
        Operator::VariableIdentifierRead { identifier } => match identifier.as_str() {
            "x" => Ok(Expr::Var(Coord::X)),
            "y" => Ok(Expr::Var(Coord::Y)),
            "pi" => Ok(Expr::Const(std::f64::consts::PI)),
            "e" => Ok(Expr::Const(std::f64::consts::E)),
            other => Err(InvalidExpressionError::UnknownIdentifier(other.to_string())),
        },
        // Function call - single argument, allow-listed name
        Operator::FunctionIdentifier { identifier } => {
            let children = node.children();
            let name = identifier.as_str();
            if !ALLOWED_FUNCTIONS.contains(&name) {
                return Err(InvalidExpressionError::UnknownFunction(name.to_string()));
            }
            // evalexpr wraps multiple arguments in a single Tuple child
            if let Operator::Tuple = children[0].operator() {
                return Err(InvalidExpressionError::WrongArity {
                    name: name.to_string(),
                    expected: 1,
                    got: children[0].children().len(),
                });
            }
            let arg = Box::new(build_ast(&children[0])?);
            Ok(match name {
                "sin" => Expr::Sin(arg),
                "cos" => Expr::Cos(arg),
                "tan" => Expr::Tan(arg),
                "exp" => Expr::Exp(arg),
                "log" | "ln" => Expr::Ln(arg),
                "sqrt" => Expr::Sqrt(arg),
                "abs" => Expr::Abs(arg),
                _ => unreachable!("name checked against ALLOWED_FUNCTIONS"),
            })
        }
        // Root node - must hold exactly one expression (no chains, no statements)
        Operator::RootNode => {
            let children = node.children();
            if children.len() == 1 {
                build_ast(&children[0])
            } else {
                Err(InvalidExpressionError::MultipleExpressions(children.len()))
            }
        }
        // Exponentiation - integer and float constant exponents get dedicated
        // nodes, anything else falls back to the general form
        Operator::Exp => {
            let children = node.children();
            if let Operator::Const { value } = children[1].operator() {
                match value {
                    Value::Int(exp) => {
                        return Ok(Expr::Pow(Box::new(build_ast(&children[0])?), *exp))
                    }
                    Value::Float(exp) => {
                        return Ok(Expr::PowFloat(Box::new(build_ast(&children[0])?), *exp))
                    }
                    _ => {}
                }
            }
            Ok(Expr::PowExpr(
                Box::new(build_ast(&children[0])?),
                Box::new(build_ast(&children[1])?),
            ))
        }
        // Any other operator (assignment, chain, tuple, comparison, ...) is unsupported
        other => Err(InvalidExpressionError::UnsupportedOperator(format!(
            "{:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evalexpr::build_operator_tree;

    fn convert(src: &str) -> Result<Expr, InvalidExpressionError> {
        let node = build_operator_tree(src)?;
        build_ast(&node)
    }

    #[test]
    fn test_converts_arithmetic() {
        let expr = convert("2*x + y^2").unwrap();
        assert_eq!(expr.eval(1.0, 2.0), 6.0);
    }

    #[test]
    fn test_converts_functions_and_constants() {
        let expr = convert("sin(pi*x) * exp(-y)").unwrap();
        let (x, y) = (0.25, 1.5);
        assert_eq!(
            expr.eval(x, y),
            (std::f64::consts::PI * x).sin() * (-y).exp()
        );
    }

    #[test]
    fn test_log_is_natural_logarithm() {
        let expr = convert("log(x)").unwrap();
        assert_eq!(expr.eval(std::f64::consts::E, 0.0), 1.0);
        let ln = convert("ln(x)").unwrap();
        assert_eq!(ln.eval(2.0, 0.0), 2.0_f64.ln());
    }

    #[test]
    fn test_rejects_unknown_identifier() {
        let err = convert("x + z").unwrap_err();
        assert!(matches!(err, InvalidExpressionError::UnknownIdentifier(ref s) if s == "z"));
    }

    #[test]
    fn test_rejects_unknown_function() {
        let err = convert("system(x)").unwrap_err();
        assert!(matches!(err, InvalidExpressionError::UnknownFunction(ref s) if s == "system"));
    }

    #[test]
    fn test_rejects_assignment_and_chains() {
        assert!(convert("x = 1").is_err());
        assert!(convert("x; y").is_err());
    }

    #[test]
    fn test_rejects_wrong_arity() {
        let err = convert("sin(x, y)").unwrap_err();
        assert!(matches!(
            err,
            InvalidExpressionError::WrongArity { expected: 1, got: 2, .. }
        ));
    }

    #[test]
    fn test_float_exponent() {
        let expr = convert("x^0.5").unwrap();
        assert_eq!(expr.eval(9.0, 0.0), 3.0);
    }
}
