//! Turns a string equation into a symbolic expression.
//!
//! Grammar (whitespace allowed between tokens):
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | '+' unary | power
//! power   := atom ('^' unary)?            right associative, `**` is accepted too
//! atom    := number | name '(' expr ')' | name | '(' expr ')'
//! ```
//! Known functions: `sin`, `cos`, `tan`/`tg`, `exp`, `ln`/`log`, `sqrt`.
//! Named constants: `pi`, `e` (`e^x` becomes `exp(x)`).
//!
//!# Example
//! ```
//! use RustedRoots::symbolic::symbolic_engine::Expr;
//! let parsed = Expr::parse_equation("x^2 = 5").unwrap();
//! let f = parsed.lambdify1D("x").unwrap();
//! assert_eq!(f(3.0), 4.0);
//! ```
use crate::symbolic::symbolic_engine::{Expr, ExprError};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{all_consuming, map, map_opt, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded},
};
use std::f64::consts::{E, PI};

/// single character token surrounded by optional whitespace
fn symbol<'a>(c: char) -> impl Parser<&'a str, Output = char, Error = NomError<&'a str>> {
    delimited(multispace0, char(c), multispace0)
}

fn operator<'a>(ops: &'static str) -> impl Parser<&'a str, Output = char, Error = NomError<&'a str>> {
    delimited(multispace0, one_of(ops), multispace0)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let mut tail = many0(pair(operator("+-"), term));
    let (input, rest) = tail.parse(input)?;
    let folded = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, folded))
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let mut tail = many0(pair(operator("*/"), unary));
    let (input, rest) = tail.parse(input)?;
    let folded = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, folded))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    let mut parser = alt((
        map(preceded(symbol('-'), unary), |e: Expr| -e),
        preceded(symbol('+'), unary),
        power,
    ));
    parser.parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    let mut exponent = opt(preceded(symbol('^'), unary));
    let (input, exponent) = exponent.parse(input)?;
    let expr = match exponent {
        None => base,
        Some(exponent) if base == Expr::Const(E) => Expr::Exp(exponent.boxed()),
        Some(exponent) => Expr::Pow(base.boxed(), exponent.boxed()),
    };
    Ok((input, expr))
}

fn atom(input: &str) -> IResult<&str, Expr> {
    let mut parser = delimited(
        multispace0,
        alt((number, call_or_name, parenthesized)),
        multispace0,
    );
    parser.parse(input)
}

/// plain decimal literals only, `inf` and `nan` are not numbers here
fn number(input: &str) -> IResult<&str, Expr> {
    let finite_literal = |text: &str| text.parse::<f64>().ok().filter(|v| v.is_finite());
    map(map_opt(recognize_float, finite_literal), Expr::Const).parse(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(symbol('('), expr, symbol(')')).parse(input)
}

/// identifiers: letters, digits and underscores, not starting with a digit
fn identifier(input: &str) -> IResult<&str, &str> {
    let mut parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    parser.parse(input)
}

fn call_or_name(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let mut argument = opt(delimited(symbol('('), expr, symbol(')')));
    let (rest, argument) = argument.parse(rest)?;
    match argument {
        Some(argument) => match apply_function(name, argument) {
            Some(call) => Ok((rest, call)),
            // Verify marks "known syntax, unknown function" for describe_failure
            None => Err(nom::Err::Failure(NomError::new(input, ErrorKind::Verify))),
        },
        None if is_reserved(name) => Err(nom::Err::Failure(NomError::new(input, ErrorKind::Not))),
        None => Ok((rest, named_value(name))),
    }
}

const FUNCTIONS: [&str; 8] = ["sin", "cos", "tan", "tg", "exp", "ln", "log", "sqrt"];
const NON_FINITE: [&str; 3] = ["inf", "infinity", "nan"];

/// names that can never stand for a value on their own
fn is_reserved(name: &str) -> bool {
    FUNCTIONS.contains(&name) || NON_FINITE.contains(&name.to_lowercase().as_str())
}

fn apply_function(name: &str, argument: Expr) -> Option<Expr> {
    let call = match name {
        "sin" => Expr::sin(argument.boxed()),
        "cos" => Expr::cos(argument.boxed()),
        "tan" | "tg" => Expr::tg(argument.boxed()),
        "exp" => Expr::Exp(argument.boxed()),
        "ln" | "log" => Expr::Ln(argument.boxed()),
        "sqrt" => Expr::Pow(argument.boxed(), Expr::Const(0.5).boxed()),
        _ => return None,
    };
    Some(call)
}

fn named_value(name: &str) -> Expr {
    match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    }
}

fn describe_failure(input: &str, error: NomError<&str>) -> ExprError {
    if error.code == ErrorKind::Verify {
        let name: String = error
            .input
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        return ExprError::UnknownFunction { name };
    }
    let rest = error.input.trim();
    let reason = if error.code == ErrorKind::Not {
        let name: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if FUNCTIONS.contains(&name.as_str()) {
            format!("function '{}' needs an argument in parentheses", name)
        } else {
            format!("'{}' is not a finite number", name)
        }
    } else if rest.is_empty() {
        "unexpected end of input".to_string()
    } else {
        format!("unexpected input at '{}'", rest)
    };
    ExprError::Syntax {
        input: input.to_string(),
        reason,
    }
}

/// Brings an equation to the form `expr = 0` and returns `expr` as a string.
///
/// `"x^2 - 5 = 0"` gives `"x^2 - 5"`, `"x^2 = 5"` gives `"(x^2) - (5)"`,
/// a string without `=` is returned trimmed.
pub fn normalize_equation(equation: &str) -> Result<String, ExprError> {
    let malformed = |reason: &'static str| ExprError::MalformedEquation {
        input: equation.to_string(),
        reason,
    };
    let sides: Vec<&str> = equation.split('=').map(str::trim).collect();
    match sides.as_slice() {
        [expr] => Ok(expr.to_string()),
        [lhs, rhs] => {
            if lhs.is_empty() || rhs.is_empty() {
                return Err(malformed("one side of '=' is empty"));
            }
            if rhs.parse::<f64>() == Ok(0.0) {
                Ok(lhs.to_string())
            } else {
                Ok(format!("({}) - ({})", lhs, rhs))
            }
        }
        _ => Err(malformed("more than one '=' sign")),
    }
}

impl Expr {
    /// Parses an infix expression such as `"sin(x) - x/2"`.
    pub fn parse_expression(input: &str) -> Result<Expr, ExprError> {
        let prepared = input.replace("**", "^");
        let mut parser = all_consuming(delimited(multispace0, expr, multispace0));
        match parser.parse(prepared.as_str()) {
            Ok((_, parsed)) => Ok(parsed),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err(describe_failure(&prepared, e))
            }
            Err(nom::Err::Incomplete(_)) => Err(ExprError::Syntax {
                input: prepared.clone(),
                reason: "incomplete input".to_string(),
            }),
        }
    }

    /// Parses an equation (`lhs = rhs`, `expr = 0` or a bare `expr`) into the expression
    /// whose zero is sought.
    pub fn parse_equation(equation: &str) -> Result<Expr, ExprError> {
        let normalized = normalize_equation(equation)?;
        Expr::parse_expression(&normalized)
    }
}
