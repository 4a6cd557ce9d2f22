use crate::symbolic::parse_expr::normalize_equation;
use crate::symbolic::symbolic_engine::{Expr, ExprError};
use std::f64;
//___________________________________TESTS____________________________________

mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval_const(input: &str) -> f64 {
        let f = Expr::parse_expression(input).unwrap().lambdify(&[]).unwrap();
        f(&[])
    }

    fn eval_x(input: &str, x: f64) -> f64 {
        let f = Expr::parse_expression(input).unwrap().lambdify1D("x").unwrap();
        f(x)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval_const("2 + 3 * 4"), 14.0);
        assert_eq!(eval_const("(2 + 3) * 4"), 20.0);
        assert_eq!(eval_const("8 / 4 / 2"), 1.0);
        assert_eq!(eval_const("10 - 4 - 3"), 3.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval_const("2^3^2"), 512.0);
        assert_eq!(eval_const("2**3"), 8.0);
        assert_eq!(eval_const("2^-1"), 0.5);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval_x("-x^2", 3.0), -9.0);
        assert_eq!(eval_x("-x + 1", 3.0), -2.0);
        assert_eq!(eval_x("2 * -x", 3.0), -6.0);
        assert_eq!(eval_const("--2"), 2.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_relative_eq!(
            eval_const("sqrt(4) + ln(e) + exp(0) + cos(0) + sin(0) + tan(0)"),
            5.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(eval_const("log(e) + tg(0)"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(eval_const("sin(pi / 2)"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(eval_const("1e-5 * 1e5"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_e_power_is_exp() {
        let parsed = Expr::parse_expression("e^x").unwrap();
        assert_eq!(parsed, Expr::Exp(Expr::Var("x".to_string()).boxed()));
        assert_relative_eq!(eval_x("e^x + x", 1.0), f64::consts::E + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        let parsed = Expr::parse_expression("x + 2").unwrap();
        assert_eq!(parsed.to_string(), "(x + 2)");
    }

    #[test]
    fn test_normalize_equation() {
        assert_eq!(normalize_equation("x^2 - 5 = 0").unwrap(), "x^2 - 5");
        assert_eq!(normalize_equation("x^2 = 5").unwrap(), "(x^2) - (5)");
        assert_eq!(normalize_equation("  sin(x) ").unwrap(), "sin(x)");
        assert!(matches!(
            normalize_equation("x = 1 = 2"),
            Err(ExprError::MalformedEquation { .. })
        ));
        assert!(matches!(
            normalize_equation(" = 3"),
            Err(ExprError::MalformedEquation { .. })
        ));
    }

    #[test]
    fn test_parse_equation_moves_rhs() {
        let f = Expr::parse_equation("x^2 = 5").unwrap().lambdify1D("x").unwrap();
        assert_eq!(f(3.0), 4.0);
        let g = Expr::parse_equation("x^2 + y^2 -1 = 0")
            .unwrap()
            .lambdify2D("x", "y")
            .unwrap();
        assert_eq!(g(1.0, 1.0), 1.0);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for bad in ["x +", "(x", "", "2x", "x y", "sin(", "*x", "1e999 + x"] {
            assert!(
                matches!(Expr::parse_expression(bad), Err(ExprError::Syntax { .. })),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_non_finite_literals_are_rejected() {
        for bad in ["x - inf", "nan*x", "x - infinity", "INF + x", "x - NaN = 0"] {
            match Expr::parse_equation(bad) {
                Err(ExprError::Syntax { reason, .. }) => {
                    assert!(reason.contains("not a finite number"), "{}: {}", bad, reason)
                }
                other => panic!("{} parsed as {:?}", bad, other),
            }
        }
        // names that merely start like the reserved words are ordinary variables
        assert_eq!(
            Expr::parse_expression("info").unwrap(),
            Expr::Var("info".to_string())
        );
    }

    #[test]
    fn test_function_name_without_argument() {
        for bad in ["exp + 1", "x - sin", "sqrt * x", "ln"] {
            match Expr::parse_expression(bad) {
                Err(ExprError::Syntax { reason, .. }) => {
                    assert!(reason.contains("needs an argument"), "{}: {}", bad, reason)
                }
                other => panic!("{} parsed as {:?}", bad, other),
            }
        }
        assert_relative_eq!(eval_const("exp(0) + sin (0)"), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            Expr::parse_expression("2 * foo(x)"),
            Err(ExprError::UnknownFunction {
                name: "foo".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_variable() {
        let expr = Expr::parse_expression("x + z").unwrap();
        match expr.lambdify1D("x") {
            Err(ExprError::UnknownVariable { name, allowed }) => {
                assert_eq!(name, "z");
                assert_eq!(allowed, vec!["x".to_string()]);
            }
            _ => panic!("z is not an allowed variable"),
        }
    }

    #[test]
    fn test_contains_variable() {
        let expr = Expr::parse_expression("y*x + sin(x)").unwrap();
        assert!(expr.contains_variable("x"));
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
    }

    #[test]
    fn test_simplified_derivative_of_square() {
        let df = Expr::parse_expression("x^2").unwrap().diff("x").simplify_();
        assert_eq!(
            df,
            Expr::Mul(Expr::Const(2.0).boxed(), Expr::Var("x".to_string()).boxed())
        );
        let constant = Expr::parse_expression("x^2 - 5").unwrap().diff("y").simplify_();
        assert_eq!(constant, Expr::Const(0.0));
    }

    #[test]
    fn test_derivatives_agree_with_central_differences() {
        let cases = [
            "x^2 - 5",
            "sin(x) - x/2",
            "e^x + x",
            "x^x",
            "tan(x) * ln(x)",
            "sqrt(x) / (1 + x^2)",
            "cos(x^2) - 2^x",
        ];
        let h = 1e-6;
        for case in cases {
            let expr = Expr::parse_expression(case).unwrap();
            let f = expr.lambdify1D("x").unwrap();
            let df = expr.diff("x").simplify_().lambdify1D("x").unwrap();
            for x in [0.7, 1.3, 2.1] {
                let numeric = (f(x + h) - f(x - h)) / (2.0 * h);
                assert_relative_eq!(df(x), numeric, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_partial_derivatives() {
        let expr = Expr::parse_expression("x^3 - y").unwrap();
        let dx = expr.diff("x").simplify_().lambdify2D("x", "y").unwrap();
        let dy = expr.diff("y").simplify_().lambdify2D("x", "y").unwrap();
        assert_eq!(dx(2.0, 5.0), 12.0);
        assert_eq!(dy(2.0, 5.0), -1.0);
    }
}
