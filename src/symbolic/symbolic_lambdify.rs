use crate::symbolic::symbolic_engine::{Expr, ExprError};

/// compiled expression of several variables, arguments in the order of `vars`
pub type Lambda = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

impl Expr {
    /// Compiles the expression tree into a closure once, so evaluation does no tree walking
    /// and no name lookups. Every variable of the expression must be listed in `vars`,
    /// otherwise `ExprError::UnknownVariable` is returned.
    ///
    /// # Example
    /// ```
    /// use RustedRoots::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("x^2 + y").unwrap();
    /// let f = expr.lambdify(&["x", "y"]).unwrap();
    /// assert_eq!(f(&[2.0, 1.0]), 5.0);
    /// ```
    pub fn lambdify(&self, vars: &[&str]) -> Result<Lambda, ExprError> {
        let compiled: Lambda = match self {
            Expr::Var(name) => {
                let index = vars.iter().position(|v| *v == name.as_str()).ok_or_else(|| {
                    ExprError::UnknownVariable {
                        name: name.clone(),
                        allowed: vars.iter().map(|v| v.to_string()).collect(),
                    }
                })?;
                Box::new(move |args: &[f64]| args[index])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_: &[f64]| val)
            }
            Expr::Add(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.lambdify(vars)?, rhs.lambdify(vars)?);
                Box::new(move |args: &[f64]| lhs_fn(args) + rhs_fn(args))
            }
            Expr::Sub(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.lambdify(vars)?, rhs.lambdify(vars)?);
                Box::new(move |args: &[f64]| lhs_fn(args) - rhs_fn(args))
            }
            Expr::Mul(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.lambdify(vars)?, rhs.lambdify(vars)?);
                Box::new(move |args: &[f64]| lhs_fn(args) * rhs_fn(args))
            }
            Expr::Div(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.lambdify(vars)?, rhs.lambdify(vars)?);
                Box::new(move |args: &[f64]| lhs_fn(args) / rhs_fn(args))
            }
            Expr::Pow(base, exp) => {
                let (base_fn, exp_fn) = (base.lambdify(vars)?, exp.lambdify(vars)?);
                Box::new(move |args: &[f64]| base_fn(args).powf(exp_fn(args)))
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify(vars)?;
                Box::new(move |args: &[f64]| expr_fn(args).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify(vars)?;
                Box::new(move |args: &[f64]| expr_fn(args).ln())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify(vars)?;
                Box::new(move |args: &[f64]| expr_fn(args).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify(vars)?;
                Box::new(move |args: &[f64]| expr_fn(args).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify(vars)?;
                Box::new(move |args: &[f64]| expr_fn(args).tan())
            }
        };
        Ok(compiled)
    }

    /// closure of one variable; constant expressions are accepted too
    pub fn lambdify1D(&self, var: &str) -> Result<Box<dyn Fn(f64) -> f64 + Send + Sync>, ExprError> {
        let compiled = self.lambdify(&[var])?;
        Ok(Box::new(move |x| compiled(&[x])))
    }

    pub fn lambdify2D(
        &self,
        x_var: &str,
        y_var: &str,
    ) -> Result<Box<dyn Fn(f64, f64) -> f64 + Send + Sync>, ExprError> {
        let compiled = self.lambdify(&[x_var, y_var])?;
        Ok(Box::new(move |x, y| compiled(&[x, y])))
    }
}
