//! Analytical differentiation of [`Expr`] trees (sum, product, quotient and chain rules,
//! general power rule for `f(x)^g(x)`) and a light simplifier that folds constants and
//! drops neutral elements (`x + 0`, `x * 1`, `x ^ 1`, `0 * x`). The simplifier only keeps
//! derivatives compact; it is not a computer-algebra system.
use crate::symbolic::symbolic_engine::Expr;

fn both_const(lhs: &Expr, rhs: &Expr) -> Option<(f64, f64)> {
    match (lhs, rhs) {
        (Expr::Const(a), Expr::Const(b)) => Some((*a, *b)),
        _ => None,
    }
}

impl Expr {
    /// Symbolic derivative with respect to `var`. The result is not simplified,
    /// call `simplify_()` on it when a compact form is needed.
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => Expr::Const(if name == var { 1.0 } else { 0.0 }),
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(u, v) => u.diff(var) + v.diff(var),
            Expr::Sub(u, v) => u.diff(var) - v.diff(var),
            Expr::Mul(u, v) => u.diff(var) * (**v).clone() + (**u).clone() * v.diff(var),
            Expr::Div(u, v) => {
                (u.diff(var) * (**v).clone() - v.diff(var) * (**u).clone())
                    / ((**v).clone() * (**v).clone())
            }
            // exponent free of var: n * u^(n-1) * u'
            Expr::Pow(u, n) if !n.contains_variable(var) => {
                (**n).clone() * (**u).clone().pow((**n).clone() - Expr::Const(1.0)) * u.diff(var)
            }
            // (u^g)' = u^g * (g' * ln(u) + g * u' / u)
            Expr::Pow(u, g) => {
                self.clone()
                    * (g.diff(var) * (**u).clone().ln() + (**g).clone() * u.diff(var) / (**u).clone())
            }
            Expr::Exp(u) => self.clone() * u.diff(var),
            Expr::Ln(u) => u.diff(var) / (**u).clone(),
            Expr::sin(u) => Expr::cos(u.clone()) * u.diff(var),
            Expr::cos(u) => -Expr::sin(u.clone()) * u.diff(var),
            Expr::tg(u) => Expr::Const(1.0) / Expr::cos(u.clone()).pow(Expr::Const(2.0)) * u.diff(var),
        }
    }

    /// Bottom-up simplification: constant folding and neutral elements.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                if let Some((a, b)) = both_const(&l, &r) {
                    Expr::Const(a + b)
                } else if l.is_zero() {
                    r
                } else if r.is_zero() {
                    l
                } else {
                    l + r
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                if let Some((a, b)) = both_const(&l, &r) {
                    Expr::Const(a - b)
                } else if r.is_zero() {
                    l
                } else if l.is_zero() {
                    -r
                } else {
                    l - r
                }
            }
            Expr::Mul(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                if let Some((a, b)) = both_const(&l, &r) {
                    Expr::Const(a * b)
                } else if l.is_zero() || r.is_zero() {
                    Expr::Const(0.0)
                } else if l.is_one() {
                    r
                } else if r.is_one() {
                    l
                } else {
                    l * r
                }
            }
            Expr::Div(lhs, rhs) => {
                let (l, r) = (lhs.simplify_(), rhs.simplify_());
                if let Some((a, b)) = both_const(&l, &r) {
                    Expr::Const(a / b)
                } else if l.is_zero() {
                    Expr::Const(0.0)
                } else if r.is_one() {
                    l
                } else {
                    l / r
                }
            }
            Expr::Pow(base, exp) => {
                let (b, e) = (base.simplify_(), exp.simplify_());
                if let Some((x, n)) = both_const(&b, &e) {
                    Expr::Const(x.powf(n))
                } else if e.is_zero() {
                    Expr::Const(1.0)
                } else if e.is_one() {
                    b
                } else {
                    b.pow(e)
                }
            }
            Expr::Exp(expr) => match expr.simplify_() {
                Expr::Const(c) => Expr::Const(c.exp()),
                inner => Expr::Exp(inner.boxed()),
            },
            Expr::Ln(expr) => match expr.simplify_() {
                Expr::Const(c) => Expr::Const(c.ln()),
                inner => Expr::Ln(inner.boxed()),
            },
            Expr::sin(expr) => match expr.simplify_() {
                Expr::Const(c) => Expr::Const(c.sin()),
                inner => Expr::sin(inner.boxed()),
            },
            Expr::cos(expr) => match expr.simplify_() {
                Expr::Const(c) => Expr::Const(c.cos()),
                inner => Expr::cos(inner.boxed()),
            },
            Expr::tg(expr) => match expr.simplify_() {
                Expr::Const(c) => Expr::Const(c.tan()),
                inner => Expr::tg(inner.boxed()),
            },
        }
    }
}
