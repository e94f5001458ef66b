use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts the expression into an executable Rust closure over a fixed
    /// argument order.
    ///
    /// Positions in the input slice correspond to the names in `vars`. The
    /// closure is built recursively, mirroring the expression tree, so there
    /// is no parsing or interpretation at call time.
    ///
    /// # Panics
    /// Panics if the expression references a variable missing from `vars`;
    /// use [`Expr::lambdify_checked`] on untrusted input.
    pub fn lambdify(&self, vars: &[&str]) -> Box<dyn Fn(&[f64]) -> f64 + Send + Sync> {
        match self {
            Expr::Var(name) => {
                let index = vars.iter().position(|&x| x == name).unwrap();
                Box::new(move |args| args[index])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) + rf(args))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) - rf(args))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) * rf(args))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify(vars);
                let rf = rhs.lambdify(vars);
                Box::new(move |args| lf(args) / rf(args))
            }
            Expr::Pow(b, e) => {
                let bf = b.lambdify(vars);
                let ef = e.lambdify(vars);
                Box::new(move |args| bf(args).powf(ef(args)))
            }
            Expr::Exp(e) => {
                let f = e.lambdify(vars);
                Box::new(move |args| f(args).exp())
            }
            Expr::Ln(e) => {
                let f = e.lambdify(vars);
                Box::new(move |args| f(args).ln())
            }
            Expr::sin(e) => {
                let f = e.lambdify(vars);
                Box::new(move |args| f(args).sin())
            }
            Expr::cos(e) => {
                let f = e.lambdify(vars);
                Box::new(move |args| f(args).cos())
            }
            Expr::tg(e) => {
                let f = e.lambdify(vars);
                Box::new(move |args| f(args).tan())
            }
        }
    } // end of lambdify

    /// Validating variant of [`Expr::lambdify`] for script-supplied
    /// expressions: every variable of the expression must appear in `vars`,
    /// otherwise a descriptive error names the first unresolved identifier.
    pub fn lambdify_checked(
        &self,
        vars: &[&str],
    ) -> Result<Box<dyn Fn(&[f64]) -> f64 + Send + Sync>, String> {
        for name in self.all_arguments_are_variables() {
            if !vars.contains(&name.as_str()) {
                return Err(format!("name '{}' is not defined", name));
            }
        }
        Ok(self.lambdify(vars))
    }

    /// Convenience for single-variable expressions y = f(x).
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2").unwrap().lambdify1D().unwrap();
    /// assert_eq!(f(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Result<Box<dyn Fn(f64) -> f64>, String> {
        let vars = self.all_arguments_are_variables();
        if vars.len() == 1 {
            let var_name = vars[0].clone();
            let compiled_func = self.lambdify(&[var_name.as_str()]);
            Ok(Box::new(move |x| compiled_func(&[x])))
        } else if vars.is_empty() {
            // constant expression
            let compiled_func = self.lambdify(&[]);
            Ok(Box::new(move |_| compiled_func(&[])))
        } else {
            Err(format!(
                "lambdify1D can only be used with expressions containing exactly one variable, found: {:?}",
                vars
            ))
        }
    } // end of lambdify1D
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_lambdify1d_single_variable() {
        let x = Expr::Var("x".to_string());
        let func = x.lambdify1D().unwrap();
        assert_eq!(func(5.0), 5.0);
    }

    #[test]
    fn test_lambdify1d_constant() {
        let c = Expr::Const(42.0);
        let func = c.lambdify1D().unwrap();
        assert_eq!(func(100.0), 42.0);
    }

    #[test]
    fn test_lambdify1d_polynomial() {
        let x = Expr::Var("x".to_string());
        let expr = x.clone() * x.clone() + x.clone() * Expr::Const(2.0) + Expr::Const(1.0); // x^2 + 2x + 1
        let func = expr.lambdify1D().unwrap();
        assert_eq!(func(3.0), 16.0); // 9 + 6 + 1 = 16
    }

    #[test]
    fn test_lambdify1d_trigonometric() {
        let x = Expr::Var("x".to_string());
        let expr = Expr::sin(Box::new(x));
        let func = expr.lambdify1D().unwrap();
        assert!((func(0.0) - 0.0).abs() < 1e-10);
        assert!((func(PI / 2.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_lambdify1d_exponential() {
        let x = Expr::Var("x".to_string());
        let expr = Expr::Exp(Box::new(x));
        let func = expr.lambdify1D().unwrap();
        assert!((func(0.0) - 1.0).abs() < 1e-10);
        assert!((func(1.0) - std::f64::consts::E).abs() < 1e-10);
    }

    #[test]
    fn test_lambdify1d_multiple_variables_is_error() {
        let x = Expr::Var("x".to_string());
        let y = Expr::Var("y".to_string());
        let expr = x + y;
        assert!(expr.lambdify1D().is_err());
    }

    #[test]
    fn test_lambdify_argument_order() {
        let expr = Expr::parse_expression("a - b").unwrap();
        let func = expr.lambdify(&["a", "b"]);
        assert_eq!(func(&[5.0, 3.0]), 2.0);
        let func_swapped = expr.lambdify(&["b", "a"]);
        assert_eq!(func_swapped(&[5.0, 3.0]), -2.0);
    }

    #[test]
    fn test_lambdify_checked_reports_undefined_name() {
        let expr = Expr::parse_expression("k * c").unwrap();
        let err = expr.lambdify_checked(&["k"]).err().unwrap();
        assert_eq!(err, "name 'c' is not defined");
    }

    #[test]
    fn test_lambdify_checked_rate_equation() {
        let expr = Expr::parse_expression("k * exp(-beta*(v-U))").unwrap();
        let func = expr.lambdify_checked(&["U", "beta", "k", "v"]).unwrap();
        // k = 1, beta = 0.5, U = 0, v = 2  =>  exp(-1)
        assert_relative_eq!(func(&[0.0, 0.5, 1.0, 2.0]), (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_lambdify_ln_of_negative_is_nan() {
        let expr = Expr::parse_expression("log(x)").unwrap();
        let func = expr.lambdify(&["x"]);
        assert!(func(&[-1.0]).is_nan());
    }
}
