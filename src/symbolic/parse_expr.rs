use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{find_char_positions_outside_brackets, find_matching_bracket};
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedPlotKit::symbolic::symbolic_engine::Expr;
/// let input = "k * exp(-beta*(v-U))";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify(&["U", "beta", "k", "v"]);
/// println!("{}, evaluated: {}  \n", input, parsed_function(&[0.0, 0.5, 1.0, 2.0]));
/// ```
//                  search recursion diagram
//                "y^2+exp(x)+log(x)/y"             |
//                |       left  | right             |
//                |_________________________________|
//                |     split at rightmost +/-      |
//                |_________________________________|
//                | y^2+exp(x)  |   log(x)/y        |
//                |      |      |        |          |
//                |     \|/     |       \|/         |
//                | rightmost + |  rightmost * or / |
//                | y^2 | exp(x)|   log(x) | y      |
//                |  ^  |  head |    head  | var    |
//                  etc...

// whitelisted function heads and the variants they parse into
const FUNCTION_HEADS: [&str; 8] = ["exp", "sqrt", "log", "ln", "sin", "cos", "tan", "tg"];

// a '+'/'-' directly after the exponent marker of a numeric literal, as in
// "1e-5", is part of the number, not an operator
fn is_exponent_sign(chars: &[(usize, char)], k: usize) -> bool {
    if k < 2 {
        return false;
    }
    let marker = chars[k - 1].1;
    if marker != 'e' && marker != 'E' {
        return false;
    }
    let before = chars[k - 2].1;
    (before.is_ascii_digit() || before == '.')
        && chars.get(k + 1).map_or(false, |&(_, c)| c.is_ascii_digit())
}

// function to find the rightmost occurrence of operators at the same
// precedence level, ignoring everything enclosed in parentheses;
// returns the byte position of the operator
fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
) -> Option<(usize, char)> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut bracket_depth = 0;
    let mut last_op: Option<(usize, char)> = None;

    for (k, &(pos, c)) in chars.iter().enumerate() {
        match c {
            '(' => bracket_depth += 1,
            ')' => bracket_depth -= 1,
            _ if bracket_depth == 0 && operators.contains(&c) => {
                if (c == '+' || c == '-') && is_exponent_sign(&chars, k) {
                    continue;
                }
                last_op = Some((pos, c));
            }
            _ => {}
        }
    }

    last_op
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn parse_expression_func(input: &str) -> Result<Expr, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty expression".to_string());
    }

    // whole input is a numeric literal (also covers "-4" and "1e-5")
    if let Ok(value) = input.parse::<f64>() {
        return Ok(Expr::Const(value));
    }

    // addition and subtraction, rightmost first so chains associate left
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['+', '-']) {
        let left = input[..pos].trim();
        let right = input[pos + 1..].trim();

        // unary minus: nothing on the left means the whole tail is negated
        if left.is_empty() {
            return if op == '-' {
                Ok(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(parse_expression_func(right)?),
                ))
            } else {
                Ok(parse_expression_func(right)?)
            };
        }

        return match op {
            '+' => Ok(Expr::Add(
                Box::new(parse_expression_func(left)?),
                Box::new(parse_expression_func(right)?),
            )),
            '-' => Ok(Expr::Sub(
                Box::new(parse_expression_func(left)?),
                Box::new(parse_expression_func(right)?),
            )),
            _ => unreachable!(),
        };
    }

    // multiplication and division, same rightmost-split rule
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, &['*', '/']) {
        let left = input[..pos].trim();
        let right = input[pos + 1..].trim();

        return match op {
            '*' => Ok(Expr::Mul(
                Box::new(parse_expression_func(left)?),
                Box::new(parse_expression_func(right)?),
            )),
            '/' => Ok(Expr::Div(
                Box::new(parse_expression_func(left)?),
                Box::new(parse_expression_func(right)?),
            )),
            _ => unreachable!(),
        };
    }

    // exponentiation, leftmost split so towers associate right
    if let Some(pos) = find_char_positions_outside_brackets(input, '^') {
        let base = input[..pos].trim();
        let exponent = input[pos + 1..].trim();
        return Ok(Expr::Pow(
            Box::new(parse_expression_func(base)?),
            Box::new(parse_expression_func(exponent)?),
        ));
    }

    // whitelisted function heads: exp(...), log(...), sin(...), ...
    for head in FUNCTION_HEADS {
        if input.starts_with(head)
            && input[head.len()..].starts_with('(')
            && input.ends_with(')')
        {
            let close = find_matching_bracket(input, head.len())
                .ok_or_else(|| format!("unbalanced brackets in '{}'", input))?;
            if close != input.len() - 1 {
                continue;
            }
            let inner = parse_expression_func(&input[head.len() + 1..close])?;
            return Ok(match head {
                "exp" => Expr::Exp(Box::new(inner)),
                "sqrt" => Expr::Pow(Box::new(inner), Box::new(Expr::Const(0.5))),
                "log" | "ln" => Expr::Ln(Box::new(inner)),
                "sin" => Expr::sin(Box::new(inner)),
                "cos" => Expr::cos(Box::new(inner)),
                "tan" | "tg" => Expr::tg(Box::new(inner)),
                _ => unreachable!(),
            });
        }
    }

    // bare variable
    if is_identifier(input) {
        return Ok(Expr::Var(input.to_string()));
    }

    // expression that is all in brackets
    if input.starts_with('(') && input.ends_with(')') {
        match find_matching_bracket(input, 0) {
            Some(close) if close == input.len() - 1 => {
                return parse_expression_func(&input[1..close]);
            }
            Some(_) => {}
            None => return Err(format!("unbalanced brackets in '{}'", input)),
        }
    }

    Err(format!("invalid expression fragment '{}'", input))
}

impl Expr {
    /// Parses a raw expression string into a symbolic expression.
    ///
    /// Recognizes the bounded script namespace only: identifiers, numeric
    /// literals, `+ - * / ^`, parentheses, and the whitelisted functions
    /// `exp`, `log`/`ln`, `sin`, `cos`, `tan`, `sqrt`.
    pub fn parse_expression(input: &str) -> Result<Expr, String> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exponential() {
        let expr = parse_expression_func("exp(x)").unwrap();
        assert_eq!(expr, Expr::Exp(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse_expression_func("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_negative_constant() {
        let expr = parse_expression_func("-4").unwrap();
        assert_eq!(expr, Expr::Const(-4.0));
    }

    #[test]
    fn test_parse_scientific_literal() {
        let expr = parse_expression_func("1e-5").unwrap();
        assert_eq!(expr, Expr::Const(1e-5));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expression_func("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_underscored_variable() {
        let expr = parse_expression_func("i_conc_a").unwrap();
        assert_eq!(expr, Expr::Var("i_conc_a".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse_expression_func("x + 2").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_subtraction() {
        let expr = parse_expression_func("x - 2").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_multiplication() {
        let expr = parse_expression_func("x * 2").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_division() {
        let expr = parse_expression_func("x / 2").unwrap();
        assert_eq!(
            expr,
            Expr::Div(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_division_chain_associates_left() {
        let expr = parse_expression_func("a / b / c").unwrap();
        assert_eq!(
            expr,
            Expr::Div(
                Box::new(Expr::Div(
                    Box::new(Expr::Var("a".to_string())),
                    Box::new(Expr::Var("b".to_string()))
                )),
                Box::new(Expr::Var("c".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_power() {
        let expr = parse_expression_func("x^2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_logarithm() {
        let expr = parse_expression_func("log(x)").unwrap();
        assert_eq!(expr, Expr::Ln(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_sqrt_as_half_power() {
        let expr = parse_expression_func("sqrt(x)").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(0.5))
            )
        );
    }

    #[test]
    fn test_parse_expression_func_with_brackets() {
        let expr = parse_expression_func("(x + y) * z").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Var("x".to_string())),
                    Box::new(Expr::Var("y".to_string()))
                )),
                Box::new(Expr::Var("z".to_string()))
            )
        );
    }

    #[test]
    fn test_parse_complex_expression() {
        let expr = parse_expression_func("(x + y) * (z - 2) / exp(w)").unwrap();
        let x = Box::new(Expr::Var("x".to_string()));
        let y = Box::new(Expr::Var("y".to_string()));
        let z = Box::new(Expr::Var("z".to_string()));
        let w = Box::new(Expr::Var("w".to_string()));
        let C = Box::new(Expr::Const(2.0));
        let x_plus_y = Box::new(Expr::Add(x, y));
        let z_minus_C = Box::new(Expr::Sub(z, C));
        let e = Box::new(Expr::Exp(w));
        let product = Box::new(Expr::Mul(x_plus_y, z_minus_C));
        let Res = Expr::Div(product, e);
        assert_eq!(expr, Res);
    }

    #[test]
    fn test_parse_unary_minus_on_product() {
        let expr = parse_expression_func("-n * F").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Mul(
                    Box::new(Expr::Var("n".to_string())),
                    Box::new(Expr::Var("F".to_string()))
                ))
            )
        );
    }

    #[test]
    fn test_parse_unary_minus_inside_function() {
        let expr = parse_expression_func("exp(-beta)").unwrap();
        assert_eq!(
            expr,
            Expr::Exp(Box::new(Expr::Mul(
                Box::new(Expr::Const(-1.0)),
                Box::new(Expr::Var("beta".to_string()))
            )))
        );
    }

    #[test]
    fn test_invalid_expression() {
        let result = parse_expression_func("(x +");
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn test_unmatched_brackets() {
        let result = parse_expression_func("(x + y");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_expression_func("   ").is_err());
    }

    #[test]
    fn test_multiple_addition() {
        let result = parse_expression_func("x^2 - x - 1");
        let x = Box::new(Expr::Var("x".to_string()));
        let to_check = Expr::Pow(x.clone(), Box::new(Expr::Const(2.0))) - *x - Expr::Const(1.0);
        assert_eq!(result.unwrap(), to_check);
    }

    #[test]
    fn test_parse_sin() {
        let expr = parse_expression_func("sin(x)").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_cos() {
        let expr = parse_expression_func("cos(x)").unwrap();
        assert_eq!(expr, Expr::cos(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_tan() {
        let expr = parse_expression_func("tan(x)").unwrap();
        assert_eq!(expr, Expr::tg(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_complex_trig() {
        let expr = parse_expression_func("sin(x) + cos(y)").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::sin(Box::new(Expr::Var("x".to_string())))),
                Box::new(Expr::cos(Box::new(Expr::Var("y".to_string()))))
            )
        );
    }

    #[test]
    fn test_parse_nested_trig() {
        let expr = parse_expression_func("sin(cos(x))").unwrap();
        assert_eq!(
            expr,
            Expr::sin(Box::new(Expr::cos(Box::new(Expr::Var("x".to_string())))))
        );
    }

    #[test]
    fn test_parse_rate_equation() {
        // the shape the demo scripts actually use
        let expr = parse_expression_func("k * exp(-beta*(v-U))").unwrap();
        assert_eq!(
            expr.all_arguments_are_variables(),
            vec![
                "U".to_string(),
                "beta".to_string(),
                "k".to_string(),
                "v".to_string()
            ]
        );
    }
}
