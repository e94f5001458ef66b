#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedPlotKit::symbolic::symbolic_engine::Expr;
/// let input = "k * exp(-beta*(v-U))";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify(&["U", "beta", "k", "v"]);
/// println!("{}, evaluated: {}  \n", input, parsed_function(&[0.0, 0.5, 1.0, 2.0]));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) represents a parsed script expression as a symbolic tree
/// 2) reports which identifiers an expression references
///# Example#
/// ```
/// use RustedPlotKit::symbolic::symbolic_engine::Expr;
/// let input = "kf * c";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // return vec of all arguments, sorted and deduplicated
/// let all = parsed_expression.all_arguments_are_variables();
/// assert_eq!(all, vec!["c".to_string(), "kf".to_string()]);
/// ```
pub mod symbolic_engine;
///________________________________________________________________________________________________________________________________________________
/// a module turns a symbolic expression into a regular Rust function
/// Example#
/// ```
/// use RustedPlotKit::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^2").unwrap();
/// let func = f.lambdify1D().unwrap();
/// assert_eq!(func(3.0), 9.0);
/// ```
pub mod symbolic_lambdify;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and grids
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
