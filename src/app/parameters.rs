/// static detection of the free parameters of an expression: the identifiers
/// that are not the axis variable, not a whitelisted math function, not the
/// numeric-namespace alias and not a label defined earlier in the same plot.
/// Every name that survives the exclusion needs an interactive control.
use crate::app::commands::EquationEntry;
use itertools::Itertools;
use regex::Regex;
use std::collections::HashSet;

/// math-function names and the numeric-namespace alias; these are never
/// free parameters no matter where they appear
pub const RESERVED_MATH_NAMES: [&str; 7] = ["np", "sin", "cos", "tan", "log", "exp", "sqrt"];

/// Extracts the free parameters of one expression right-hand side.
///
/// Tokenizes with the identifier pattern (alphabetic start, alphanumeric
/// continuation), drops the axis label, the reserved math set and every name
/// already bound, and returns the rest sorted and deduplicated. The result is
/// a pure function of its inputs, which keeps control construction
/// idempotent across reloads.
pub fn extract_parameters(
    expression: &str,
    bound: &HashSet<String>,
    x_label: &str,
) -> Vec<String> {
    let ident_pattern = Regex::new(r"[A-Za-z]\w*").unwrap();
    ident_pattern
        .find_iter(expression)
        .map(|m| m.as_str().to_string())
        .filter(|name| {
            name != x_label
                && !RESERVED_MATH_NAMES.contains(&name.as_str())
                && !bound.contains(name)
        })
        .sorted()
        .dedup()
        .collect()
}

/// Free parameters of a whole plot: binding accumulates left-to-right over
/// every entry (a processed label is bound for all subsequent entries) and
/// carries over from the first expression list into the second, so an
/// equation may reference an earlier label without generating a spurious
/// control.
pub fn free_parameters(lists: &[Vec<EquationEntry>], x_label: &str) -> Vec<String> {
    let mut bound: HashSet<String> = HashSet::new();
    bound.insert(x_label.to_string());

    let mut params: Vec<String> = Vec::new();
    for list in lists {
        for entry in list {
            params.extend(extract_parameters(&entry.expression, &bound, x_label));
            bound.insert(entry.label.clone());
        }
    }
    params.into_iter().sorted().dedup().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(sources: &[&str]) -> Vec<EquationEntry> {
        sources
            .iter()
            .map(|s| EquationEntry::parse(s).unwrap())
            .collect()
    }

    #[test]
    fn test_extract_excludes_axis_and_math_names() {
        let bound = HashSet::new();
        let params = extract_parameters("k * np.exp(-beta * (v - U))", &bound, "v");
        assert_eq!(
            params,
            vec!["U".to_string(), "beta".to_string(), "k".to_string()]
        );
    }

    #[test]
    fn test_extract_excludes_bound_names() {
        let mut bound = HashSet::new();
        bound.insert("kf".to_string());
        let params = extract_parameters("kf * c", &bound, "v");
        assert_eq!(params, vec!["c".to_string()]);
    }

    #[test]
    fn test_extract_sorted_and_deduplicated() {
        let bound = HashSet::new();
        let params = extract_parameters("b * a + a * b", &bound, "v");
        assert_eq!(params, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_earlier_label_is_bound_for_later_entries() {
        // ["a = v*2", "b = a + v"] with axis v: nothing is free
        let lists = vec![entries(&["a = v*2", "b = a + v"])];
        assert!(free_parameters(&lists, "v").is_empty());
    }

    #[test]
    fn test_binding_carries_over_between_lists() {
        let lists = vec![
            entries(&["i = kf * conc"]),
            entries(&["total = i + offset"]),
        ];
        let params = free_parameters(&lists, "v");
        // "i" from the first list is bound inside the second; kf, conc, offset are free
        assert_eq!(
            params,
            vec![
                "conc".to_string(),
                "kf".to_string(),
                "offset".to_string()
            ]
        );
    }

    #[test]
    fn test_label_not_bound_for_its_own_entry() {
        // self-reference on the right-hand side counts as free: the label only
        // binds entries after it
        let lists = vec![entries(&["kf = kf"])];
        assert_eq!(free_parameters(&lists, "v"), vec!["kf".to_string()]);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let lists = vec![entries(&["i = k * exp(-beta * (v - U)) * c"])];
        assert_eq!(
            free_parameters(&lists, "v"),
            free_parameters(&lists, "v")
        );
    }
}
