/// the reactive recomputation core: given a plot configuration, the current
/// parameter values and an axis range, build the numeric grid and evaluate
/// every equation entry in order into one renderable series each. Failures
/// stay local to the entry that raised them; only a bad grid fails the whole
/// plot.
use crate::app::commands::EquationEntry;
use crate::app::registry::PlotConfig;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use nalgebra::DVector;
use regex::Regex;
use std::collections::HashMap;

/// grid resolution of every rendered curve
pub const GRID_POINTS: usize = 50;

/// fixed ten-color palette; entry i of a list always gets color i mod 10,
/// whether or not its neighbours evaluated successfully
pub const PALETTE: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
];

/// success-with-values or failure-with-message, so the render step can
/// assemble curves and annotations uniformly
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    Values(DVector<f64>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedSeries {
    pub label: String,
    pub color: (u8, u8, u8),
    pub outcome: SeriesOutcome,
}

/// One full evaluation result for a plot: the grid plus one series list per
/// expression list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    pub plot_id: String,
    pub x_label: String,
    pub y_label: String,
    pub grid: DVector<f64>,
    pub lists: Vec<Vec<EvaluatedSeries>>,
}

impl PlotFrame {
    /// successful curves across all lists, in declaration order
    pub fn curves(&self) -> Vec<(&str, (u8, u8, u8), &DVector<f64>)> {
        let mut curves = Vec::new();
        for list in &self.lists {
            for series in list {
                if let SeriesOutcome::Values(values) = &series.outcome {
                    curves.push((series.label.as_str(), series.color, values));
                }
            }
        }
        curves
    }

    /// failed entries across all lists: (label, message)
    pub fn failures(&self) -> Vec<(&str, &str)> {
        let mut failures = Vec::new();
        for list in &self.lists {
            for series in list {
                if let SeriesOutcome::Failed(message) = &series.outcome {
                    failures.push((series.label.as_str(), message.as_str()));
                }
            }
        }
        failures
    }
}

/// Rewrites script-dialect spellings into the parser's namespace: the
/// numeric-namespace alias prefix `np.` is dropped and `**` becomes `^`.
pub fn normalize_script_expression(raw: &str) -> String {
    let alias = Regex::new(r"\bnp\s*\.\s*").unwrap();
    let without_alias = alias.replace_all(raw, "").into_owned();
    without_alias.replace("**", "^")
}

fn evaluate_entry(
    entry: &EquationEntry,
    names: &[String],
    columns: &[DVector<f64>],
) -> Result<DVector<f64>, String> {
    let normalized = normalize_script_expression(&entry.expression);
    let expr = Expr::parse_expression(&normalized)
        .map_err(|e| format!("error in '{}': {}", entry.source(), e))?;
    let name_refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
    let func = expr
        .lambdify_checked(&name_refs)
        .map_err(|e| format!("error in '{}': {}", entry.source(), e))?;

    let n = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut args = vec![0.0; columns.len()];
    let values = DVector::from_iterator(
        n,
        (0..n).map(|idx| {
            for (j, column) in columns.iter().enumerate() {
                args[j] = column[idx];
            }
            func(&args)
        }),
    );

    if values.iter().any(|v| v.is_nan()) {
        return Err(format!(
            "domain error in '{}': result is not a number over the current range",
            entry.source()
        ));
    }
    Ok(values)
}

/// Evaluate one expression list over the grid. The context starts with the
/// axis variable bound to the grid and every supplied parameter bound as a
/// constant column; each successful entry is then bound under its label so
/// later entries may reference it. A failed entry yields an error annotation,
/// stays unbound, and the rest of the list still evaluates.
fn evaluate_list(
    list: &[EquationEntry],
    x_label: &str,
    params: &HashMap<String, f64>,
    grid: &DVector<f64>,
) -> Vec<EvaluatedSeries> {
    let n = grid.len();
    let mut names: Vec<String> = vec![x_label.to_string()];
    let mut columns: Vec<DVector<f64>> = vec![grid.clone()];
    for (name, value) in params {
        if name == x_label {
            continue;
        }
        names.push(name.clone());
        columns.push(DVector::from_element(n, *value));
    }

    let mut out = Vec::with_capacity(list.len());
    for (i, entry) in list.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        match evaluate_entry(entry, &names, &columns) {
            Ok(values) => {
                match names.iter().position(|name| name == &entry.label) {
                    Some(pos) => columns[pos] = values.clone(),
                    None => {
                        names.push(entry.label.clone());
                        columns.push(values.clone());
                    }
                }
                out.push(EvaluatedSeries {
                    label: entry.label.clone(),
                    color,
                    outcome: SeriesOutcome::Values(values),
                });
            }
            Err(message) => out.push(EvaluatedSeries {
                label: entry.label.clone(),
                color,
                outcome: SeriesOutcome::Failed(message),
            }),
        }
    }
    out
}

/// Evaluates a plot configuration into a [`PlotFrame`].
///
/// The grid is `GRID_POINTS` values linearly spaced over `range`; each
/// expression list evaluates against a fresh context. Identical inputs
/// always produce an identical frame: there is no hidden state and no
/// randomness anywhere below this call.
pub fn evaluate_plot(
    cfg: &PlotConfig,
    params: &HashMap<String, f64>,
    range: (f64, f64),
) -> Result<PlotFrame, String> {
    let (lo, hi) = range;
    if !lo.is_finite() || !hi.is_finite() {
        return Err(format!("axis range [{}, {}] is not numeric", lo, hi));
    }
    if lo >= hi {
        return Err(format!("axis range [{}, {}] is empty or inverted", lo, hi));
    }
    let grid = DVector::from_vec(linspace(lo, hi, GRID_POINTS));

    let lists = cfg
        .expression_lists
        .iter()
        .map(|list| evaluate_list(list, &cfg.x_label, params, &grid))
        .collect();

    Ok(PlotFrame {
        plot_id: cfg.id.clone(),
        x_label: cfg.x_label.clone(),
        y_label: cfg.y_label.clone(),
        grid,
        lists,
    })
}
