/// interactive-control bookkeeping: one [`SliderSpec`] per `(plot, parameter)`
/// pair, an overwrite-on-redeclare registry of them, and the dispatcher that
/// applies `sliderupdate` directives and pushes metadata to the UI through
/// the narrow [`ControlHost`] seam.
use crate::app::commands::{SliderCommand, SliderDefault};
use crate::app::registry::PlotRegistry;
use itertools::Itertools;
use log::{info, warn};
use std::collections::HashMap;

/// well-known control name for the shared axis-range selector of a plot
pub const AXIS_RANGE_CONTROL: &str = "x_range_line";

/// bounds every parameter control starts with before any directive overrides it
pub const DEFAULT_PARAM_MIN: f64 = -10.0;
pub const DEFAULT_PARAM_MAX: f64 = 10.0;
pub const DEFAULT_PARAM_VALUE: f64 = 1.0;

/// bounds the axis-range control starts with
pub const DEFAULT_AXIS_MIN: f64 = -100.0;
pub const DEFAULT_AXIS_MAX: f64 = 100.0;
pub const DEFAULT_AXIS_RANGE: (f64, f64) = (-10.0, 10.0);

/// Resolved metadata of one interactive control. `default` doubles as the
/// value the control returns to on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderSpec {
    pub plot_id: String,
    pub param_name: String,
    pub min: f64,
    pub max: f64,
    pub default: SliderDefault,
    pub step: f64,
    pub label: String,
}

/// The "push slider metadata to the client" contract. The UI layer implements
/// this; everything on our side of the seam only ever calls `update_control`.
pub trait ControlHost {
    fn update_control(&mut self, spec: &SliderSpec);
}

/// Production host that reports pushes to the log; a real UI session replaces
/// this with its own implementation.
pub struct LoggingControlHost;

impl ControlHost for LoggingControlHost {
    fn update_control(&mut self, spec: &SliderSpec) {
        info!(
            "control '{}:{}' updated: label '{}', bounds [{}, {}], default {:?}, step {}",
            spec.plot_id, spec.param_name, spec.label, spec.min, spec.max, spec.default, spec.step
        );
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliderRegistry {
    specs: HashMap<String, HashMap<String, SliderSpec>>,
}

impl SliderRegistry {
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
        }
    }

    fn store(&mut self, spec: SliderSpec) {
        self.specs
            .entry(spec.plot_id.clone())
            .or_default()
            .insert(spec.param_name.clone(), spec);
    }

    /// Seeds the controls of a freshly declared plot: every free parameter
    /// gets a default scalar slider and the plot gets its axis-range control.
    /// Seeding does not push to the host; the UI builds its initial controls
    /// from the plot configuration itself.
    pub fn seed_plot_defaults(&mut self, plot_id: &str, x_label: &str, free_params: &[String]) {
        for param in free_params {
            self.store(SliderSpec {
                plot_id: plot_id.to_string(),
                param_name: param.clone(),
                min: DEFAULT_PARAM_MIN,
                max: DEFAULT_PARAM_MAX,
                default: SliderDefault::Scalar(DEFAULT_PARAM_VALUE),
                step: (DEFAULT_PARAM_MAX - DEFAULT_PARAM_MIN).abs() / 100.0,
                label: param.clone(),
            });
        }
        self.store(SliderSpec {
            plot_id: plot_id.to_string(),
            param_name: AXIS_RANGE_CONTROL.to_string(),
            min: DEFAULT_AXIS_MIN,
            max: DEFAULT_AXIS_MAX,
            default: SliderDefault::Range(DEFAULT_AXIS_RANGE.0, DEFAULT_AXIS_RANGE.1),
            step: (DEFAULT_AXIS_MAX - DEFAULT_AXIS_MIN).abs() / 100.0,
            label: x_label.to_string(),
        });
    }

    /// Applies a `sliderupdate` directive: resolves the optional label and a
    /// zero step, overwrites the stored spec and immediately pushes the new
    /// metadata to the host. A directive naming an unknown plot id is dropped
    /// with a warning and leaves both registry and host untouched.
    pub fn apply(&mut self, cmd: SliderCommand, plots: &PlotRegistry, host: &mut dyn ControlHost) {
        if !plots.contains(&cmd.plot_id) {
            warn!(
                "sliderupdate for unknown plot id '{}' dropped (parameter '{}')",
                cmd.plot_id, cmd.param_name
            );
            return;
        }
        let label = cmd.label.unwrap_or_else(|| cmd.param_name.clone());
        let step = if cmd.step == 0.0 {
            (cmd.max - cmd.min).abs() / 100.0
        } else {
            cmd.step
        };
        let spec = SliderSpec {
            plot_id: cmd.plot_id,
            param_name: cmd.param_name,
            min: cmd.min,
            max: cmd.max,
            default: cmd.default,
            step,
            label,
        };
        host.update_control(&spec);
        self.store(spec);
    }

    pub fn get(&self, plot_id: &str, param_name: &str) -> Option<&SliderSpec> {
        self.specs.get(plot_id).and_then(|m| m.get(param_name))
    }

    /// all specs of a plot, sorted by parameter name for deterministic output
    pub fn specs_for(&self, plot_id: &str) -> Vec<&SliderSpec> {
        self.specs
            .get(plot_id)
            .map(|m| {
                m.values()
                    .sorted_by(|a, b| a.param_name.cmp(&b.param_name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// scalar default of every parameter control of a plot, the snapshot the
    /// evaluation engine runs against before any user interaction
    pub fn default_bindings(&self, plot_id: &str) -> HashMap<String, f64> {
        let mut bindings = HashMap::new();
        for spec in self.specs_for(plot_id) {
            if spec.param_name == AXIS_RANGE_CONTROL {
                continue;
            }
            if let SliderDefault::Scalar(value) = spec.default {
                bindings.insert(spec.param_name.clone(), value);
            }
        }
        bindings
    }

    /// default axis range of a plot, from its range control
    pub fn default_axis_range(&self, plot_id: &str) -> (f64, f64) {
        match self.get(plot_id, AXIS_RANGE_CONTROL).map(|s| &s.default) {
            Some(SliderDefault::Range(lo, hi)) => (*lo, *hi),
            _ => DEFAULT_AXIS_RANGE,
        }
    }

    /// Restores every control of a plot to its stored default in one batch.
    pub fn reset(&self, plot_id: &str, host: &mut dyn ControlHost) {
        for spec in self.specs_for(plot_id) {
            host.update_control(spec);
        }
    }
}
