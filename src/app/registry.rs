/// process-wide state of a loaded configuration: the plot registry plus the
/// [`PlotApp`] context that owns it together with the variable store and the
/// slider registry. Everything is written once during the single-threaded
/// load and only read afterwards; evaluation never mutates any of it.
use crate::app::commands::{Command, EquationEntry, LineCommand, parse_command};
use crate::app::evaluate::{PlotFrame, evaluate_plot};
use crate::app::parameters::free_parameters;
use crate::app::sliders::{ControlHost, SliderRegistry};
use crate::app::variable_store::VariableStore;
use log::{info, warn};
use std::collections::HashMap;
use std::fs;

/// Resolved configuration of one plot: substituted expression lists, axis
/// labels and the computed free-parameter set. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub id: String,
    pub expression_lists: Vec<Vec<EquationEntry>>,
    pub x_label: String,
    pub y_label: String,
    pub free_parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotRegistry {
    order: Vec<String>,
    plots: HashMap<String, PlotConfig>,
}

impl PlotRegistry {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            plots: HashMap::new(),
        }
    }

    /// re-declaring an id overwrites the prior entry, keeping its position
    pub fn insert(&mut self, config: PlotConfig) {
        if !self.plots.contains_key(&config.id) {
            self.order.push(config.id.clone());
        }
        self.plots.insert(config.id.clone(), config);
    }

    pub fn get(&self, id: &str) -> Option<&PlotConfig> {
        self.plots.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// plots in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &PlotConfig> {
        self.order.iter().map(|id| &self.plots[id])
    }
}

/// The context object created at configuration load time and handed to every
/// component that needs it: variable store, plot registry and slider
/// registry. Single writer during load, many readers afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotApp {
    pub variables: VariableStore,
    pub plots: PlotRegistry,
    pub sliders: SliderRegistry,
}

impl PlotApp {
    pub fn new() -> Self {
        Self {
            variables: VariableStore::new(),
            plots: PlotRegistry::new(),
            sliders: SliderRegistry::new(),
        }
    }

    /// Loads a configuration script, one command per line. Blank lines and
    /// `#` comments are skipped. The load is fail-fast: the first malformed
    /// line aborts with a message naming it, and the caller must discard the
    /// partially filled context.
    pub fn load_str(&mut self, script: &str, host: &mut dyn ControlHost) -> Result<(), String> {
        for (lineno, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let command =
                parse_command(line).map_err(|e| format!("line {}: {}", lineno + 1, e))?;
            match command {
                Command::Assign { name, expression } => {
                    self.variables.insert(&name, &expression);
                }
                Command::Line(cmd) => self.declare_plot(cmd),
                Command::SliderUpdate(cmd) => self.sliders.apply(cmd, &self.plots, host),
            }
        }
        self.check_declaration_order();
        info!(
            "configuration loaded: {} plots, {} variables",
            self.plots.len(),
            self.variables.len()
        );
        Ok(())
    }

    /// Reads and loads a script file.
    pub fn load_file(path: &str, host: &mut dyn ControlHost) -> Result<PlotApp, String> {
        let text =
            fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))?;
        let mut app = PlotApp::new();
        app.load_str(&text, host)?;
        Ok(app)
    }

    fn declare_plot(&mut self, cmd: LineCommand) {
        let lists: Vec<Vec<EquationEntry>> = cmd
            .lists
            .iter()
            .map(|list| self.variables.substitute_list(list))
            .collect();
        let free = free_parameters(&lists, &cmd.x_label);
        if self.plots.contains(&cmd.id) {
            warn!(
                "plot '{}' redeclared, previous configuration replaced",
                cmd.id
            );
        }
        self.sliders
            .seed_plot_defaults(&cmd.id, &cmd.x_label, &free);
        self.plots.insert(PlotConfig {
            id: cmd.id,
            expression_lists: lists,
            x_label: cmd.x_label,
            y_label: cmd.y_label,
            free_parameters: free,
        });
    }

    /// A free parameter that is also a stored variable means the assignment
    /// came after the plot that uses it, so substitution never ran for it.
    /// Assignments must appear in the script before the plot that uses them.
    fn check_declaration_order(&self) {
        for plot in self.plots.iter() {
            for param in &plot.free_parameters {
                if self.variables.contains(param) {
                    warn!(
                        "plot '{}' uses variable '{}' that was assigned after the plot was declared; it stays a free parameter",
                        plot.id, param
                    );
                }
            }
        }
    }

    /// The render contract exposed to the UI layer: one evaluated frame for
    /// a plot given the current axis range and parameter values.
    pub fn render_frame(
        &self,
        plot_id: &str,
        range: (f64, f64),
        params: &HashMap<String, f64>,
    ) -> Result<PlotFrame, String> {
        let cfg = self
            .plots
            .get(plot_id)
            .ok_or_else(|| format!("unknown plot id '{}'", plot_id))?;
        evaluate_plot(cfg, params, range)
    }

    /// Restores every control of a plot to its stored defaults in one batch.
    pub fn reset(&self, plot_id: &str, host: &mut dyn ControlHost) {
        self.sliders.reset(plot_id, host);
    }
}
