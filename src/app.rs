//! the configuration-to-executable-model pipeline: script commands in,
//! renderable series out
/// parse one script line into a typed command (assignment, plot declaration,
/// slider directive) with per-field literal classification
pub mod commands;
/// the reactive recomputation core: grid construction and per-entry
/// evaluation with failure isolation
pub mod evaluate;
/// static free-parameter detection: which identifiers of an expression need
/// an interactive control
pub mod parameters;
/// plot registry and the process-wide [`registry::PlotApp`] context built at load time
pub mod registry;
/// slider specs, the directive dispatcher and the control-host seam to the UI
pub mod sliders;
/// insertion-ordered variable store and the textual substitution engine
pub mod variable_store;
