#![allow(non_snake_case)]
use RustedPlotKit::Utils::logger::save_frame_to_csv;
use RustedPlotKit::Utils::plots::{render_error_png, render_png};
use RustedPlotKit::app::registry::PlotApp;
use RustedPlotKit::app::sliders::LoggingControlHost;
use log::{error, info};
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use tabled::{builder::Builder, settings::Style};

// fallback script served when no path is given: the Butler-Volmer demo the
// engine grew up on
const DEMO_SCRIPT: &str = r#"
# ---------- VARIABLE DEFINITIONS ----------
kf = k * np.exp(-beta * F * (voltage - U) / (1000 * 8.314 * T))
kb = k * np.exp((1 - beta) * F * (voltage - U) / (1000 * 8.314 * T))
area = 1
n = 1
F = 96485

# ---------- PLOT BLOCK ----------
line("func1", ["i_conc_a = n * F * area * kb * conc", "i_conc_c = -n * F * area * kf * conc", "i_total = i_conc_a + i_conc_c"], ["kf = kf", "kb = kb"], "voltage", "Rate of reaction")

# ---------- SLIDER DEFINITIONS ----------
sliderupdate("func1", "k", -11, 0, -4, 0.001)
sliderupdate("func1", "T", 50, 2000, 373, 25)
sliderupdate("func1", "U", -1000, 1000, 0, 5)
sliderupdate("func1", "beta", 0, 1, 0.5, 0.0001)
sliderupdate("func1", "conc", 0, 2, 0.5, 0.0001)
sliderupdate("func1", "x_range_line", -1000, 1000, [-250, 250], 50, "voltage")
"#;

fn main() {
    let _ = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);

    let text = match env::args().nth(1) {
        Some(path) => match fs::read_to_string(&path) {
            Ok(text) => {
                info!("reading commands from {}", path);
                text
            }
            Err(e) => {
                error!("cannot read '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            info!("no script path given, using the built-in demo script");
            DEMO_SCRIPT.to_string()
        }
    };

    let mut host = LoggingControlHost;
    let mut app = PlotApp::new();
    if let Err(e) = app.load_str(&text, &mut host) {
        error!("configuration load failed: {}", e);
        std::process::exit(1);
    }

    let mut builder = Builder::default();
    builder.push_record(["plot", "x", "y", "equations", "free parameters"]);
    for plot in app.plots.iter() {
        let n_equations: usize = plot.expression_lists.iter().map(|list| list.len()).sum();
        builder.push_record([
            plot.id.clone(),
            plot.x_label.clone(),
            plot.y_label.clone(),
            n_equations.to_string(),
            plot.free_parameters.join(", "),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    info!("\n \n LOADED CONFIGURATION \n \n {}", table.to_string());

    // one pass over every plot at its stored slider defaults
    for plot in app.plots.iter() {
        let params = app.sliders.default_bindings(&plot.id);
        let range = app.sliders.default_axis_range(&plot.id);
        let png_name = format!("{}.png", plot.id);
        match app.render_frame(&plot.id, range, &params) {
            Ok(frame) => {
                render_png(&frame, &png_name);
                let csv_name = format!("{}.csv", plot.id);
                if let Err(e) = save_frame_to_csv(&frame, &csv_name) {
                    error!("saving '{}' failed: {}", csv_name, e);
                }
                info!(
                    "plot '{}' rendered to {} and exported to {}",
                    plot.id, png_name, csv_name
                );
            }
            Err(e) => {
                render_error_png(&plot.id, &e, &png_name);
                error!("plot '{}' failed: {}", plot.id, e);
            }
        }
    }
}
