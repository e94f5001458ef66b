use crate::app::evaluate::PlotFrame;
use nalgebra::DVector;

fn y_extent(curves: &[(&str, (u8, u8, u8), &DVector<f64>)]) -> (f64, f64) {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, _, values) in curves {
        for &v in values.iter() {
            if v.is_finite() {
                y_min = y_min.min(v);
                y_max = y_max.max(v);
            }
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return (-1.0, 1.0);
    }
    if y_min == y_max {
        return (y_min - 1.0, y_max + 1.0);
    }
    (y_min, y_max)
}

pub fn render_png(frame: &PlotFrame, filename: &str) {
    use plotters::prelude::*;
    let x = &frame.grid;
    let x_min = x.min();
    let x_max = x.max();
    let curves = frame.curves();
    let failures = frame.failures();
    let (y_min, y_max) = y_extent(&curves);

    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root_area)
        .caption(&frame.plot_id, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .unwrap();

    chart
        .configure_mesh()
        .x_desc(&frame.x_label)
        .y_desc(&frame.y_label)
        .draw()
        .unwrap();

    for (label, (r, g, b), values) in &curves {
        let color = RGBColor(*r, *g, *b);
        let series: Vec<(f64, f64)> = x.iter().zip(values.iter()).map(|(&x, &y)| (x, y)).collect();
        chart
            .draw_series(LineSeries::new(series, &color))
            .unwrap()
            .label(format!(" {}", label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    // failed entries become inline annotations instead of curves
    for (i, (_, message)) in failures.iter().enumerate() {
        let y_pos = y_max - (i as f64 + 1.0) * (y_max - y_min) / 12.0;
        chart
            .draw_series(std::iter::once(Text::new(
                message.to_string(),
                (x_min, y_pos),
                ("sans-serif", 16),
            )))
            .unwrap();
    }

    if !curves.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .unwrap();
    }
}

/// whole-plot failure: a figure carrying nothing but the error text
pub fn render_error_png(plot_id: &str, message: &str, filename: &str) {
    use plotters::prelude::*;
    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).unwrap();

    let mut chart = ChartBuilder::on(&root_area)
        .caption(plot_id, ("sans-serif", 40))
        .margin(10)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .unwrap();

    chart
        .draw_series(std::iter::once(Text::new(
            format!("Error: {}", message),
            (0.05, 0.5),
            ("sans-serif", 20),
        )))
        .unwrap();
}

use gnuplot::{AxesCommon, Caption, Color, Figure};
pub fn render_gnuplot(frame: &PlotFrame, filename: &str) {
    let x = &frame.grid;
    let mut fg = Figure::new();
    {
        let axes = fg
            .axes2d()
            .set_title(&frame.plot_id, &[])
            .set_x_label(&frame.x_label, &[])
            .set_y_label(&frame.y_label, &[]);
        for (label, (r, g, b), values) in frame.curves() {
            let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
            let y_col: Vec<f64> = values.iter().copied().collect();
            axes.lines(
                x.as_slice(),
                &y_col,
                &[Caption(label), Color(gnuplot::RGBString(hex.as_str()))],
            );
        }
    }
    fg.save_to_png(filename, 800, 600).unwrap();
}
