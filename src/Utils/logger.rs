use crate::app::evaluate::{PlotFrame, SeriesOutcome};
use chrono::Local;
use csv::Writer;
use log::warn;
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{self, Write as IoWrite};

/// collect the successful series of a frame into headers plus a value matrix,
/// one column per series; failed entries are skipped with a warning
fn frame_table(frame: &PlotFrame) -> (Vec<String>, DMatrix<f64>) {
    let mut headers = Vec::new();
    let mut columns = Vec::new();
    for list in &frame.lists {
        for series in list {
            match &series.outcome {
                SeriesOutcome::Values(values) => {
                    headers.push(series.label.clone());
                    columns.push(values);
                }
                SeriesOutcome::Failed(message) => {
                    warn!("series '{}' skipped in export: {}", series.label, message);
                }
            }
        }
    }
    let matrix = DMatrix::from_fn(frame.grid.len(), columns.len(), |row, col| columns[col][row]);
    (headers, matrix)
}

pub fn save_frame_to_file(frame: &PlotFrame, filename: &str) -> io::Result<()> {
    let (headers, matrix) = frame_table(frame);
    let mut file = File::create(filename)?;
    writeln!(
        file,
        "# {} exported {}",
        frame.plot_id,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    let mut headers_with_x = Vec::new();
    headers_with_x.push(frame.x_label.clone());
    headers_with_x.extend(headers.iter().cloned());
    writeln!(file, "{}", headers_with_x.join("\t"))?;
    for (i, row) in matrix.row_iter().enumerate() {
        let mut row_data = Vec::new();
        row_data.push(frame.grid[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writeln!(file, "{}", row_data.join("\t"))?;
    }

    Ok(())
}

pub fn save_frame_to_csv(frame: &PlotFrame, filename: &str) -> io::Result<()> {
    let (headers, matrix) = frame_table(frame);
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let mut headers_with_x = Vec::new();
    headers_with_x.push(frame.x_label.clone());
    headers_with_x.extend(headers.iter().cloned());
    writer.write_record(&headers_with_x)?;

    for (i, row) in matrix.row_iter().enumerate() {
        let mut row_data = Vec::new();
        row_data.push(frame.grid[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::EquationEntry;
    use crate::app::evaluate::evaluate_plot;
    use crate::app::registry::PlotConfig;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn demo_frame() -> PlotFrame {
        let cfg = PlotConfig {
            id: "p1".to_string(),
            expression_lists: vec![vec![
                EquationEntry::parse("a = v * 2").unwrap(),
                EquationEntry::parse("broken = log(-1)").unwrap(),
            ]],
            x_label: "v".to_string(),
            y_label: "y".to_string(),
            free_parameters: vec![],
        };
        evaluate_plot(&cfg, &HashMap::new(), (0.0, 1.0)).unwrap()
    }

    #[test]
    fn test_csv_export_skips_failed_series() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p1.csv");
        let frame = demo_frame();
        save_frame_to_csv(&frame, path.to_str().unwrap()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "v,a");
        // header plus one row per grid point
        assert_eq!(contents.lines().count(), 1 + frame.grid.len());
    }

    #[test]
    fn test_tab_export_writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p1.txt");
        let frame = demo_frame();
        save_frame_to_file(&frame, path.to_str().unwrap()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("# p1 exported "));
        assert_eq!(lines.next().unwrap(), "v\ta");
        assert_eq!(contents.lines().count(), 2 + frame.grid.len());
    }
}
