//! Missing-values bar chart.

use crate::render::axis_label;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;
use tracing::debug;

const TITLE: &str = "Missing Values by Column";
const X_DESC: &str = "Columns";
const Y_DESC: &str = "Missing Value Count";

/// Fraction of a slot left empty on each side of its bar.
const BAR_GAP: f64 = 0.1;

pub(super) fn draw(counts: &[(String, usize)], path: &Path, size: (u32, u32)) -> anyhow::Result<()> {
    debug!("Drawing missing-values chart for {} columns to {}", counts.len(), path.display());

    let labels: Vec<String> = counts.iter().map(|(name, _)| axis_label(name)).collect();
    let y_max = y_axis_max(counts);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(x_label_area_size(&labels))
        .y_label_area_size(70)
        .build_cartesian_2d(x_range(counts.len()), 0u64..y_max)?;

    // Column names are drawn below; the mesh only contributes the axis line.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .axis_desc_style(("sans-serif", 16))
        .x_label_formatter(&|_| String::new())
        .set_tick_mark_size(LabelAreaPosition::Bottom, 0)
        .draw()?;

    let bar_color = RGBColor(76, 114, 176);
    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        let (left, right) = bar_span(i);
        Rectangle::new([(left, 0u64), (right, *count as u64)], bar_color.filled())
    }))?;

    let label_style = TextStyle::from(
        ("sans-serif", 14)
            .into_font()
            .transform(FontTransform::Rotate90),
    )
    .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, label) in labels.iter().enumerate() {
        let center = i as f64 + 0.5;
        chart.plotting_area().draw(
            &(EmptyElement::at((center, 0u64))
                + Text::new(label.clone(), (0, 6), label_style.clone())),
        )?;
    }

    root.present()?;
    Ok(())
}

/// One unit-wide slot per column, with no trailing slot.
fn x_range(columns: usize) -> Range<f64> {
    0.0..columns.max(1) as f64
}

/// Horizontal extent of the bar in slot `index`.
fn bar_span(index: usize) -> (f64, f64) {
    let left = index as f64;
    (left + BAR_GAP, left + 1.0 - BAR_GAP)
}

/// Upper bound of the count axis, leaving headroom above the tallest bar.
fn y_axis_max(counts: &[(String, usize)]) -> u64 {
    let tallest = counts.iter().map(|(_, count)| *count as u64).max().unwrap_or(0);
    tallest + tallest / 10 + 1
}

/// Room for the rotated column names plus the axis description under them.
fn x_label_area_size(labels: &[String]) -> u32 {
    let longest = labels.iter().map(|n| n.chars().count()).max().unwrap_or(0) as u32;
    (longest * 8 + 40).clamp(60, 240)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_slot_per_column() {
        for columns in [1usize, 3, 12] {
            let range = x_range(columns);
            assert_eq!(range.end - range.start, columns as f64);

            let (_, last_right) = bar_span(columns - 1);
            assert!(last_right < range.end);
            assert!(range.end - last_right <= BAR_GAP + 1e-9, "trailing slot for {columns}");
        }
    }

    #[test]
    fn test_single_bar_is_centered() {
        let range = x_range(1);
        let (left, right) = bar_span(0);
        let left_gap = left - range.start;
        let right_gap = range.end - right;
        assert!((left_gap - right_gap).abs() < 1e-9);
    }

    #[test]
    fn test_y_axis_max_has_headroom() {
        let counts = vec![("a".to_string(), 4), ("b".to_string(), 50)];
        assert_eq!(y_axis_max(&counts), 56);
        assert_eq!(y_axis_max(&[]), 1);
    }

    #[test]
    fn test_x_label_area_size_bounds() {
        assert_eq!(x_label_area_size(&["id".to_string()]), 60);
        let long = axis_label("a_really_long_column_name_for_testing");
        assert_eq!(x_label_area_size(&[long]), 240);
    }
}
