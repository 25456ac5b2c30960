//! Annotated correlation heatmap.

use crate::render::axis_label;
use crate::render::palette::{self, diverging};
use crate::types::CorrelationMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::{debug, warn};

const TITLE: &str = "Correlation Matrix";
const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 100;
const COLORBAR_TICKS: [f64; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];

/// Cell labels become unreadable beyond this many columns.
const MAX_ANNOTATED_COLUMNS: usize = 40;

pub(super) fn draw(matrix: &CorrelationMatrix, path: &Path, size: (u32, u32)) -> anyhow::Result<()> {
    let n = matrix.size();
    let columns = &matrix.columns;
    debug!("Drawing {}x{} heatmap to {}", n, n, path.display());

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let (grid_area, bar_area) = root.split_horizontally(size.0.saturating_sub(COLORBAR_WIDTH));

    let label_area = label_area_size(columns);
    let mut chart = ChartBuilder::on(&grid_area)
        .caption(TITLE, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d(0i32..n as i32, n as i32..0i32)?;

    let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
    let cell_w = (plot_w / n.max(1) as u32) as i32;
    let cell_h = (plot_h / n.max(1) as u32) as i32;

    let label_for = |v: &i32| -> String {
        usize::try_from(*v)
            .ok()
            .and_then(|i| columns.get(i))
            .map(|name| axis_label(name))
            .unwrap_or_default()
    };

    // Column names along the x axis are drawn by hand below the grid.
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(n + 1)
        .y_label_offset(cell_h / 2)
        .y_label_style(("sans-serif", 14))
        .y_label_formatter(&label_for)
        .draw()?;

    let cells: Vec<(i32, i32, f64)> = matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, value)| (col as i32, row as i32, *value))
        })
        .collect();

    chart.draw_series(
        cells
            .iter()
            .map(|&(x, y, value)| Rectangle::new([(x, y), (x + 1, y + 1)], diverging(value).filled())),
    )?;

    if n <= MAX_ANNOTATED_COLUMNS {
        let font_px = f64::from((cell_h.min(cell_w) / 4).clamp(8, 20));
        chart.draw_series(cells.iter().map(|&(x, y, value)| {
            let color: &'static RGBColor = if palette::needs_light_text(value) {
                &WHITE
            } else {
                &BLACK
            };
            let style = TextStyle::from(("sans-serif", font_px).into_font())
                .pos(Pos::new(HPos::Center, VPos::Center))
                .color(color);
            EmptyElement::at((x, y)) + Text::new(cell_label(value), (cell_w / 2, cell_h / 2), style)
        }))?;
    } else {
        warn!(
            "{} numeric columns exceed {}; heatmap cells are drawn without labels",
            n, MAX_ANNOTATED_COLUMNS
        );
    }

    let x_label_style = TextStyle::from(
        ("sans-serif", 14)
            .into_font()
            .transform(FontTransform::Rotate90),
    )
    .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, name) in columns.iter().enumerate() {
        chart.plotting_area().draw(
            &(EmptyElement::at((i as i32, n as i32))
                + Text::new(axis_label(name), (cell_w / 2, 6), x_label_style.clone())),
        )?;
    }

    draw_colorbar(&bar_area)?;
    root.present()?;
    Ok(())
}

fn draw_colorbar(area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>) -> anyhow::Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(40)
        .margin_left(10)
        .margin_right(60)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

    let step = 2.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let low = -1.0 + i as f64 * step;
        let color = diverging(low + step / 2.0);
        Rectangle::new([(0.0, low), (1.0, low + step)], color.filled())
    }))?;

    let plot = bar.plotting_area();
    plot.draw(&Rectangle::new([(0.0, -1.0), (1.0, 1.0)], BLACK.stroke_width(1)))?;

    let tick_style =
        TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    for value in COLORBAR_TICKS {
        plot.draw(
            &(EmptyElement::at((1.0, value))
                + PathElement::new(vec![(0, 0), (5, 0)], BLACK)
                + Text::new(colorbar_label(value), (8, 0), tick_style.clone())),
        )?;
    }
    Ok(())
}

fn colorbar_label(value: f64) -> String {
    format!("{:.1}", value)
}

/// Cell annotation with two decimals.
pub(super) fn cell_label(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let label = format!("{:.2}", value);
    if label == "-0.00" {
        "0.00".to_string()
    } else {
        label
    }
}

fn label_area_size(columns: &[String]) -> u32 {
    let longest = columns
        .iter()
        .map(|c| axis_label(c).chars().count())
        .max()
        .unwrap_or(0) as u32;
    (longest * 8 + 20).clamp(40, 220)
}
