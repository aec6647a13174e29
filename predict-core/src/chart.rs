//! Probability Comparison Chart
//!
//! Horizontal bar chart, one bar per model that produced a probability,
//! rendered to an SVG string.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{ModelError, ModelResult};
use crate::inference::{format_percent, ModelProbability};

/// Output size in pixels (8x4 inches at 100 dpi)
pub const CHART_SIZE: (u32, u32) = (800, 400);

const BAR_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const AXIS_COLOR: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);
const BAR_HEIGHT: f64 = 0.35;
const LABEL_OFFSET: f64 = 0.01;

fn chart_err<E: std::fmt::Display>(e: E) -> ModelError {
    ModelError::Chart(e.to_string())
}

/// SVG document comparing the probabilities, or `None` when there are none
pub fn render_comparison_chart(probabilities: &[ModelProbability]) -> ModelResult<Option<String>> {
    if probabilities.is_empty() {
        return Ok(None);
    }

    let n = probabilities.len();
    let rows: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let name_at = |y: &f64| -> String {
        let i = y.round();
        if i < 0.0 || (y - i).abs() > 1e-6 {
            return String::new();
        }
        probabilities
            .get(i as usize)
            .map(|p| p.model.clone())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Comparación entre modelos",
                ("sans-serif", 18).into_font().style(FontStyle::Bold),
            )
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(170)
            .build_cartesian_2d(0f64..1f64, (-0.5f64..n as f64 - 0.5).with_key_points(rows))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(AXIS_COLOR.stroke_width(1))
            .x_labels(6)
            .x_label_formatter(&|x| format!("{x:.1}"))
            .y_labels(n)
            .y_label_formatter(&name_at)
            .label_style(("sans-serif", 12).into_font().color(&BLACK))
            .x_desc("Probabilidad de Infarto")
            .y_desc("Modelo")
            .axis_desc_style(("sans-serif", 14).into_font().color(&BLACK))
            .draw()
            .map_err(chart_err)?;

        let half = BAR_HEIGHT / 2.0;
        chart
            .draw_series(probabilities.iter().enumerate().map(|(i, p)| {
                let y = i as f64;
                Rectangle::new([(0.0, y - half), (p.probability, y + half)], BAR_COLOR.filled())
            }))
            .map_err(chart_err)?;
        // white edge around each bar
        chart
            .draw_series(probabilities.iter().enumerate().map(|(i, p)| {
                let y = i as f64;
                Rectangle::new([(0.0, y - half), (p.probability, y + half)], WHITE.stroke_width(1))
            }))
            .map_err(chart_err)?;

        let value_style = ("sans-serif", 11)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart
            .draw_series(probabilities.iter().enumerate().map(|(i, p)| {
                Text::new(
                    format_percent(p.probability, 1),
                    (p.probability + LABEL_OFFSET, i as f64),
                    value_style.clone(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(Some(svg))
}
