//! Static Chart Renderer
//! Renders the active view's chart to a PNG file with plotters.
//!
//! Layout per view:
//! - Overview: vertical stacked share bars, one per state, with legend.
//! - Brand Breakdown: two horizontal leaderboards side by side (Real, Sweeps).
//! - Keyword Detail: horizontal stacked share bars, one per keyword, 0-100 axis.

use crate::charts::palette::classification_rgb;
use crate::charts::plotter::category_label;
use crate::data::Classification;
use crate::stats::{BrandCount, KeywordDetail, Metric, StateShare, ViewResult};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("The SERP table view has no chart")]
    NoChart,
    #[error("Nothing to draw for the current filters")]
    Empty,
    #[error("Chart drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

fn rgb(classification: Classification) -> RGBColor {
    let (r, g, b) = classification_rgb(classification);
    RGBColor(r, g, b)
}

/// One stacked bar segment: category index, start, end, colour.
type Segment = (usize, f64, f64, RGBColor);

/// Stack classification shares per category in legend order.
fn stacked_segments(
    categories: &[String],
    shares: &HashMap<(&str, Classification), f64>,
) -> Vec<(Classification, Vec<Segment>)> {
    let mut base = vec![0.0; categories.len()];
    Classification::ALL
        .iter()
        .map(|&classification| {
            let segments = categories
                .iter()
                .enumerate()
                .filter_map(|(i, category)| {
                    let share = shares.get(&(category.as_str(), classification)).copied()?;
                    let start = base[i];
                    base[i] += share;
                    Some((i, start, base[i], rgb(classification)))
                })
                .collect();
            (classification, segments)
        })
        .collect()
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart for `result` into a PNG at `path`.
    pub fn render_png(
        result: &ViewResult,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        match result {
            ViewResult::SerpTable(_) => return Err(RenderError::NoChart),
            ViewResult::Overview(summary) if summary.rows.is_empty() => {
                return Err(RenderError::Empty)
            }
            ViewResult::KeywordDetail(detail) if detail.rows.is_empty() => {
                return Err(RenderError::Empty)
            }
            ViewResult::BrandBreakdown(b) if b.real.is_empty() && b.sweeps.is_empty() => {
                return Err(RenderError::Empty)
            }
            _ => {}
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        match result {
            ViewResult::Overview(summary) => Self::draw_state_share(&root, summary)?,
            ViewResult::BrandBreakdown(breakdown) => {
                let (left, right) = root.split_horizontally((width / 2) as i32);
                Self::draw_brands(
                    &left,
                    "Real Money Brands (Top 25)",
                    &breakdown.real,
                    rgb(Classification::Real),
                )?;
                Self::draw_brands(
                    &right,
                    "Sweepstakes Brands (Top 25)",
                    &breakdown.sweeps,
                    rgb(Classification::Sweeps),
                )?;
            }
            ViewResult::KeywordDetail(detail) => Self::draw_keyword_share(&root, detail)?,
            ViewResult::SerpTable(_) => {}
        }

        root.present().map_err(draw_err)?;
        tracing::info!(path = %path.display(), "Chart rendered");
        Ok(())
    }

    fn draw_state_share<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        summary: &StateShare,
    ) -> Result<(), RenderError> {
        let states = summary.states();
        let shares: HashMap<(&str, Classification), f64> = summary
            .rows
            .iter()
            .map(|r| ((r.state.as_str(), r.classification), r.share))
            .collect();
        let n = states.len() as f64;
        let title = match summary.metric {
            Metric::RawCount => "Stacked Share by Classification (Raw Counts)",
            Metric::PositionWeighted => {
                "Stacked Share by Classification (Position-Weighted)"
            }
        };

        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..100f64)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(states.len().max(1))
            .x_label_formatter(&|x| category_label(&states, *x))
            .x_desc("State")
            .y_desc("Share (%)")
            .draw()
            .map_err(draw_err)?;

        for (classification, segments) in stacked_segments(&states, &shares) {
            let color = rgb(classification);
            chart
                .draw_series(segments.into_iter().map(|(i, start, end, color)| {
                    let x = i as f64;
                    Rectangle::new([(x - 0.35, start), (x + 0.35, end)], color.filled())
                }))
                .map_err(draw_err)?
                .label(classification.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_keyword_share<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        detail: &KeywordDetail,
    ) -> Result<(), RenderError> {
        let keywords = detail.keywords();
        let shares: HashMap<(&str, Classification), f64> = detail
            .rows
            .iter()
            .map(|r| ((r.keyword.as_str(), r.classification), r.share))
            .collect();
        let n = keywords.len() as f64;

        let mut chart = ChartBuilder::on(area)
            .caption("Weighted Distribution by Keyword (0-100 %)", ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..100f64, -0.5f64..(n - 0.5))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(keywords.len().max(1))
            .y_label_formatter(&|y| category_label(&keywords, *y))
            .x_desc("Weighted Share (%)")
            .draw()
            .map_err(draw_err)?;

        for (classification, segments) in stacked_segments(&keywords, &shares) {
            let color = rgb(classification);
            chart
                .draw_series(segments.into_iter().map(|(i, start, end, color)| {
                    let y = i as f64;
                    Rectangle::new([(start, y - 0.35), (end, y + 0.35)], color.filled())
                }))
                .map_err(draw_err)?
                .label(classification.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_brands<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        title: &str,
        brands: &[BrandCount],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        // Top brand drawn at the highest y.
        let labels: Vec<String> = brands.iter().rev().map(|b| b.brand.clone()).collect();
        let max = brands.iter().map(|b| b.count).max().unwrap_or(1) as f64;
        let n = labels.len() as f64;

        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(140)
            .build_cartesian_2d(0f64..(max * 1.1), -0.5f64..(n.max(1.0) - 0.5))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(labels.len().max(1))
            .y_label_formatter(&|y| category_label(&labels, *y))
            .x_desc("Mentions")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(brands.iter().rev().enumerate().map(|(i, b)| {
                let y = i as f64;
                Rectangle::new([(0.0, y - 0.35), (b.count as f64, y + 0.35)], color.filled())
            }))
            .map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SerpRecord;
    use crate::stats::{brand_breakdown, keyword_detail, state_share, BrandBreakdown};

    fn sample_records() -> Vec<SerpRecord> {
        vec![
            SerpRecord::new("CA", "best online casino", Some(1), Classification::Real)
                .with_brands("BetMGM, FanDuel", ""),
            SerpRecord::new("CA", "best online casino", Some(2), Classification::Sweeps)
                .with_brands("", "Chumba"),
            SerpRecord::new("NY", "sweepstakes casino", Some(3), Classification::Both)
                .with_brands("BetMGM", "Pulsz"),
            SerpRecord::new("NY", "free slots", Some(5), Classification::Other),
        ]
    }

    fn assert_png_written(result: &ViewResult, name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);

        StaticChartRenderer::render_png(result, &path, 800, 600).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn renders_overview_chart() {
        let records = sample_records();
        let refs: Vec<&SerpRecord> = records.iter().collect();

        for metric in [Metric::RawCount, Metric::PositionWeighted] {
            let result = ViewResult::Overview(state_share(&refs, metric));
            assert_png_written(&result, "overview.png");
        }
    }

    #[test]
    fn renders_keyword_detail_chart() {
        let records = sample_records();
        let refs: Vec<&SerpRecord> = records.iter().collect();

        let result = ViewResult::KeywordDetail(keyword_detail(&refs));
        assert_png_written(&result, "keywords.png");
    }

    #[test]
    fn renders_brand_breakdown_chart() {
        let records = sample_records();
        let refs: Vec<&SerpRecord> = records.iter().collect();

        let result = ViewResult::BrandBreakdown(brand_breakdown(&refs));
        assert_png_written(&result, "brands.png");
    }

    #[test]
    fn renders_brand_breakdown_with_one_empty_side() {
        let records = vec![
            SerpRecord::new("CA", "best online casino", Some(1), Classification::Real)
                .with_brands("BetMGM, FanDuel", ""),
        ];
        let refs: Vec<&SerpRecord> = records.iter().collect();
        let breakdown = brand_breakdown(&refs);
        assert!(breakdown.sweeps.is_empty());

        assert_png_written(&ViewResult::BrandBreakdown(breakdown), "real_only.png");
    }

    #[test]
    fn serp_table_has_no_chart() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticChartRenderer::render_png(
            &ViewResult::SerpTable(Vec::new()),
            &dir.path().join("table.png"),
            800,
            600,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::NoChart));
    }

    #[test]
    fn empty_results_are_not_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let overview = ViewResult::Overview(StateShare {
            metric: Metric::RawCount,
            rows: Vec::new(),
        });
        assert!(matches!(
            StaticChartRenderer::render_png(&overview, &path, 800, 600),
            Err(RenderError::Empty)
        ));

        let brands = ViewResult::BrandBreakdown(BrandBreakdown {
            real: Vec::new(),
            sweeps: Vec::new(),
            combined: Vec::new(),
        });
        assert!(matches!(
            StaticChartRenderer::render_png(&brands, &path, 800, 600),
            Err(RenderError::Empty)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn segments_stack_in_legend_order() {
        let categories = vec!["CA".to_string()];
        let shares = HashMap::from([
            (("CA", Classification::Sweeps), 40.0),
            (("CA", Classification::Real), 60.0),
        ]);
        let stacked = stacked_segments(&categories, &shares);

        assert_eq!(stacked[0].0, Classification::Real);
        assert_eq!(stacked[0].1[0].1, 0.0);
        assert_eq!(stacked[0].1[0].2, 60.0);
        assert_eq!(stacked[1].1[0].1, 60.0);
        assert_eq!(stacked[1].1[0].2, 100.0);
        assert!(stacked[2].1.is_empty());
    }
}
