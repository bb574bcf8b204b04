//! Static Chart Renderer
//! Writes PNG charts for the dashboard views with plotters.
//!
//! Chart kinds:
//! 1. Line: funding by year (undated amounts are left off the axis)
//! 2. Horizontal bars: any ranking (sectors, cities, investors, startups)
//! 3. Pie: city share of rounds / of funding

use crate::report::{CompanyReport, InvestorReport, LabeledValue, OverviewReport, YearAmount};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const LINE: RGBColor = RGBColor(52, 152, 219); // Blue
const BAR: RGBColor = RGBColor(91, 155, 213);

const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(255, 87, 34),   // Deep Orange
    RGBColor(121, 85, 72),   // Brown
    RGBColor(96, 125, 139),  // Blue Grey
];

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create chart directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw {chart}: {message}")]
    Draw { chart: String, message: String },
}

pub struct StaticChartRenderer {
    width: u32,
    height: u32,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Overview page charts. Returns the files written.
    pub fn render_overview(&self, report: &OverviewReport, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        Self::ensure_dir(dir)?;
        let mut written = Vec::new();

        self.collect(&mut written, dir, "funding_trend.png", |path| {
            self.line_chart(path, "Total Funding by Year (Cr)", &report.funding_by_year)
        })?;
        self.collect(&mut written, dir, "top_sectors.png", |path| {
            self.bar_chart(path, "Top Sectors by Funding (Cr)", "Amount (Cr)", &report.top_sectors)
        })?;
        self.collect(&mut written, dir, "top_cities.png", |path| {
            self.bar_chart(path, "Top Cities by Funding (Cr)", "Amount (Cr)", &report.top_cities)
        })?;
        self.collect(&mut written, dir, "top_investors.png", |path| {
            self.bar_chart(path, "Top Investors by Funding (Cr)", "Amount (Cr)", &report.top_investors)
        })?;
        self.collect(&mut written, dir, "city_rounds.png", |path| {
            self.pie_chart(path, "Top Cities by Funding Rounds", &report.city_rounds)
        })?;
        self.collect(&mut written, dir, "city_amounts.png", |path| {
            self.pie_chart(path, "Top Cities by Funding Amount", &report.city_amounts)
        })?;

        Ok(written)
    }

    /// Company page chart: the startup's funding trend.
    pub fn render_company(&self, report: &CompanyReport, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        Self::ensure_dir(dir)?;
        let mut written = Vec::new();
        let title = format!("{}: Funding by Year (Cr)", report.name);
        self.collect(&mut written, dir, "funding_trend.png", |path| {
            self.line_chart(path, &title, &report.funding_by_year)
        })?;
        Ok(written)
    }

    /// Investor page charts: funding trend and sector distribution.
    pub fn render_investor(&self, report: &InvestorReport, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        Self::ensure_dir(dir)?;
        let mut written = Vec::new();
        self.collect(&mut written, dir, "funding_trend.png", |path| {
            self.line_chart(path, "Funding Trend Over Time", &report.funding_by_year)
        })?;
        self.collect(&mut written, dir, "sector_distribution.png", |path| {
            self.bar_chart(
                path,
                "Sector Distribution of Investments",
                "Number of Investments",
                &report.sector_distribution,
            )
        })?;
        Ok(written)
    }

    /// Draw one chart into `dir/file`; `Ok(false)` from `draw` means nothing to plot.
    fn collect<F>(&self, written: &mut Vec<PathBuf>, dir: &Path, file: &str, draw: F) -> Result<(), ChartError>
    where
        F: FnOnce(&Path) -> Result<bool, Box<dyn std::error::Error>>,
    {
        let path = dir.join(file);
        match draw(&path) {
            Ok(true) => {
                debug!(path = %path.display(), "chart written");
                written.push(path);
                Ok(())
            }
            Ok(false) => {
                debug!(chart = file, "no data, chart skipped");
                Ok(())
            }
            Err(e) => Err(ChartError::Draw {
                chart: file.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Funding-by-year line with point markers.
    pub fn line_chart(&self, path: &Path, title: &str, series: &[YearAmount]) -> Result<bool, Box<dyn std::error::Error>> {
        let points: Vec<(i32, f64)> = series
            .iter()
            .filter_map(|p| p.year.map(|year| (year, p.amount_cr)))
            .collect();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Ok(false);
        };

        let x_range = (first.0 - 1)..(last.0 + 1);
        let y_max = Self::axis_max(points.iter().map(|p| p.1));

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Amount (Cr)")
            .x_label_formatter(&|year| year.to_string())
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().copied(), LINE.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, LINE.filled())),
        )?;

        root.present()?;
        Ok(true)
    }

    /// Horizontal bars, largest first from the top.
    pub fn bar_chart(
        &self,
        path: &Path,
        title: &str,
        value_desc: &str,
        rows: &[LabeledValue],
    ) -> Result<bool, Box<dyn std::error::Error>> {
        if rows.is_empty() {
            return Ok(false);
        }

        // plotters counts segments bottom-up; reverse so rank 1 sits on top
        let labels: Vec<&str> = rows.iter().rev().map(|r| r.label.as_str()).collect();
        let n = labels.len();
        let x_max = Self::axis_max(rows.iter().map(|r| r.value));
        let label_area = Self::label_area(&labels);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(label_area)
            .build_cartesian_2d(0f64..x_max, (0usize..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .x_desc(value_desc)
            .y_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(i) => labels.get(*i).map(|l| l.to_string()).unwrap_or_default(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::horizontal(&chart)
                .style(BAR.filled())
                .margin(6)
                .data(rows.iter().rev().enumerate().map(|(i, r)| (i, r.value))),
        )?;

        root.present()?;
        Ok(true)
    }

    /// Pie of shares with percentage labels.
    pub fn pie_chart(&self, path: &Path, title: &str, rows: &[LabeledValue]) -> Result<bool, Box<dyn std::error::Error>> {
        let rows: Vec<&LabeledValue> = rows.iter().filter(|r| r.value > 0.0).collect();
        if rows.is_empty() {
            return Ok(false);
        }

        let sizes: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
        let colors: Vec<RGBColor> = (0..rows.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(title, (FONT, 24))?;

        let (w, h) = root.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = f64::from(w.min(h)) * 0.35;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style((FONT, 14).into_font().color(&BLACK));
        pie.percentages((FONT, 12).into_font().color(&WHITE));
        root.draw(&pie)?;

        root.present()?;
        Ok(true)
    }

    /// Upper bound of a value axis with 10% headroom.
    fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(0.0_f64, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// Pixel width for category labels, from the longest label.
    fn label_area(labels: &[&str]) -> u32 {
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
        (longest * 8).clamp(60, 320)
    }

    fn ensure_dir(dir: &Path) -> Result<(), ChartError> {
        fs::create_dir_all(dir).map_err(|source| ChartError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })
    }
}

impl Default for StaticChartRenderer {
    fn default() -> Self {
        Self::new(1000, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_max_has_headroom_and_floor() {
        let max = StaticChartRenderer::axis_max([10.0, 50.0].into_iter());
        assert!((max - 55.0).abs() < 1e-9);
        assert_eq!(StaticChartRenderer::axis_max(std::iter::empty()), 1.0);
    }

    #[test]
    fn label_area_is_clamped() {
        assert_eq!(StaticChartRenderer::label_area(&["a"]), 60);
        let long = "x".repeat(100);
        assert_eq!(StaticChartRenderer::label_area(&[long.as_str()]), 320);
    }
}
