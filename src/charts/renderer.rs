//! Static Chart Renderer
//! Writes the dashboard charts as PNG files using plotters.
//!
//! Charts:
//! 1. Price distribution (histogram of discount price)
//! 2. Mean discount per brand (bars, highest first)
//! 3. Price vs rating (scatter)
//! 4. Products per brand (bars, most first)
//! 5. Rating vs review volume (scatter, optional)

use super::chart_data::{ChartData, ChartOptions};
use crate::stats::HistogramBin;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(91, 155, 213);
const ACCENT_COLOR: RGBColor = RGBColor(237, 125, 49);
const POINT_COLOR: RGBColor = RGBColor(52, 152, 219);

pub const PRICE_DISTRIBUTION_FILE: &str = "price_distribution.png";
pub const MEAN_DISCOUNT_FILE: &str = "mean_discount_by_brand.png";
pub const PRICE_VS_RATING_FILE: &str = "price_vs_rating.png";
pub const PRODUCTS_BY_BRAND_FILE: &str = "products_by_brand.png";
pub const RATING_VS_REVIEWS_FILE: &str = "rating_vs_reviews.png";

const NO_DATA: &str = "No products match the current filters";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create chart directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer {
    options: ChartOptions,
}

impl StaticChartRenderer {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    /// Render every chart into the output directory and return the written paths.
    pub fn render_all(&self, data: &ChartData) -> Result<Vec<PathBuf>, RenderError> {
        let dir = &self.options.output_dir;
        std::fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut written = Vec::new();

        let path = dir.join(PRICE_DISTRIBUTION_FILE);
        self.render_histogram(&path, &data.price_histogram)?;
        written.push(path);

        let path = dir.join(MEAN_DISCOUNT_FILE);
        self.render_bars(
            &path,
            "Brands with the highest average discount",
            "Average discount (%)",
            &data.mean_discount_by_brand,
            ACCENT_COLOR,
        )?;
        written.push(path);

        let path = dir.join(PRICE_VS_RATING_FILE);
        self.render_scatter(
            &path,
            "Price vs customer rating",
            "Discount price",
            "Rating",
            &data.price_vs_rating,
        )?;
        written.push(path);

        let path = dir.join(PRODUCTS_BY_BRAND_FILE);
        self.render_bars(
            &path,
            "Products per brand",
            "Products",
            &data.count_by_brand,
            BAR_COLOR,
        )?;
        written.push(path);

        if self.options.review_volume {
            let path = dir.join(RATING_VS_REVIEWS_FILE);
            self.render_scatter(
                &path,
                "Rating vs number of reviews",
                "Number of reviews",
                "Rating",
                &data.reviews_vs_rating,
            )?;
            written.push(path);
        }

        info!(dir = %dir.display(), charts = written.len(), "Rendered charts");
        Ok(written)
    }

    fn root<'a>(&self, path: &'a Path) -> Result<Root<'a>, RenderError> {
        let root =
            BitMapBackend::new(path, (self.options.width, self.options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        Ok(root)
    }

    pub fn render_histogram(&self, path: &Path, bins: &[HistogramBin]) -> Result<(), RenderError> {
        let title = "Price distribution";
        let root = self.root(path)?;

        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            Self::draw_placeholder(&root, title)?;
            return root.present().map_err(draw_err);
        };

        let peak = bins.iter().map(|b| b.count).max().unwrap_or(0) as u32;
        let y_top = peak + (peak / 10).max(1);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(first.lower..last.upper, 0u32..y_top)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Discount price")
            .y_desc("Products")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new(
                    [(b.lower, 0u32), (b.upper, b.count as u32)],
                    BAR_COLOR.mix(0.8).filled(),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    pub fn render_bars(
        &self,
        path: &Path,
        title: &str,
        y_desc: &str,
        bars: &[(String, f64)],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        let root = self.root(path)?;
        if bars.is_empty() {
            Self::draw_placeholder(&root, title)?;
            return root.present().map_err(draw_err);
        }

        let (y_lo, y_hi) = Self::bar_range(bars.iter().map(|(_, v)| *v));
        let labels: Vec<&str> = bars.iter().map(|(l, _)| l.as_str()).collect();
        let label_fmt = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).map(|l| l.to_string()).unwrap_or_default(),
            _ => String::new(),
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(120)
            .y_label_area_size(60)
            .build_cartesian_2d((0..bars.len()).into_segmented(), y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len())
            .x_label_formatter(&label_fmt)
            .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
            .x_desc("Brand")
            .y_desc(y_desc)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(6)
                    .data(bars.iter().enumerate().map(|(i, (_, v))| (i, *v))),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    pub fn render_scatter(
        &self,
        path: &Path,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        points: &[(f64, f64)],
    ) -> Result<(), RenderError> {
        let root = self.root(path)?;
        if points.is_empty() {
            Self::draw_placeholder(&root, title)?;
            return root.present().map_err(draw_err);
        }

        let (x_lo, x_hi) = Self::axis_range(points.iter().map(|p| p.0));
        let (y_lo, y_hi) = Self::axis_range(points.iter().map(|p| p.1));

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, POINT_COLOR.mix(0.4).filled())),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    fn draw_placeholder(root: &Root<'_>, title: &str) -> Result<(), RenderError> {
        let (w, h) = root.dim_in_pixel();
        let area = root.titled(title, (FONT, 24)).map_err(draw_err)?;
        let grey = BLACK.mix(0.6);
        let style = TextStyle::from((FONT, 18).into_font())
            .color(&grey)
            .pos(Pos::new(HPos::Center, VPos::Center));
        area.draw(&Text::new(NO_DATA, (w as i32 / 2, h as i32 / 2 - 30), style))
            .map_err(draw_err)
    }

    /// Value axis for bars, always including zero.
    fn bar_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo == hi {
            return (0.0, 1.0);
        }
        let pad = (hi - lo) * 0.1;
        (if lo < 0.0 { lo - pad } else { 0.0 }, hi + pad)
    }

    /// Padded range of a scatter axis; a single value is widened by one unit each way.
    fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        if lo == hi {
            return (lo - 1.0, hi + 1.0);
        }
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}
