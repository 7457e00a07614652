//! PNG rendering of figure models with `plotters`

use crate::error::{AaeError, Result};
use crate::figure::{Figure, GrayImage, HistogramPlot, ImageGrid};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const TITLE_HEIGHT: u32 = 40;
const CAPTION_HEIGHT: u32 = 18;
const MIN_CELL: u32 = 48;
const PIXEL_SCALE: u32 = 3;

/// Destination for the figures a diagnostics run produces
pub trait FigureSink {
    fn emit(&mut self, name: &str, figure: &Figure) -> Result<()>;
}

/// Writes every figure to `<dir>/<name>.png`
#[derive(Debug)]
pub struct PngSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| AaeError::io(&dir, e))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FigureSink for PngSink {
    fn emit(&mut self, name: &str, figure: &Figure) -> Result<()> {
        let path = self.dir.join(format!("{name}.png"));
        render(figure, &path)?;
        tracing::info!(path = %path.display(), "wrote figure");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps figures in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub figures: Vec<(String, Figure)>,
}

impl MemorySink {
    pub fn names(&self) -> Vec<&str> {
        self.figures.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Figure> {
        self.figures.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }
}

impl FigureSink for MemorySink {
    fn emit(&mut self, name: &str, figure: &Figure) -> Result<()> {
        self.figures.push((name.to_string(), figure.clone()));
        Ok(())
    }
}

fn render_err<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> AaeError + '_ {
    move |e| AaeError::render(&path.display().to_string(), e)
}

pub fn render(figure: &Figure, path: &Path) -> Result<()> {
    match figure {
        Figure::Images(grid) => render_grid(grid, path),
        Figure::Histogram(plot) => render_histogram(plot, path),
    }
}

fn render_grid(grid: &ImageGrid, path: &Path) -> Result<()> {
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(AaeError::render(&path.display().to_string(), "empty grid"));
    }

    let has_captions = grid.cells().iter().any(|c| c.caption.is_some());
    let cell = (grid.image_side() as u32 * PIXEL_SCALE).max(MIN_CELL);
    let cell_height = cell + if has_captions { CAPTION_HEIGHT } else { 0 };
    let title_height = if grid.title.is_some() { TITLE_HEIGHT } else { 0 };
    let size = (
        grid.cols() as u32 * cell,
        grid.rows() as u32 * cell_height + title_height,
    );

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err(path))?;

    let body = match grid.title {
        Some(ref title) => root.titled(title, ("sans-serif", 22)).map_err(render_err(path))?,
        None => root.clone(),
    };

    for (area, cell) in body.split_evenly((grid.rows(), grid.cols())).iter().zip(grid.cells()) {
        let area = match cell.caption {
            Some(ref caption) => area.titled(caption, ("sans-serif", 14)).map_err(render_err(path))?,
            None => area.clone(),
        };
        match cell.image {
            Some(ref image) => draw_image(&area, image).map_err(render_err(path))?,
            None => area.fill(&BLACK).map_err(render_err(path))?,
        }
    }

    root.present().map_err(render_err(path))
}

fn draw_image<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    image: &GrayImage,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (width, height) = area.dim_in_pixel();
    let side = image.side().max(1) as i32;
    let scale = (width.min(height) as i32 / side).max(1);

    area.fill(&BLACK)?;
    for (i, &value) in image.pixels().iter().enumerate() {
        let (row, col) = (i as i32 / side, i as i32 % side);
        let level = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        if level == 0 {
            continue;
        }
        let top_left = (col * scale, row * scale);
        let bottom_right = ((col + 1) * scale, (row + 1) * scale);
        area.draw(&Rectangle::new(
            [top_left, bottom_right],
            RGBColor(level, level, level).filled(),
        ))?;
    }
    Ok(())
}

fn render_histogram(plot: &HistogramPlot, path: &Path) -> Result<()> {
    let hist = &plot.histogram;
    let edges = hist.bin_edges();
    let lo = hist.min_value;
    let hi = edges.last().copied().unwrap_or(lo + 1.0).max(lo + f64::EPSILON);
    let y_max = hist.bin_counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err(path))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&plot.title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0.0..y_max)
        .map_err(render_err(path))?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc("count");
    if let Some(ref x_label) = plot.x_label {
        mesh.x_desc(x_label.as_str());
    }
    mesh.draw().map_err(render_err(path))?;

    chart
        .draw_series(edges.windows(2).zip(&hist.bin_counts).map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(render_err(path))?;

    root.present().map_err(render_err(path))
}
