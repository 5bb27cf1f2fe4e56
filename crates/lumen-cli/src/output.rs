//! Image writers.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use lumen_trace::Canvas;

/// Longest line a plain PPM file may contain.
const PPM_LINE_WIDTH: usize = 70;

/// Write `canvas` to `path`, choosing the format from the extension.
pub fn write(canvas: &Canvas, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => write_png(canvas, path),
        Some("ppm") => fs::write(path, to_ppm(canvas)).context("failed to write PPM"),
        _ => bail!(
            "unsupported output format for {} (expected .png or .ppm)",
            path.display()
        ),
    }
}

fn write_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let width = u32::try_from(canvas.width()).context("canvas too wide")?;
    let height = u32::try_from(canvas.height()).context("canvas too tall")?;
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb(canvas.pixel_at(x as usize, y as usize).to_rgb8())
    });
    img.save_with_format(path, ImageFormat::Png)
        .context("failed to encode PNG")
}

/// Encode `canvas` as plain-text PPM (P3).
///
/// Each pixel row starts a new line and lines are wrapped before they
/// exceed 70 characters.
pub fn to_ppm(canvas: &Canvas) -> String {
    let mut out = format!("P3\n{} {}\n255\n", canvas.width(), canvas.height());
    for y in 0..canvas.height() {
        let mut line = String::new();
        for x in 0..canvas.width() {
            for channel in canvas.pixel_at(x, y).to_rgb8() {
                let value = channel.to_string();
                if !line.is_empty() && line.len() + 1 + value.len() > PPM_LINE_WIDTH {
                    out.push_str(&line);
                    out.push('\n');
                    line.clear();
                }
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&value);
            }
        }
        let _ = writeln!(out, "{line}");
    }
    out
}
