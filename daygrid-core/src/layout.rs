//! Vertical projection of sessions onto the day grid.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time::to_time_string;
use crate::types::Session;

/// Smallest height a session box is drawn with, in pixels.
pub const MIN_HEIGHT_PX: f64 = 1.0;

/// Scale and origin of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Wall-clock minute drawn at pixel 0 (330 for 05:30)
    pub day_start_minutes: u32,
    /// Vertical pixels per minute
    pub pixels_per_minute: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            day_start_minutes: 330,
            pixels_per_minute: 1.6,
        }
    }
}

impl ProjectionConfig {
    /// Pixel offset of a wall-clock minute. Negative before the day start.
    pub fn minute_to_pixel(&self, minutes: u32) -> f64 {
        (f64::from(minutes) - f64::from(self.day_start_minutes)) * self.pixels_per_minute
    }
}

/// Vertical placement of one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f64,
    pub height: f64,
}

impl Geometry {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }
}

/// Project a session's times onto the grid.
///
/// `top` is not clamped: sessions before the day start get a negative top
/// and the caller scrolls or clips. The height comes from the times as
/// written, floored at [`MIN_HEIGHT_PX`] so zero-length and inverted
/// sessions stay visible.
pub fn project(session: &Session, config: &ProjectionConfig) -> Result<Geometry> {
    let start = session.start_minutes()?;
    let end = session.end_minutes()?;

    let duration = f64::from(end) - f64::from(start);
    Ok(Geometry {
        top: config.minute_to_pixel(start),
        height: (duration * config.pixels_per_minute).max(MIN_HEIGHT_PX),
    })
}

/// A time label in the grid's gutter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GutterLabel {
    pub minutes: u32,
    pub label: String,
    pub top: f64,
}

/// Labels every `row_interval_minutes` from the day start up to, but not
/// including, `day_end_minutes`.
pub fn gutter_labels(
    config: &ProjectionConfig,
    row_interval_minutes: u32,
    day_end_minutes: u32,
) -> Vec<GutterLabel> {
    if row_interval_minutes == 0 {
        return Vec::new();
    }

    (config.day_start_minutes..day_end_minutes)
        .step_by(row_interval_minutes as usize)
        .map(|minutes| GutterLabel {
            minutes,
            label: to_time_string(i64::from(minutes)),
            top: config.minute_to_pixel(minutes),
        })
        .collect()
}
