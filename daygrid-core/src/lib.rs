//! # daygrid-core
//!
//! Core library for daygrid - a day-grid calendar for training sessions.
//!
//! This library provides:
//! - Domain types for sessions and their opaque display payload
//! - Wall-clock time parsing and formatting
//! - The overlap grouper that packs sessions into side-by-side columns
//! - Pixel projection and the final render model
//! - The selection state machine behind tap-to-expand
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through four pure stages and one stateful one:
//! - **Grouping:** sessions are swept in start order into clusters of
//!   transitively overlapping intervals, each member getting a column offset
//! - **Projection:** each session's wall-clock times become a top and height
//!   in pixels
//! - **Render model:** grouping and projection are merged into positioned
//!   sessions in paint order
//! - **Selection:** taps on positioned sessions drive a
//!   `None | GroupOpen | DetailOpen` state machine
//!
//! ## Example
//!
//! ```rust,no_run
//! use daygrid_core::{build_render_model, ingest, Config};
//!
//! let config = Config::load().expect("failed to load config");
//! let sessions = ingest::load_sessions("week.json").expect("failed to load sessions");
//! let projection = config.layout.projection().expect("invalid layout config");
//!
//! let model = build_render_model(&sessions, &projection).expect("invalid session times");
//! for positioned in model.iter() {
//!     println!("{} column {}/{}", positioned.id(), positioned.offset, positioned.group_size);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use grouping::{group, Cluster, ClusterId, ClusterMember};
pub use layout::{gutter_labels, project, Geometry, GutterLabel, ProjectionConfig};
pub use render::{
    build_day, build_render_model, build_week, DayModel, PositionedSession, RenderModel,
};
pub use selection::{SelectionController, SelectionEffect, SelectionEvent, SelectionState};
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod grouping;
pub mod ingest;
pub mod layout;
pub mod logging;
pub mod render;
pub mod selection;
pub mod time;
pub mod types;
