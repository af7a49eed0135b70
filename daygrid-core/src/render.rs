//! The render model: grouped, projected sessions ready to draw.
//!
//! Sessions come out in paint order. Clusters follow each other in time
//! order and members within a cluster are listed by ascending offset, so
//! the member with the highest offset is painted last and sits on top.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::grouping::{group, ClusterId};
use crate::layout::{project, Geometry, ProjectionConfig};
use crate::types::{Session, SessionId, TimeSpan};

/// A session with its column and pixel geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedSession {
    #[serde(flatten)]
    pub session: Session,
    /// Column index within the cluster
    pub offset: usize,
    /// Number of sessions sharing the cluster
    pub group_size: usize,
    pub cluster: ClusterId,
    /// Interval the session was grouped with
    pub span: TimeSpan,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl PositionedSession {
    pub fn id(&self) -> &SessionId {
        &self.session.id
    }

    /// Stacking priority; higher paints above lower.
    pub fn z_index(&self) -> usize {
        self.offset
    }

    pub fn is_grouped(&self) -> bool {
        self.group_size > 1
    }

    /// Horizontal `(x, width)` of this session's column in a lane of `width`.
    pub fn horizontal_slot(&self, width: f64) -> (f64, f64) {
        let columns = self.group_size.max(1) as f64;
        let column_width = width / columns;
        (self.offset as f64 * column_width, column_width)
    }
}

/// Positioned sessions for one day in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub config: ProjectionConfig,
    pub sessions: Vec<PositionedSession>,
}

impl RenderModel {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionedSession> {
        self.sessions.iter()
    }

    pub fn get(&self, id: &SessionId) -> Option<&PositionedSession> {
        self.sessions.iter().find(|p| p.id() == id)
    }

    /// Members of a cluster, ordered by offset.
    pub fn cluster_members(&self, cluster: ClusterId) -> Vec<&PositionedSession> {
        self.sessions
            .iter()
            .filter(|p| p.cluster == cluster)
            .collect()
    }

    /// Number of clusters in the model.
    pub fn cluster_count(&self) -> usize {
        self.sessions
            .last()
            .map(|p| p.cluster.0 + 1)
            .unwrap_or(0)
    }

    /// Topmost session under a point.
    ///
    /// `x_fraction` is the horizontal position as a fraction of the lane
    /// width in `[0, 1)`; `y` is in grid pixels.
    pub fn hit_test(&self, x_fraction: f64, y: f64) -> Option<&PositionedSession> {
        self.sessions.iter().rev().find(|p| {
            let (x, width) = p.horizontal_slot(1.0);
            p.geometry.contains_y(y) && x_fraction >= x && x_fraction < x + width
        })
    }

    /// Pixel height needed to show the grid up to `day_end_minutes` and
    /// every session, whichever reaches further.
    pub fn content_height(&self, day_end_minutes: u32) -> f64 {
        self.sessions
            .iter()
            .map(|p| p.geometry.bottom())
            .fold(self.config.minute_to_pixel(day_end_minutes), f64::max)
            .max(0.0)
    }
}

/// Group and project a single day's sessions.
///
/// The output has exactly one entry per input session. Fails if any time
/// does not parse or an id repeats; empty input gives an empty model.
pub fn build_render_model(
    sessions: &[Session],
    config: &ProjectionConfig,
) -> Result<RenderModel> {
    let clusters = group(sessions)?;

    let mut positioned = Vec::with_capacity(sessions.len());
    for cluster in &clusters {
        let group_size = cluster.group_size();
        for member in &cluster.members {
            positioned.push(PositionedSession {
                session: member.session.clone(),
                offset: member.offset,
                group_size,
                cluster: cluster.id,
                span: member.span,
                geometry: project(member.session, config)?,
            });
        }
    }

    Ok(RenderModel {
        config: *config,
        sessions: positioned,
    })
}

/// A render model for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayModel {
    pub date: NaiveDate,
    pub model: RenderModel,
}

/// Build the model for the sessions on `date`, ignoring the rest.
pub fn build_day(
    sessions: &[Session],
    date: NaiveDate,
    config: &ProjectionConfig,
) -> Result<DayModel> {
    let day: Vec<Session> = sessions
        .iter()
        .filter(|s| s.date == date)
        .cloned()
        .collect();

    Ok(DayModel {
        date,
        model: build_render_model(&day, config)?,
    })
}

/// Build seven consecutive day models starting at `week_start`.
pub fn build_week(
    sessions: &[Session],
    week_start: NaiveDate,
    config: &ProjectionConfig,
) -> Result<Vec<DayModel>> {
    (0..7)
        .map(|offset| build_day(sessions, week_start + Duration::days(offset), config))
        .collect()
}

/// Distinct dates present in a session list, ascending.
pub fn session_dates(sessions: &[Session]) -> Vec<NaiveDate> {
    sessions
        .iter()
        .map(|s| s.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
