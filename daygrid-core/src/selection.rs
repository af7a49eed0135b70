//! Tap-to-expand selection state.
//!
//! The controller is a reducer: the front-end turns input into
//! [`SelectionEvent`]s, calls [`SelectionController::update`] and runs the
//! returned [`SelectionEffect`]s. The controller itself never sleeps or
//! spawns anything.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::grouping::ClusterId;
use crate::render::RenderModel;
use crate::types::SessionId;

/// What the presentation layer currently has open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing open
    #[default]
    None,
    /// Picker listing the members of an overlapping cluster
    GroupOpen {
        cluster: ClusterId,
        /// Member ids in offset order
        members: Vec<SessionId>,
        /// Index into `members` of the highlighted row
        highlighted: usize,
    },
    /// Detail view of one session
    DetailOpen { session: SessionId },
}

impl SelectionState {
    pub fn is_open(&self) -> bool {
        !matches!(self, SelectionState::None)
    }

    /// Whether a session is shown in the open group or detail view.
    pub fn is_expanded(&self, id: &SessionId) -> bool {
        match self {
            SelectionState::None => false,
            SelectionState::GroupOpen { members, .. } => members.contains(id),
            SelectionState::DetailOpen { session } => session == id,
        }
    }

    /// The highlighted member of an open group.
    pub fn highlighted(&self) -> Option<&SessionId> {
        match self {
            SelectionState::GroupOpen {
                members,
                highlighted,
                ..
            } => members.get(*highlighted),
            _ => None,
        }
    }
}

/// Input to the selection reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A session box on the grid was tapped
    Tap(SessionId),
    /// A member was chosen in the group picker
    Pick(SessionId),
    /// Move the picker highlight down
    HighlightNext,
    /// Move the picker highlight up
    HighlightPrevious,
    /// Pick the highlighted member
    ConfirmHighlighted,
    /// A scheduled detail transition is due
    DetailReady(SessionId),
    /// Dismiss whatever is open
    Close,
    /// The render model was rebuilt from new data
    ModelRebuilt,
}

/// Side effects for the front-end to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Dispatch `DetailReady(session)` once `after` has elapsed
    ScheduleDetail { session: SessionId, after: Duration },
}

/// Single-value selection state machine.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
    /// Pause between closing a group and opening the chosen detail
    detail_delay: Duration,
    /// Session waiting on `DetailReady`
    pending: Option<SessionId>,
}

impl SelectionController {
    pub fn new(detail_delay: Duration) -> Self {
        Self {
            state: SelectionState::None,
            detail_delay,
            pending: None,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&SessionId> {
        self.pending.as_ref()
    }

    /// Apply one event and return the effects it produced.
    pub fn update(&mut self, model: &RenderModel, event: SelectionEvent) -> Vec<SelectionEffect> {
        match event {
            SelectionEvent::Tap(id) => {
                self.tap(model, id);
                vec![]
            }
            SelectionEvent::Pick(id) => self.pick(model, id),
            SelectionEvent::HighlightNext => {
                self.move_highlight(1);
                vec![]
            }
            SelectionEvent::HighlightPrevious => {
                self.move_highlight(-1);
                vec![]
            }
            SelectionEvent::ConfirmHighlighted => match self.state.highlighted().cloned() {
                Some(id) => self.pick(model, id),
                None => vec![],
            },
            SelectionEvent::DetailReady(id) => {
                self.detail_ready(model, id);
                vec![]
            }
            SelectionEvent::Close => {
                self.state = SelectionState::None;
                self.pending = None;
                vec![]
            }
            SelectionEvent::ModelRebuilt => {
                self.reconcile(model);
                vec![]
            }
        }
    }

    fn tap(&mut self, model: &RenderModel, id: SessionId) {
        if self.state.is_open() {
            tracing::debug!(session_id = %id, "Ignoring tap while a view is open");
            return;
        }

        let Some(tapped) = model.get(&id) else {
            tracing::warn!(session_id = %id, "Tap on unknown session");
            return;
        };

        // A fresh tap supersedes a detail still waiting to open.
        self.pending = None;

        if tapped.is_grouped() {
            let members = model
                .cluster_members(tapped.cluster)
                .into_iter()
                .map(|p| p.id().clone())
                .collect();
            self.state = SelectionState::GroupOpen {
                cluster: tapped.cluster,
                members,
                highlighted: tapped.offset,
            };
        } else {
            self.state = SelectionState::DetailOpen { session: id };
        }
    }

    fn pick(&mut self, model: &RenderModel, id: SessionId) -> Vec<SelectionEffect> {
        let SelectionState::GroupOpen { members, .. } = &self.state else {
            tracing::warn!(session_id = %id, "Pick without an open group");
            return vec![];
        };

        if !members.contains(&id) || model.get(&id).is_none() {
            tracing::warn!(session_id = %id, "Pick of a session outside the open group");
            return vec![];
        }

        if self.detail_delay.is_zero() {
            self.state = SelectionState::DetailOpen { session: id };
            return vec![];
        }

        self.state = SelectionState::None;
        self.pending = Some(id.clone());
        vec![SelectionEffect::ScheduleDetail {
            session: id,
            after: self.detail_delay,
        }]
    }

    fn move_highlight(&mut self, step: isize) {
        if let SelectionState::GroupOpen {
            members,
            highlighted,
            ..
        } = &mut self.state
        {
            let last = members.len().saturating_sub(1);
            *highlighted = highlighted.saturating_add_signed(step).min(last);
        }
    }

    fn detail_ready(&mut self, model: &RenderModel, id: SessionId) {
        if self.pending.as_ref() != Some(&id) {
            tracing::debug!(session_id = %id, "Stale detail transition ignored");
            return;
        }
        self.pending = None;

        if self.state.is_open() || model.get(&id).is_none() {
            return;
        }
        self.state = SelectionState::DetailOpen { session: id };
    }

    /// Drop views that no longer match the rebuilt model.
    fn reconcile(&mut self, model: &RenderModel) {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| model.get(pending).is_none())
        {
            self.pending = None;
        }

        let keep = match &mut self.state {
            SelectionState::None => true,
            SelectionState::DetailOpen { session } => model.get(session).is_some(),
            SelectionState::GroupOpen {
                cluster, members, ..
            } => {
                let rebuilt = members
                    .first()
                    .and_then(|first| model.get(first))
                    .map(|p| p.cluster);

                match rebuilt {
                    Some(new_cluster) => {
                        let current: Vec<&SessionId> = model
                            .cluster_members(new_cluster)
                            .into_iter()
                            .map(|p| p.id())
                            .collect();
                        let unchanged = current.len() == members.len()
                            && current.iter().zip(members.iter()).all(|(a, b)| *a == b);
                        if unchanged {
                            *cluster = new_cluster;
                        }
                        unchanged
                    }
                    None => false,
                }
            }
        };

        if !keep {
            tracing::debug!(state = ?self.state, "Closing selection after model rebuild");
            self.state = SelectionState::None;
        }
    }
}
