//! Drag-and-drop on the grid.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use horizon_treegrid_core::logging::targets;

use super::config::{Callbacks, HostFuture, ValidTargets, host_ok};
use super::{GridState, Notice, TreeGrid};
use crate::drag_drop::{DragSession, DragState, DropCandidate, DropZone, ZoneId, closest_target};
use crate::error::{GridError, GridResult, HostError};
use crate::geometry::{Point, Rect};
use crate::model::{GridNode, RowId, RowIndex, RowKey};

/// A drag that just became active.
#[derive(Debug)]
pub struct DragStart {
    pub source: RowId,
    /// Present while the host is still computing the valid-target set. The
    /// drag is unrestricted until it resolves.
    pub valid_targets: Option<ValidTargetsTask>,
}

/// Delivers an asynchronous valid-target answer to the drag it was asked for.
///
/// Resolves to `true` if the set was applied, `false` if the drag it belongs
/// to has ended or been superseded, or the lookup failed.
pub struct ValidTargetsTask {
    inner: BoxFuture<'static, bool>,
}

impl fmt::Debug for ValidTargetsTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidTargetsTask(..)")
    }
}

impl Future for ValidTargetsTask {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        self.inner.poll_unpin(cx)
    }
}

/// A drop that passed every check: move `source` to `zone` of `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    pub source: RowId,
    pub target: RowId,
    pub zone: DropZone,
}

/// A drop handed to the host, whose persistence may still be running.
pub struct PendingDrop {
    intent: DropIntent,
    completion: HostFuture,
}

impl PendingDrop {
    pub fn intent(&self) -> &DropIntent {
        &self.intent
    }

    /// Wait for the host to persist the move. Failures are logged.
    pub async fn wait(self) -> Result<(), HostError> {
        let result = self.completion.await;
        if let Err(err) = &result {
            tracing::warn!(
                target: targets::DRAG_DROP,
                source = %self.intent.source,
                target_row = %self.intent.target,
                zone = %self.intent.zone,
                error = %err,
                "drop was not persisted"
            );
        }
        result
    }
}

impl fmt::Debug for PendingDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDrop")
            .field("intent", &self.intent)
            .finish_non_exhaustive()
    }
}

/// How a drag ended.
#[derive(Debug)]
pub enum DragEnd {
    /// No drag was active.
    NotDragging,
    /// Released over nothing droppable.
    NoTarget,
    /// The host's predicate or valid-target set refused the drop.
    Rejected(DropIntent),
    /// The host's drop callback was invoked.
    Dropped(PendingDrop),
}

impl DragEnd {
    pub fn is_dropped(&self) -> bool {
        matches!(self, DragEnd::Dropped(_))
    }

    /// The attempted move, for rejected and accepted drops.
    pub fn intent(&self) -> Option<&DropIntent> {
        match self {
            DragEnd::Rejected(intent) => Some(intent),
            DragEnd::Dropped(pending) => Some(pending.intent()),
            DragEnd::NotDragging | DragEnd::NoTarget => None,
        }
    }
}

/// Whether `source` may land on `zone`: the host's predicate and the drag's
/// valid-target set must both allow it.
fn drop_allowed<N: GridNode>(
    callbacks: &Callbacks<N>,
    index: &RowIndex<'_, N>,
    session: &DragSession,
    source: &N,
    zone: &ZoneId,
) -> bool {
    let Some(target) = index.get(zone.row.as_str()) else {
        return false;
    };
    session.permits(&zone.row) && callbacks.can_drop(source, target, zone.zone)
}

impl<N: GridNode> GridState<N> {
    /// Drop `zone` if the current drag may not land there.
    fn filter_zone(&self, callbacks: &Callbacks<N>, zone: Option<ZoneId>) -> Option<ZoneId> {
        let zone = zone?;
        let session = self.drag.session()?;
        let index = RowIndex::build(&self.rows);
        let source = index.get(session.active().as_str())?;
        drop_allowed(callbacks, &index, session, source, &zone).then_some(zone)
    }

    /// Move the hover to `zone`, arming auto-expand over the inside zone of a
    /// collapsed row with children.
    fn set_hover(&mut self, zone: Option<ZoneId>, now: Instant, notices: &mut Vec<Notice>) -> bool {
        if !self.drag.update_hover(zone.clone()) {
            return false;
        }
        tracing::trace!(
            target: targets::DRAG_DROP,
            zone = zone.as_ref().map(ToString::to_string),
            "hover changed"
        );
        if let Some(zone) = zone.as_ref().filter(|zone| zone.zone == DropZone::Inside) {
            let index = RowIndex::build(&self.rows);
            let collapsed = index.get(zone.row.as_str()).is_some_and(GridNode::has_children)
                && !self.expansion.is_expanded(&zone.row, &index);
            if collapsed {
                self.drag.arm_auto_expand(zone.row.clone(), now);
            }
        }
        notices.push(Notice::HoverChanged(zone));
        notices.push(Notice::Changed);
        true
    }
}

impl<N: GridNode + Clone> TreeGrid<N> {
    pub fn drag_state(&self) -> DragState {
        self.read(|state| state.drag.state())
    }

    /// The row being dragged.
    pub fn drag_source(&self) -> Option<RowKey> {
        self.read(|state| state.drag.session().map(|session| session.active().clone()))
    }

    /// The zone currently under the pointer.
    pub fn hovered_zone(&self) -> Option<ZoneId> {
        self.read(|state| state.drag.session().and_then(|session| session.hover().cloned()))
    }

    /// Pointer pressed on a row.
    ///
    /// Returns `false` if the host does not allow the row to be dragged. The
    /// drag starts once the activation rule is met; see
    /// [`pointer_moved`](Self::pointer_moved) and
    /// [`process_timers`](Self::process_timers).
    pub fn press_row(&self, id: impl Into<RowKey>, position: Point, now: Instant) -> GridResult<bool> {
        let key = id.into();
        self.update(|state, callbacks, _| {
            let index = RowIndex::build(&state.rows);
            let node = index.get(key.as_str()).ok_or_else(|| GridError::unknown_row(&key))?;
            if !callbacks.can_drag(node) {
                tracing::trace!(target: targets::DRAG_DROP, row = %key, "row is not draggable");
                return Ok(false);
            }
            state.drag.prepare_drag(key.clone(), position, now);
            Ok(true)
        })
    }

    /// Pointer moved while pressed. Returns the drag if this move activated
    /// it.
    pub fn pointer_moved(&self, position: Point, now: Instant) -> Option<DragStart> {
        let source = self.update(|state, _, _| state.drag.check_drag_start(Some(position), now))?;
        self.start_pending_drag(source)
    }

    /// Start the drag of an activated press; its row may have been removed
    /// since it was pressed.
    fn start_pending_drag(&self, source: RowKey) -> Option<DragStart> {
        match self.start_drag(source) {
            Ok(started) => started,
            Err(err) => {
                tracing::debug!(target: targets::DRAG_DROP, error = %err, "pressed row removed; drag not started");
                None
            }
        }
    }

    /// Pointer released before the drag activated.
    pub fn release_pointer(&self) {
        self.update(|state, _, _| state.drag.cancel_pending());
    }

    /// Start dragging a row right away, bypassing activation.
    ///
    /// Returns `None` if the host does not allow the row to be dragged. The
    /// host's valid-target lookup is asked once; a synchronous answer is
    /// applied immediately, an asynchronous one is returned as a task the host
    /// must drive.
    pub fn start_drag(&self, id: impl Into<RowKey>) -> GridResult<Option<DragStart>> {
        let key = id.into();
        let started = self.update(|state, callbacks, notices| -> GridResult<Option<(RowId, N, u64)>> {
            let index = RowIndex::build(&state.rows);
            let node = index.get(key.as_str()).ok_or_else(|| GridError::unknown_row(&key))?;
            let source = node.id().ok_or_else(|| GridError::unknown_row(&key))?;
            if !callbacks.can_drag(node) {
                return Ok(None);
            }
            let had_hover = state.drag.session().is_some_and(|session| session.hover().is_some());
            let request = state.drag.start_drag(key.clone());
            if had_hover {
                notices.push(Notice::HoverChanged(None));
            }
            notices.push(Notice::DragStarted(source.clone()));
            notices.push(Notice::Changed);
            Ok(Some((source, node.clone(), request)))
        })?;
        let Some((source, node, request)) = started else {
            return Ok(None);
        };

        let valid_targets = match &self.shared.callbacks.valid_drop_targets {
            None => None,
            Some(lookup) => match lookup(&node) {
                ValidTargets::Ready(set) => {
                    self.apply_valid_targets(request, set);
                    None
                }
                ValidTargets::Pending(lookup) => {
                    let grid = self.clone();
                    let inner = async move {
                        match lookup.await {
                            Ok(set) => grid.apply_valid_targets(request, set),
                            Err(err) => {
                                tracing::warn!(
                                    target: targets::DRAG_DROP,
                                    request,
                                    error = %err,
                                    "valid drop target lookup failed; drag stays unrestricted"
                                );
                                false
                            }
                        }
                    };
                    Some(ValidTargetsTask { inner: inner.boxed() })
                }
            },
        };

        Ok(Some(DragStart { source, valid_targets }))
    }

    fn apply_valid_targets(&self, request: u64, set: HashSet<RowId>) -> bool {
        self.update(|state, callbacks, notices| {
            let keys = set.iter().map(RowId::key).collect();
            if !state.drag.apply_valid_targets(request, keys) {
                return false;
            }
            let hover = state.drag.session().and_then(|session| session.hover().cloned());
            if hover.is_some() && state.filter_zone(callbacks, hover).is_none() {
                state.drag.update_hover(None);
                notices.push(Notice::HoverChanged(None));
            }
            notices.push(Notice::Changed);
            true
        })
    }

    /// Pointer moved during a drag, with the host's droppable candidates.
    ///
    /// Picks the winning zone among the candidates the drag may land on and
    /// makes it the hover target. Returns the new hover target.
    pub fn drag_over_candidates(
        &self,
        pointer: Point,
        dragged: Rect,
        candidates: &[DropCandidate],
        now: Instant,
    ) -> Option<ZoneId> {
        self.update(|state, callbacks, notices| {
            let session = state.drag.session()?;
            let winner = {
                let index = RowIndex::build(&state.rows);
                let source = index.get(session.active().as_str())?;
                closest_target(pointer, dragged, candidates, |zone| {
                    drop_allowed(callbacks, &index, session, source, zone)
                })
                .and_then(|collision| collision.zone)
            };
            state.set_hover(winner.clone(), now, notices);
            winner
        })
    }

    /// Pointer moved during a drag onto `zone` (or off every zone).
    ///
    /// A zone the drag may not land on counts as no zone. Returns `true` if
    /// the hover target changed.
    pub fn drag_over(&self, zone: Option<ZoneId>, now: Instant) -> bool {
        self.update(|state, callbacks, notices| {
            if !state.drag.is_dragging() {
                return false;
            }
            let zone = state.filter_zone(callbacks, zone);
            state.set_hover(zone, now, notices)
        })
    }

    /// Advance time: activates delay-based drags and fires the hover
    /// auto-expand. Returns the drag if one activated.
    pub fn process_timers(&self, now: Instant) -> Option<DragStart> {
        let activated = self.update(|state, _, notices| {
            let activated = state.drag.check_drag_start(None, now);
            if let Some(row) = state.drag.process_timers(now) {
                let index = RowIndex::build(&state.rows);
                let toggle = state.expansion.set_expanded(&row, true, &index);
                super::push_toggles(notices, &index, toggle.as_slice());
            }
            activated
        })?;
        self.start_pending_drag(activated)
    }

    /// Time until [`process_timers`](Self::process_timers) has work to do.
    pub fn time_until_next_timer(&self, now: Instant) -> Option<Duration> {
        self.update(|state, _, _| state.drag.time_until_next_timer(now))
    }

    /// Abandon the drag (or pending press) without dropping. Returns `true` if
    /// there was one.
    pub fn cancel_drag(&self) -> bool {
        self.update(|state, _, notices| {
            let was = state.drag.state();
            if was == DragState::Idle {
                return false;
            }
            let had_hover = state.drag.session().is_some_and(|session| session.hover().is_some());
            state.drag.cancel();
            if was == DragState::Dragging {
                tracing::debug!(target: targets::DRAG_DROP, "drag cancelled");
                if had_hover {
                    notices.push(Notice::HoverChanged(None));
                }
                notices.push(Notice::Changed);
            }
            true
        })
    }

    /// Release the drag over the current hover target.
    pub fn end_drag(&self) -> DragEnd {
        self.finish_drag(None)
    }

    /// Release the drag over the droppable with `handle`, or over nothing.
    ///
    /// A handle that is not a `<zone>:<id>` zone ends the drag like a release
    /// over nothing, and is reported as an error.
    pub fn drop_on(&self, handle: Option<&str>) -> GridResult<DragEnd> {
        match handle.map(str::parse::<ZoneId>).transpose() {
            Ok(Some(zone)) => Ok(self.finish_drag(Some(zone))),
            Ok(None) => Ok(self.finish_drag_without_target()),
            Err(err) => {
                self.finish_drag_without_target();
                Err(err.into())
            }
        }
    }

    fn finish_drag_without_target(&self) -> DragEnd {
        self.update(|state, _, notices| match state.drag.end_drag() {
            None => DragEnd::NotDragging,
            Some(session) => {
                if session.hover().is_some() {
                    notices.push(Notice::HoverChanged(None));
                }
                notices.push(Notice::Changed);
                DragEnd::NoTarget
            }
        })
    }

    /// End the drag and resolve a drop on `target`, or on the hover target
    /// when `None`. The host callback runs after the drag is already idle.
    fn finish_drag(&self, target: Option<ZoneId>) -> DragEnd {
        let resolved = self.update(|state, callbacks, notices| {
            let Some(session) = state.drag.end_drag() else {
                return Err(DragEnd::NotDragging);
            };
            if session.hover().is_some() {
                notices.push(Notice::HoverChanged(None));
            }
            notices.push(Notice::Changed);

            let Some(zone) = target.or_else(|| session.hover().cloned()) else {
                tracing::debug!(target: targets::DRAG_DROP, "released over nothing");
                return Err(DragEnd::NoTarget);
            };
            let index = RowIndex::build(&state.rows);
            let rows = index.get(session.active().as_str()).zip(index.get(zone.row.as_str()));
            let Some((source, target)) = rows else {
                tracing::debug!(target: targets::DRAG_DROP, %zone, "drop on unknown row ignored");
                return Err(DragEnd::NoTarget);
            };
            let Some((source_id, target_id)) = source.id().zip(target.id()) else {
                return Err(DragEnd::NoTarget);
            };
            let intent = DropIntent {
                source: source_id,
                target: target_id,
                zone: zone.zone,
            };
            if !drop_allowed(callbacks, &index, &session, source, &zone) {
                tracing::debug!(target: targets::DRAG_DROP, %zone, source = %intent.source, "drop rejected");
                return Err(DragEnd::Rejected(intent));
            }
            Ok(intent)
        });

        let intent = match resolved {
            Ok(intent) => intent,
            Err(end) => return end,
        };
        tracing::debug!(
            target: targets::DRAG_DROP,
            source = %intent.source,
            target_row = %intent.target,
            zone = %intent.zone,
            "drop accepted"
        );
        let completion = match &self.shared.callbacks.on_drop {
            Some(on_drop) => on_drop(&intent.source, &intent.target, intent.zone),
            None => host_ok(),
        };
        DragEnd::Dropped(PendingDrop { intent, completion })
    }
}
