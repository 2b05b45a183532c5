//! Drag session bookkeeping.
//!
//! [`DragDropManager`] tracks one gesture from press to drop: the pending
//! press, the active source row, the zone under the pointer, the valid-target
//! set once the host has supplied it, and the hover timer that opens
//! collapsed rows. It makes no permission decisions itself; those need the
//! host's rows and callbacks and live in the grid.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use horizon_treegrid_core::logging::targets;
use horizon_treegrid_core::{TimerId, TimerManager};

use super::activation::{Activation, DragActivation, PendingDrag};
use super::zone::ZoneId;
use crate::geometry::Point;
use crate::model::RowKey;

/// State of the drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No drag is active or pending.
    Idle,
    /// A row is pressed but activation has not been reached.
    Pending,
    /// A drag is in progress.
    Dragging,
}

/// The active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    active: RowKey,
    hover: Option<ZoneId>,
    valid_targets: Option<HashSet<RowKey>>,
    request: u64,
}

impl DragSession {
    /// The row being dragged.
    pub fn active(&self) -> &RowKey {
        &self.active
    }

    /// The zone currently under the pointer.
    pub fn hover(&self) -> Option<&ZoneId> {
        self.hover.as_ref()
    }

    /// Targets the host allows; `None` until known or when unrestricted.
    pub fn valid_targets(&self) -> Option<&HashSet<RowKey>> {
        self.valid_targets.as_ref()
    }

    /// Whether the valid-target set admits this row.
    pub fn permits(&self, target: &RowKey) -> bool {
        self.valid_targets
            .as_ref()
            .is_none_or(|valid| valid.contains(target))
    }
}

#[derive(Debug)]
struct AutoExpand {
    timer: TimerId,
    row: RowKey,
}

/// Manager for tracking the drag gesture of one grid.
#[derive(Debug)]
pub struct DragDropManager {
    activation: DragActivation,
    auto_expand_delay: Duration,
    pending: Option<PendingDrag>,
    session: Option<DragSession>,
    /// Incremented on every drag start; stamps valid-target requests.
    generation: u64,
    timers: TimerManager,
    auto_expand: Option<AutoExpand>,
}

impl Default for DragDropManager {
    fn default() -> Self {
        Self::new(DragActivation::default(), Self::DEFAULT_AUTO_EXPAND_DELAY)
    }
}

impl DragDropManager {
    /// How long a collapsed row must be hovered before it opens.
    pub const DEFAULT_AUTO_EXPAND_DELAY: Duration = Duration::from_millis(500);

    pub fn new(activation: DragActivation, auto_expand_delay: Duration) -> Self {
        Self {
            activation,
            auto_expand_delay,
            pending: None,
            session: None,
            generation: 0,
            timers: TimerManager::new(),
            auto_expand: None,
        }
    }

    pub fn activation(&self) -> DragActivation {
        self.activation
    }

    pub fn set_activation(&mut self, activation: DragActivation) {
        self.activation = activation;
    }

    pub fn auto_expand_delay(&self) -> Duration {
        self.auto_expand_delay
    }

    pub fn set_auto_expand_delay(&mut self, delay: Duration) {
        self.auto_expand_delay = delay;
    }

    pub fn state(&self) -> DragState {
        if self.session.is_some() {
            DragState::Dragging
        } else if self.pending.is_some() {
            DragState::Pending
        } else {
            DragState::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn has_pending_drag(&self) -> bool {
        self.pending.is_some()
    }

    /// Record a press on a draggable row (called on pointer down).
    ///
    /// The drag does not start until the activation rule is met, so plain
    /// clicks never turn into drags.
    pub fn prepare_drag(&mut self, source: RowKey, origin: Point, now: Instant) {
        if self.session.is_some() {
            return;
        }
        self.pending = Some(PendingDrag::new(source, origin, now));
    }

    /// Forget a pending press (pointer released before activation).
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Check whether the pending press should become a drag.
    ///
    /// Returns the source row when activation is reached; the caller then
    /// calls [`start_drag`](Self::start_drag).
    pub fn check_drag_start(&mut self, position: Option<Point>, now: Instant) -> Option<RowKey> {
        let pending = self.pending.as_ref()?;
        match pending.check(self.activation, position, now) {
            Activation::Pending => None,
            Activation::Aborted => {
                tracing::trace!(target: targets::DRAG_DROP, source = %pending.source, "pending drag aborted");
                self.pending = None;
                None
            }
            Activation::Activated(source) => {
                self.pending = None;
                Some(source)
            }
        }
    }

    /// Start dragging `source`.
    ///
    /// Any previous session is discarded. Returns the request number the
    /// valid-target answer for this drag must carry.
    pub fn start_drag(&mut self, source: RowKey) -> u64 {
        self.pending = None;
        self.disarm_auto_expand();
        self.generation += 1;
        tracing::debug!(target: targets::DRAG_DROP, %source, request = self.generation, "drag started");
        self.session = Some(DragSession {
            active: source,
            hover: None,
            valid_targets: None,
            request: self.generation,
        });
        self.generation
    }

    /// Install the valid-target set answered for `request`.
    ///
    /// Returns `false` and discards the set when the request was superseded
    /// by a later drag or the drag has already ended.
    pub fn apply_valid_targets(&mut self, request: u64, targets_set: HashSet<RowKey>) -> bool {
        match &mut self.session {
            Some(session) if session.request == request => {
                tracing::debug!(
                    target: targets::DRAG_DROP,
                    request,
                    count = targets_set.len(),
                    "valid drop targets applied"
                );
                session.valid_targets = Some(targets_set);
                true
            }
            _ => {
                tracing::debug!(target: targets::DRAG_DROP, request, "stale valid drop targets discarded");
                false
            }
        }
    }

    /// Update the zone under the pointer.
    ///
    /// Returns `true` if it changed. A change disarms the auto-expand timer.
    pub fn update_hover(&mut self, zone: Option<ZoneId>) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };
        if session.hover == zone {
            return false;
        }
        session.hover = zone;
        self.disarm_auto_expand();
        true
    }

    /// Start the auto-expand countdown for `row` unless it is already running.
    pub fn arm_auto_expand(&mut self, row: RowKey, now: Instant) {
        if self.auto_expand.as_ref().is_some_and(|armed| armed.row == row) {
            return;
        }
        self.disarm_auto_expand();
        let timer = self.timers.start_one_shot(now, self.auto_expand_delay);
        tracing::trace!(target: targets::DRAG_DROP, %row, "auto-expand armed");
        self.auto_expand = Some(AutoExpand { timer, row });
    }

    pub fn disarm_auto_expand(&mut self) {
        if let Some(armed) = self.auto_expand.take() {
            // The timer may already have fired and been removed.
            let _ = self.timers.stop(armed.timer);
        }
    }

    pub fn auto_expand_target(&self) -> Option<&RowKey> {
        self.auto_expand.as_ref().map(|armed| &armed.row)
    }

    /// Fire due timers. Returns the row to expand if the hover delay elapsed.
    pub fn process_timers(&mut self, now: Instant) -> Option<RowKey> {
        let fired = self.timers.process_expired(now);
        let armed = self.auto_expand.as_ref()?;
        if !fired.contains(&armed.timer) {
            return None;
        }
        let row = self.auto_expand.take().map(|armed| armed.row)?;
        tracing::debug!(target: targets::DRAG_DROP, %row, "auto-expand delay elapsed");
        Some(row)
    }

    /// Time until the next timer is due, for hosts that schedule wake-ups.
    pub fn time_until_next_timer(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// End the drag and hand back its final session.
    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.disarm_auto_expand();
        self.pending = None;
        let session = self.session.take();
        if let Some(session) = &session {
            tracing::debug!(target: targets::DRAG_DROP, active = %session.active, "drag ended");
        }
        session
    }

    /// Abandon the gesture without a drop.
    pub fn cancel(&mut self) {
        let _ = self.end_drag();
    }
}
