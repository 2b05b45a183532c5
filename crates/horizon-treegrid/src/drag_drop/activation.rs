//! Drag activation: when a press on a row turns into a drag.
//!
//! A press first makes the drag *pending*. Distance activation starts the
//! drag once the pointer has travelled far enough, so plain clicks never
//! drag. Delay activation starts it once the press has been held long
//! enough, and gives up if the pointer wanders beyond the tolerance first.

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::geometry::Point;
use crate::model::RowKey;

/// How a pending drag is promoted to an active one.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DragActivation {
    /// Hold for `delay_ms` without moving more than `tolerance` pixels.
    Delay { delay_ms: u64, tolerance: f32 },
    /// Move at least `distance` pixels.
    Distance { distance: f32 },
}

impl DragActivation {
    /// Default drag threshold in pixels.
    pub const DEFAULT_DISTANCE: f32 = 4.0;

    pub fn delay(delay: Duration, tolerance: f32) -> Self {
        Self::Delay {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            tolerance,
        }
    }

    pub fn distance(distance: f32) -> Self {
        Self::Distance { distance }
    }
}

impl Default for DragActivation {
    fn default() -> Self {
        Self::Distance {
            distance: Self::DEFAULT_DISTANCE,
        }
    }
}

/// What a pointer update did to a pending drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Still waiting.
    Pending,
    /// The drag should start for this row.
    Activated(RowKey),
    /// The press moved too far during a delay and will not become a drag.
    Aborted,
}

/// A press that has not yet become a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDrag {
    pub source: RowKey,
    pub origin: Point,
    pub pressed_at: Instant,
}

impl PendingDrag {
    pub fn new(source: RowKey, origin: Point, pressed_at: Instant) -> Self {
        Self {
            source,
            origin,
            pressed_at,
        }
    }

    /// Check the press against the activation rule.
    ///
    /// `position` is `None` when only time has advanced.
    pub fn check(&self, activation: DragActivation, position: Option<Point>, now: Instant) -> Activation {
        let moved = position.map_or(0.0, |p| self.origin.distance_to(p));
        match activation {
            DragActivation::Distance { distance } => {
                if moved >= distance {
                    Activation::Activated(self.source.clone())
                } else {
                    Activation::Pending
                }
            }
            DragActivation::Delay {
                delay_ms,
                tolerance,
            } => {
                let held = now.saturating_duration_since(self.pressed_at);
                if held >= Duration::from_millis(delay_ms) {
                    Activation::Activated(self.source.clone())
                } else if moved > tolerance {
                    Activation::Aborted
                } else {
                    Activation::Pending
                }
            }
        }
    }
}
