//! Choosing one drop target among overlapping candidates.
//!
//! Candidates are considered when the pointer is inside them or the dragged
//! row's rectangle overlaps them. Disallowed row zones are dropped before
//! ranking so they can never be highlighted. The rest are ordered by class
//! (edge zone, then inside zone, then anything unrelated) and, within a
//! class, by overlap with the dragged rectangle.

use std::cmp::Ordering;

use horizon_treegrid_core::logging::targets;

use super::zone::{DropCandidate, ZoneId};
use crate::geometry::{Point, Rect};

/// Collision priority classes, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollisionClass {
    Edge,
    Inside,
    Unrelated,
}

/// A candidate that survived filtering, with its ranking inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub handle: String,
    pub zone: Option<ZoneId>,
    pub class: CollisionClass,
    pub overlap: f32,
    pub contains_pointer: bool,
}

impl Collision {
    fn rank(&self, other: &Self) -> Ordering {
        self.class
            .cmp(&other.class)
            .then_with(|| other.overlap.total_cmp(&self.overlap))
            .then_with(|| other.contains_pointer.cmp(&self.contains_pointer))
    }
}

/// Rank every candidate under the pointer or the dragged rectangle.
///
/// `is_allowed` is asked about each row zone; unrelated handles are kept.
pub fn rank_collisions<F>(
    pointer: Point,
    dragged: Rect,
    candidates: &[DropCandidate],
    mut is_allowed: F,
) -> Vec<Collision>
where
    F: FnMut(&ZoneId) -> bool,
{
    let mut collisions: Vec<Collision> = candidates
        .iter()
        .filter_map(|candidate| {
            let contains_pointer = candidate.rect.contains(pointer);
            let overlap = candidate.rect.overlap_area(&dragged);
            if !contains_pointer && overlap <= 0.0 {
                return None;
            }

            let zone = candidate.zone();
            let class = match &zone {
                Some(zone) if !is_allowed(zone) => {
                    tracing::trace!(target: targets::DRAG_DROP, %zone, "candidate not allowed");
                    return None;
                }
                Some(zone) if zone.zone.is_edge() => CollisionClass::Edge,
                Some(_) => CollisionClass::Inside,
                None => CollisionClass::Unrelated,
            };

            Some(Collision {
                handle: candidate.handle.clone(),
                zone,
                class,
                overlap,
                contains_pointer,
            })
        })
        .collect();

    collisions.sort_by(Collision::rank);
    collisions
}

/// The winning candidate, if any survives.
pub fn closest_target<F>(
    pointer: Point,
    dragged: Rect,
    candidates: &[DropCandidate],
    is_allowed: F,
) -> Option<Collision>
where
    F: FnMut(&ZoneId) -> bool,
{
    rank_collisions(pointer, dragged, candidates, is_allowed)
        .into_iter()
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag_drop::zone::{DropZone, row_drop_candidates};
    use crate::model::RowKey;

    fn rows() -> Vec<DropCandidate> {
        let mut candidates = Vec::new();
        candidates.extend(row_drop_candidates(&RowKey::from(1), Rect::new(0.0, 0.0, 100.0, 30.0)));
        candidates.extend(row_drop_candidates(&RowKey::from(2), Rect::new(0.0, 30.0, 100.0, 30.0)));
        candidates
    }

    #[test]
    fn test_edge_beats_inside_at_same_point() {
        // Dragged row straddles the inside and after zones of row 1, mostly
        // over inside.
        let dragged = Rect::new(0.0, 11.0, 100.0, 12.0);
        let pointer = Point::new(50.0, 15.0);

        let hit = closest_target(pointer, dragged, &rows(), |_| true).unwrap();
        assert_eq!(hit.zone, Some(ZoneId::new(DropZone::After, 1)));
        assert_eq!(hit.class, CollisionClass::Edge);
    }

    #[test]
    fn test_larger_overlap_wins_within_class() {
        // Covers the after zone of row 1 a little and the before zone of row 2
        // a lot.
        let dragged = Rect::new(0.0, 28.0, 100.0, 8.0);
        let hit = closest_target(Point::new(50.0, 32.0), dragged, &rows(), |_| true).unwrap();
        assert_eq!(hit.handle, "before:2");
    }

    #[test]
    fn test_disallowed_candidates_are_removed_before_ranking() {
        let dragged = Rect::new(0.0, 11.0, 100.0, 12.0);
        let pointer = Point::new(50.0, 15.0);

        let ranked = rank_collisions(pointer, dragged, &rows(), |zone| zone.zone == DropZone::Inside);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].handle, "inside:1");
    }

    #[test]
    fn test_unrelated_candidates_rank_last() {
        let mut candidates = rows();
        candidates.push(DropCandidate::new("trash", Rect::new(0.0, 0.0, 200.0, 200.0)));

        let dragged = Rect::new(0.0, 12.0, 100.0, 6.0);
        let ranked = rank_collisions(Point::new(50.0, 15.0), dragged, &candidates, |_| true);
        assert_eq!(ranked.first().map(|c| c.handle.as_str()), Some("inside:1"));
        assert_eq!(ranked.last().map(|c| c.class), Some(CollisionClass::Unrelated));
    }

    #[test]
    fn test_nothing_under_pointer() {
        let hit = closest_target(Point::new(500.0, 500.0), Rect::at_point(Point::new(500.0, 500.0)), &rows(), |_| true);
        assert!(hit.is_none());
    }
}
