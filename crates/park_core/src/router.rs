//! Next-facility selection.
//!
//! A pure decision over the park's queue lengths and a snapshot of the party:
//! no state is touched, so the router can be exercised directly in tests and
//! re-used by every system that moves a party onward.

use crate::ecs::VisitorKind;
use crate::park::{Facility, FacilityId, Park};

/// What the router needs to know about a party.
#[derive(Debug, Clone)]
pub struct RoutingRequest<'a> {
    pub kind: VisitorKind,
    pub min_age: f64,
    pub visited: &'a [FacilityId],
    /// True only for the routing done straight out of reception.
    pub first_visit: bool,
}

impl RoutingRequest<'_> {
    fn visited(&self, id: FacilityId) -> bool {
        self.visited.contains(&id)
    }
}

/// Age gates: the facility's floor must be at or below the party's youngest
/// member, and a kids-only facility takes no party older than its ceiling.
fn age_eligible(facility: &Facility, min_age: f64) -> bool {
    facility.age_limit <= min_age && ceiling_admits(facility, min_age)
}

fn ceiling_admits(facility: &Facility, min_age: f64) -> bool {
    facility.kids_age_ceiling.map_or(true, |c| min_age <= c)
}

/// Pick the best next facility for a party, or `None` when the visit is over.
///
/// Branches apply in order and the first one with a non-empty eligible set
/// wins; within a set the facility with the fewest people waiting (regular +
/// express) is chosen, ties broken by park insertion order.
pub fn choose_facility(park: &Park, request: &RoutingRequest<'_>) -> Option<FacilityId> {
    // Everything age-appropriate already seen: the visit is over.
    let any_remaining = park
        .facilities
        .iter()
        .enumerate()
        .any(|(i, f)| f.age_limit <= request.min_age && !request.visited(FacilityId(i)));
    if !any_remaining {
        return None;
    }

    // Families fresh from reception warm up on rides without an age floor.
    if request.first_visit
        && matches!(request.kind, VisitorKind::Family | VisitorKind::SubGroup)
    {
        let pick = shortest_queue(park, |i, f| {
            f.age_limit == 0.0 && ceiling_admits(f, request.min_age) && !request.visited(i)
        });
        if pick.is_some() {
            return pick;
        }
    }

    if request.kind == VisitorKind::TeenGroup {
        let pick = shortest_queue(park, |i, f| {
            f.adrenaline_level >= 3 && f.age_limit <= request.min_age && !request.visited(i)
        });
        if pick.is_some() {
            return pick;
        }
    }

    if request.kind == VisitorKind::SingleVisitor {
        let pick = if request.first_visit {
            shortest_queue(park, |i, f| f.age_limit >= 12.0 && !request.visited(i))
        } else {
            shortest_queue(park, |i, f| !f.is_kids_only() && !request.visited(i))
        };
        if pick.is_some() {
            return pick;
        }
    }

    shortest_queue(park, |i, f| {
        age_eligible(f, request.min_age) && !request.visited(i)
    })
}

fn shortest_queue<F>(park: &Park, mut eligible: F) -> Option<FacilityId>
where
    F: FnMut(FacilityId, &Facility) -> bool,
{
    let mut best: Option<(usize, usize)> = None; // (waiting, index)
    for (i, facility) in park.facilities.iter().enumerate() {
        if !eligible(FacilityId(i), facility) {
            continue;
        }
        let waiting = facility.total_waiting();
        // Strict comparison keeps the earliest facility on ties.
        if best.map_or(true, |(w, _)| waiting < w) {
            best = Some((waiting, i));
        }
    }
    best.map(|(_, i)| FacilityId(i))
}
