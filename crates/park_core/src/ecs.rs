//! Visitor components and state enums.
//!
//! Visitors are ECS entities carrying a [Visitor] component; families also
//! carry a [FamilyGroup] with the split bookkeeping, and subgroups a
//! [ParentFamily] backlink to the family entity they came from. The family
//! outlives its subgroups; the backlink is non-owning.

use bevy_ecs::prelude::{Component, Entity};

use crate::park::FacilityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorKind {
    Family,
    SubGroup,
    TeenGroup,
    SingleVisitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorStatus {
    /// Somewhere between reception and departure.
    InPark,
    /// A family that has split; its subgroups carry the journey on.
    SplitIntoSubgroups,
    /// Completed; counted exactly once in the completion totals.
    Departed,
}

/// Shared capability set of every party moving through the park.
#[derive(Debug, Clone, Component)]
pub struct Visitor {
    pub kind: VisitorKind,
    pub group_size: u32,
    /// Youngest age in the party, in years.
    pub min_age: f64,
    /// Hour of day (fractional) at which the party intends to leave.
    pub departure_hour: f64,
    pub has_express_pass: bool,
    pub rating: f64,
    pub visited: Vec<FacilityId>,
    /// Simulation ms at which the party entered its current facility queue.
    pub queued_since: Option<u64>,
    pub status: VisitorStatus,
    /// How many queues this party has walked away from.
    pub abandon_count: u32,
}

impl Visitor {
    pub fn new(kind: VisitorKind, group_size: u32, min_age: f64, departure_hour: f64) -> Self {
        Self {
            kind,
            group_size,
            min_age,
            departure_hour,
            has_express_pass: false,
            rating: 10.0,
            visited: Vec::new(),
            queued_since: None,
            status: VisitorStatus::InPark,
            abandon_count: 0,
        }
    }

    /// Minutes a party waits before walking away from a queue.
    pub fn abandonment_threshold_min(&self) -> f64 {
        match self.kind {
            VisitorKind::Family | VisitorKind::SubGroup => 15.0,
            VisitorKind::TeenGroup => 20.0,
            VisitorKind::SingleVisitor => 30.0,
        }
    }

    pub fn raise_rating(&mut self, delta: f64) {
        self.rating += delta;
    }

    /// Ratings never go below zero.
    pub fn lower_rating(&mut self, amount: f64) {
        self.rating = (self.rating - amount).max(0.0);
    }

    pub fn has_visited(&self, facility: FacilityId) -> bool {
        self.visited.contains(&facility)
    }
}

/// Family-only bookkeeping: composition and the subgroup join counter.
#[derive(Debug, Clone, Component)]
pub struct FamilyGroup {
    pub kids_ages: Vec<f64>,
    pub is_split: bool,
    /// 1 before a split, the number of subgroups after; the family completes
    /// exactly when this reaches 0.
    pub active_subgroups: u32,
    pub total_size: u32,
}

impl FamilyGroup {
    pub fn new(kids_ages: Vec<f64>) -> Self {
        let total_size = kids_ages.len() as u32 + 2;
        Self {
            kids_ages,
            is_split: false,
            active_subgroups: 1,
            total_size,
        }
    }
}

/// Non-owning backlink from a subgroup to its family entity.
#[derive(Debug, Clone, Copy, Component)]
pub struct ParentFamily(pub Entity);

/// One planned subgroup of a family split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubGroupPlan {
    pub size: u32,
    pub min_age: f64,
}

/// Plan a family split into up to `num_groups` subgroups.
///
/// Kids under 8 go with one parent; kids 12 and over may go out on their own;
/// whoever remains (the 8-11 bucket and the other parent) forms the last
/// group, with min age taken from that bucket or defaulting to 14. Returns
/// `None` when fewer than two groups can be formed, in which case the family
/// stays together.
pub fn plan_family_split(
    kids_ages: &[f64],
    num_groups: u32,
    total_size: u32,
) -> Option<Vec<SubGroupPlan>> {
    let under_8: Vec<f64> = kids_ages.iter().copied().filter(|a| *a < 8.0).collect();
    let mid: Vec<f64> = kids_ages
        .iter()
        .copied()
        .filter(|a| (8.0..12.0).contains(a))
        .collect();
    let over_12: Vec<f64> = kids_ages.iter().copied().filter(|a| *a >= 12.0).collect();

    let mut plans: Vec<SubGroupPlan> = Vec::new();

    if !under_8.is_empty() {
        plans.push(SubGroupPlan {
            size: 1 + under_8.len() as u32,
            min_age: under_8.iter().copied().fold(f64::INFINITY, f64::min),
        });
    }

    if !over_12.is_empty() && (plans.len() as u32) < num_groups {
        plans.push(SubGroupPlan {
            size: over_12.len() as u32,
            min_age: over_12.iter().copied().fold(f64::INFINITY, f64::min),
        });
    }

    if (plans.len() as u32) < num_groups {
        let taken: u32 = plans.iter().map(|p| p.size).sum();
        let remaining = total_size.saturating_sub(taken);
        if remaining > 0 {
            let min_age = if mid.is_empty() {
                14.0
            } else {
                mid.iter().copied().fold(f64::INFINITY, f64::min)
            };
            plans.push(SubGroupPlan {
                size: remaining,
                min_age,
            });
        }
    }

    if plans.len() < 2 {
        return None;
    }
    Some(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_floors_at_zero() {
        let mut v = Visitor::new(VisitorKind::SingleVisitor, 1, 30.0, 19.0);
        v.rating = 0.5;
        v.lower_rating(0.8);
        assert_eq!(v.rating, 0.0);
        v.raise_rating(1.0);
        assert_eq!(v.rating, 1.0);
    }

    #[test]
    fn abandonment_thresholds_by_kind() {
        let family = Visitor::new(VisitorKind::Family, 4, 5.0, 17.0);
        let teens = Visitor::new(VisitorKind::TeenGroup, 4, 14.0, 19.0);
        let single = Visitor::new(VisitorKind::SingleVisitor, 1, 40.0, 19.0);
        assert_eq!(family.abandonment_threshold_min(), 15.0);
        assert_eq!(teens.abandonment_threshold_min(), 20.0);
        assert_eq!(single.abandonment_threshold_min(), 30.0);
    }

    #[test]
    fn split_keeps_toddlers_with_a_parent() {
        // Kids: 3 and 15; two parents; total 4.
        let plans = plan_family_split(&[3.0, 15.0], 2, 4).expect("split");
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0], SubGroupPlan { size: 2, min_age: 3.0 });
        // The 15-year-old goes alone; the other parent is the remainder group,
        // but only two groups were requested.
        assert_eq!(plans[1], SubGroupPlan { size: 1, min_age: 15.0 });
    }

    #[test]
    fn split_remainder_gets_default_age_when_mid_bucket_empty() {
        // Kids: 3, 4; parents 2; total 4. Requesting 2 groups: toddlers with
        // one parent, remainder is the other parent alone (default age 14).
        let plans = plan_family_split(&[3.0, 4.0], 2, 4).expect("split");
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].size, 3);
        assert_eq!(plans[0].min_age, 3.0);
        assert_eq!(plans[1], SubGroupPlan { size: 1, min_age: 14.0 });
    }

    #[test]
    fn split_fills_three_groups_when_requested() {
        // Kids: 5, 9, 13; total 5.
        let plans = plan_family_split(&[5.0, 9.0, 13.0], 3, 5).expect("split");
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0], SubGroupPlan { size: 2, min_age: 5.0 });
        assert_eq!(plans[1], SubGroupPlan { size: 1, min_age: 13.0 });
        assert_eq!(plans[2], SubGroupPlan { size: 2, min_age: 9.0 });
        let total: u32 = plans.iter().map(|p| p.size).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn split_cancelled_when_only_one_group_forms() {
        // 1 parent + toddler, remainder is the other parent: two groups.
        let plans = plan_family_split(&[3.0], 2, 3);
        assert!(plans.is_some());

        // Every kid in the 8-11 bucket: the whole family is one remainder
        // group, so the split is cancelled.
        let plans = plan_family_split(&[9.0, 10.0], 2, 4);
        assert!(plans.is_none());
    }

    #[test]
    fn split_sizes_always_cover_the_family() {
        let plans = plan_family_split(&[2.0, 9.0, 9.5, 14.0, 17.0], 3, 7).expect("split");
        let total: u32 = plans.iter().map(|p| p.size).sum();
        assert_eq!(total, 7);
    }
}
