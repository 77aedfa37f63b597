//! Tariffs and revenue calculations, in ₪.

use crate::ecs::VisitorKind;
use crate::park::RestaurantKind;

/// Adult / per-person park entry fee.
pub const ENTRY_FEE_PER_PERSON: f64 = 150.0;
/// Entry fee per child in a family.
pub const KID_ENTRY_FEE: f64 = 75.0;
/// Express-pass surcharge per person.
pub const EXPRESS_SURCHARGE_PER_PERSON: f64 = 50.0;

/// Park entry fee booked when a party clears reception. Families pay the adult
/// tariff for the two parents and the kid tariff per child; everyone else pays
/// the per-person tariff.
pub fn entry_fee(kind: VisitorKind, group_size: u32, num_kids: u32) -> f64 {
    match kind {
        VisitorKind::Family => 2.0 * ENTRY_FEE_PER_PERSON + num_kids as f64 * KID_ENTRY_FEE,
        _ => group_size as f64 * ENTRY_FEE_PER_PERSON,
    }
}

pub fn express_surcharge(group_size: u32) -> f64 {
    group_size as f64 * EXPRESS_SURCHARGE_PER_PERSON
}

/// Photo-package revenue at departure, tiered on the final rating:
/// below 6 nothing, one print up to 7.5, the ten-print package up to 8.5,
/// prints plus video above that.
pub fn photo_package_revenue(final_rating: f64) -> f64 {
    if final_rating < 6.0 {
        0.0
    } else if final_rating < 7.5 {
        20.0
    } else if final_rating < 8.5 {
        100.0
    } else {
        120.0
    }
}

/// Meal price per party. Pizza is priced per pie: a single visitor pays for a
/// small one, any larger party shares a family-size pie.
pub fn meal_price(kind: RestaurantKind, group_size: u32) -> f64 {
    match kind {
        RestaurantKind::Burger => 100.0 * group_size as f64,
        RestaurantKind::Pizza => {
            if group_size == 1 {
                40.0
            } else {
                100.0
            }
        }
        RestaurantKind::Salad => 65.0 * group_size as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_entry_prices_parents_and_kids_separately() {
        assert_eq!(entry_fee(VisitorKind::Family, 5, 3), 2.0 * 150.0 + 3.0 * 75.0);
        assert_eq!(entry_fee(VisitorKind::TeenGroup, 4, 0), 600.0);
        assert_eq!(entry_fee(VisitorKind::SingleVisitor, 1, 0), 150.0);
    }

    #[test]
    fn photo_tiers_follow_rating_boundaries() {
        assert_eq!(photo_package_revenue(5.99), 0.0);
        assert_eq!(photo_package_revenue(6.0), 20.0);
        assert_eq!(photo_package_revenue(7.49), 20.0);
        assert_eq!(photo_package_revenue(7.5), 100.0);
        assert_eq!(photo_package_revenue(8.49), 100.0);
        assert_eq!(photo_package_revenue(8.5), 120.0);
        assert_eq!(photo_package_revenue(10.0), 120.0);
    }

    #[test]
    fn pizza_prices_by_party_size() {
        assert_eq!(meal_price(RestaurantKind::Pizza, 1), 40.0);
        assert_eq!(meal_price(RestaurantKind::Pizza, 4), 100.0);
        assert_eq!(meal_price(RestaurantKind::Burger, 3), 300.0);
        assert_eq!(meal_price(RestaurantKind::Salad, 2), 130.0);
    }

    #[test]
    fn express_surcharge_is_per_person() {
        assert_eq!(express_surcharge(6), 300.0);
    }
}
