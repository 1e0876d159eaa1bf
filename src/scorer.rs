//! Recommendation Scorer
//!
//! Turns a short questionnaire into a ranked shortlist. Candidates are
//! cut to the user's budget, scored by an additive multi-factor policy,
//! and ranked by descending score with catalog order breaking ties.

use serde::{Deserialize, Serialize};

use crate::data::{VehicleRecord, VehicleType};

/// Shortlist length when the caller does not ask for one.
pub const DEFAULT_TOP_N: usize = 3;

/// A user-selected weighting dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Range,
    Price,
    Performance,
    Charging,
    Space,
}

/// All priorities, in scoring order.
const ALL_PRIORITIES: [Priority; 5] = [
    Priority::Range,
    Priority::Price,
    Priority::Performance,
    Priority::Charging,
    Priority::Space,
];

/// Primary usage pattern from the questionnaire. Advisory only: it is
/// echoed back to shape the conversation, never consumed by the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsagePattern {
    City,
    Family,
    Business,
    Mixed,
}

/// One recommendation request, built fresh per call.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Budget, LKR.
    pub budget: u64,
    /// Typical daily driving, km.
    pub daily_km: f64,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    #[serde(default)]
    pub usage: Option<UsagePattern>,
}

/// Coefficient table for the additive score, versioned as a unit so the
/// weights can be tuned and tested independently of the ranking
/// mechanism. `Default` is the v1 policy.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    /// Divisor applied to rated range in km.
    pub range_divisor: f64,
    /// Divisor applied to the LKR headroom between budget and price.
    pub price_headroom_divisor: f64,
    /// Base the weighted 0-100 km/h time is subtracted from.
    pub performance_base: f64,
    /// Weight applied to the 0-100 km/h time in seconds.
    pub performance_weight: f64,
    /// DC charge times below this many hours earn a bonus.
    pub charging_reference_hours: f64,
    /// Weight applied to the DC charge-time headroom.
    pub charging_weight: f64,
    /// Space bonus for SUVs.
    pub space_suv_bonus: f64,
    /// Space bonus for every other body style.
    pub space_default_bonus: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            range_divisor: 10.0,
            price_headroom_divisor: 100_000.0,
            performance_base: 250.0,
            performance_weight: 10.0,
            charging_reference_hours: 2.0,
            charging_weight: 50.0,
            space_suv_bonus: 100.0,
            space_default_bonus: 50.0,
        }
    }
}

impl ScoringPolicy {
    /// Contribution of a single priority for one candidate.
    pub fn term(&self, priority: Priority, ev: &VehicleRecord, budget: u64) -> f64 {
        match priority {
            Priority::Range => ev.range as f64 / self.range_divisor,
            Priority::Price => {
                (budget as f64 - ev.price as f64) / self.price_headroom_divisor
            }
            Priority::Performance => {
                self.performance_base - ev.acceleration * self.performance_weight
            }
            Priority::Charging => {
                (self.charging_reference_hours - ev.charging_time.dc) * self.charging_weight
            }
            Priority::Space => {
                if ev.vehicle_type == VehicleType::Suv {
                    self.space_suv_bonus
                } else {
                    self.space_default_bonus
                }
            }
        }
    }

    /// Additive score: each selected priority contributes one independent
    /// term. Selection is a membership test, so repeated entries in the
    /// profile cannot double-count. No priorities means a score of zero.
    pub fn score(&self, profile: &UserProfile, ev: &VehicleRecord) -> f64 {
        ALL_PRIORITIES
            .into_iter()
            .filter(|p| profile.priorities.contains(p))
            .map(|p| self.term(p, ev, profile.budget))
            .sum()
    }
}

/// A ranked candidate: the full record plus its score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredVehicle {
    #[serde(flatten)]
    pub vehicle: VehicleRecord,
    pub score: f64,
}

/// Produce the top-`top_n` recommendations for `profile`.
///
/// When nothing fits the budget, the candidate pool falls back to the
/// first `top_n` catalog entries in storage order — not the cheapest.
/// That behavior is kept as-is for output compatibility; the fallback
/// entries are still scored and ranked among themselves.
pub fn recommend(
    profile: &UserProfile,
    vehicles: &[VehicleRecord],
    policy: &ScoringPolicy,
    top_n: usize,
) -> Vec<ScoredVehicle> {
    let mut candidates: Vec<&VehicleRecord> = vehicles
        .iter()
        .filter(|ev| ev.price <= profile.budget)
        .collect();
    if candidates.is_empty() {
        candidates = vehicles.iter().take(top_n).collect();
    }

    let mut scored: Vec<ScoredVehicle> = candidates
        .into_iter()
        .map(|ev| ScoredVehicle {
            score: policy.score(profile, ev),
            vehicle: ev.clone(),
        })
        .collect();

    // Stable sort: equal scores keep catalog order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Availability, ChargingTime};
    use approx::assert_relative_eq;

    fn ev(id: u32, vehicle_type: VehicleType, price: u64, range: u32) -> VehicleRecord {
        VehicleRecord {
            id,
            brand: "BYD".to_string(),
            model: format!("Model {id}"),
            variant: String::new(),
            vehicle_type,
            year: 2024,
            price,
            range,
            battery_capacity: 60.0,
            efficiency: 150.0,
            acceleration: 7.5,
            top_speed: 160,
            seating_capacity: 5,
            charging_time: ChargingTime { ac: 8.0, dc: 1.0 },
            availability: Availability::Available,
            features: vec![],
            warranty: String::new(),
            image: String::new(),
        }
    }

    fn profile(budget: u64, priorities: Vec<Priority>) -> UserProfile {
        UserProfile {
            budget,
            daily_km: 50.0,
            priorities,
            usage: None,
        }
    }

    #[test]
    fn each_priority_contributes_its_term() {
        let policy = ScoringPolicy::default();
        let suv = ev(1, VehicleType::Suv, 15_000_000, 420);

        assert_relative_eq!(
            policy.term(Priority::Range, &suv, 20_000_000),
            42.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            policy.term(Priority::Price, &suv, 20_000_000),
            50.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            policy.term(Priority::Performance, &suv, 20_000_000),
            175.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            policy.term(Priority::Charging, &suv, 20_000_000),
            50.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            policy.term(Priority::Space, &suv, 20_000_000),
            100.0,
            max_relative = 1e-12
        );

        let hatch = ev(2, VehicleType::Hatchback, 15_000_000, 420);
        assert_relative_eq!(
            policy.term(Priority::Space, &hatch, 20_000_000),
            50.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn score_is_the_sum_of_selected_terms_only() {
        let policy = ScoringPolicy::default();
        let suv = ev(1, VehicleType::Suv, 15_000_000, 420);
        let p = profile(20_000_000, vec![Priority::Range, Priority::Space]);
        assert_relative_eq!(policy.score(&p, &suv), 142.0, max_relative = 1e-12);
    }

    #[test]
    fn duplicate_priorities_do_not_double_count() {
        let policy = ScoringPolicy::default();
        let suv = ev(1, VehicleType::Suv, 15_000_000, 420);
        let p = profile(20_000_000, vec![Priority::Range, Priority::Range]);
        assert_relative_eq!(policy.score(&p, &suv), 42.0, max_relative = 1e-12);
    }

    #[test]
    fn empty_priorities_rank_by_catalog_order() {
        let vehicles = vec![
            ev(1, VehicleType::Suv, 10, 400),
            ev(2, VehicleType::Sedan, 20, 300),
            ev(3, VehicleType::Hatchback, 30, 200),
        ];
        let ranked = recommend(
            &profile(100, vec![]),
            &vehicles,
            &ScoringPolicy::default(),
            3,
        );
        let ids: Vec<u32> = ranked.iter().map(|s| s.vehicle.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(ranked.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn affordability_filter_keeps_only_in_budget_vehicles() {
        let vehicles = vec![
            ev(1, VehicleType::Suv, 10_000_000, 400),
            ev(2, VehicleType::Sedan, 30_000_000, 500),
            ev(3, VehicleType::Hatchback, 8_000_000, 300),
        ];
        let ranked = recommend(
            &profile(12_000_000, vec![Priority::Range]),
            &vehicles,
            &ScoringPolicy::default(),
            3,
        );
        let ids: Vec<u32> = ranked.iter().map(|s| s.vehicle.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn zero_affordable_candidates_fall_back_to_catalog_prefix() {
        // Deliberately not the cheapest: the fallback is the first N
        // entries in storage order.
        let vehicles = vec![
            ev(1, VehicleType::Suv, 40_000_000, 400),
            ev(2, VehicleType::Sedan, 50_000_000, 500),
            ev(3, VehicleType::Hatchback, 20_000_000, 300),
            ev(4, VehicleType::Hatchback, 15_000_000, 250),
        ];
        let ranked = recommend(
            &profile(1_000_000, vec![]),
            &vehicles,
            &ScoringPolicy::default(),
            3,
        );
        let ids: Vec<u32> = ranked.iter().map(|s| s.vehicle.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn shortlist_truncates_to_top_n() {
        let vehicles: Vec<VehicleRecord> = (1..=6)
            .map(|id| ev(id, VehicleType::Sedan, 1_000_000, 100 * id))
            .collect();
        let ranked = recommend(
            &profile(10_000_000, vec![Priority::Range]),
            &vehicles,
            &ScoringPolicy::default(),
            3,
        );
        assert_eq!(ranked.len(), 3);
        // Longest range first.
        let ids: Vec<u32> = ranked.iter().map(|s| s.vehicle.id).collect();
        assert_eq!(ids, vec![6, 5, 4]);
    }

    #[test]
    fn fewer_candidates_than_top_n_returns_them_all() {
        let vehicles = vec![ev(1, VehicleType::Suv, 1_000_000, 400)];
        let ranked = recommend(
            &profile(2_000_000, vec![Priority::Range]),
            &vehicles,
            &ScoringPolicy::default(),
            3,
        );
        assert_eq!(ranked.len(), 1);
    }
}
