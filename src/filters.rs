//! Filter/Sort Engine
//!
//! Pure functions that narrow a catalog snapshot by optional predicates
//! and reorder it by a chosen key. Nothing here mutates the input; every
//! call returns a freshly allocated list of borrowed records preserving
//! the relative order of survivors.

use crate::data::{Availability, StationRecord, StationType, VehicleRecord, VehicleType};

/// Vehicle filter criteria. Each field is independently optional; an
/// unset field skips its predicate. Set fields are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct VehicleFilters {
    /// Inclusive lower bound on price, LKR.
    pub price_min: Option<u64>,
    /// Inclusive upper bound on price, LKR.
    pub price_max: Option<u64>,
    pub vehicle_type: Option<VehicleType>,
    /// Exact brand match.
    pub brand: Option<String>,
    /// Inclusive lower bound on rated range, km.
    pub range_min: Option<u32>,
    pub availability: Option<Availability>,
}

/// Station filter criteria, AND-combined like [`VehicleFilters`].
#[derive(Debug, Clone, Default)]
pub struct StationFilters {
    pub station_type: Option<StationType>,
    /// Membership test against each station's connector classes.
    pub charger_type: Option<String>,
}

/// Sort orderings understood by [`sort_vehicles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    RangeHigh,
    RangeLow,
    /// Ascending Wh/km: the most efficient vehicle first.
    Efficiency,
}

impl SortKey {
    /// Parse the query-string spelling of a sort key. Unrecognized
    /// spellings yield `None`, which sorts as a passthrough.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price-low" => Some(Self::PriceLow),
            "price-high" => Some(Self::PriceHigh),
            "range-high" => Some(Self::RangeHigh),
            "range-low" => Some(Self::RangeLow),
            "efficiency" => Some(Self::Efficiency),
            _ => None,
        }
    }
}

/// Narrow `vehicles` to the records matching every set predicate.
pub fn filter_vehicles<'a>(
    vehicles: &'a [VehicleRecord],
    filters: &VehicleFilters,
) -> Vec<&'a VehicleRecord> {
    vehicles
        .iter()
        .filter(|ev| {
            filters.price_min.map_or(true, |min| ev.price >= min)
                && filters.price_max.map_or(true, |max| ev.price <= max)
                && filters
                    .vehicle_type
                    .map_or(true, |t| ev.vehicle_type == t)
                && filters.brand.as_deref().map_or(true, |b| ev.brand == b)
                && filters.range_min.map_or(true, |min| ev.range >= min)
                && filters
                    .availability
                    .map_or(true, |a| ev.availability == a)
        })
        .collect()
}

/// Reorder `vehicles` by `key`. `None` returns the list unchanged; equal
/// keys keep their relative order (stable sort), so tie order is a
/// dependable property for rendering.
pub fn sort_vehicles(
    mut vehicles: Vec<&VehicleRecord>,
    key: Option<SortKey>,
) -> Vec<&VehicleRecord> {
    match key {
        Some(SortKey::PriceLow) => vehicles.sort_by_key(|ev| ev.price),
        Some(SortKey::PriceHigh) => vehicles.sort_by(|a, b| b.price.cmp(&a.price)),
        Some(SortKey::RangeHigh) => vehicles.sort_by(|a, b| b.range.cmp(&a.range)),
        Some(SortKey::RangeLow) => vehicles.sort_by_key(|ev| ev.range),
        Some(SortKey::Efficiency) => {
            vehicles.sort_by(|a, b| a.efficiency.total_cmp(&b.efficiency))
        }
        None => {}
    }
    vehicles
}

/// Narrow `stations` to the records matching every set predicate.
pub fn filter_stations<'a>(
    stations: &'a [StationRecord],
    filters: &StationFilters,
) -> Vec<&'a StationRecord> {
    stations
        .iter()
        .filter(|station| {
            filters
                .station_type
                .map_or(true, |t| station.station_type == t)
                && filters.charger_type.as_deref().map_or(true, |wanted| {
                    station.charger_types.iter().any(|ct| ct == wanted)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ChargingTime;

    fn ev(id: u32, brand: &str, vehicle_type: VehicleType, price: u64, range: u32) -> VehicleRecord {
        VehicleRecord {
            id,
            brand: brand.to_string(),
            model: format!("Model {id}"),
            variant: String::new(),
            vehicle_type,
            year: 2024,
            price,
            range,
            battery_capacity: 50.0,
            efficiency: 150.0,
            acceleration: 8.0,
            top_speed: 160,
            seating_capacity: 5,
            charging_time: ChargingTime { ac: 8.0, dc: 1.0 },
            availability: Availability::Available,
            features: vec![],
            warranty: String::new(),
            image: String::new(),
        }
    }

    fn fleet() -> Vec<VehicleRecord> {
        vec![
            ev(1, "BYD", VehicleType::Suv, 17_900_000, 420),
            ev(2, "Nissan", VehicleType::Hatchback, 9_800_000, 270),
            ev(3, "MG", VehicleType::Suv, 14_500_000, 320),
            ev(4, "Tesla", VehicleType::Sedan, 28_500_000, 510),
        ]
    }

    fn station(id: u32, station_type: StationType, charger_types: &[&str]) -> StationRecord {
        StationRecord {
            id,
            name: format!("Station {id}"),
            location: String::new(),
            coordinates: [6.9, 79.8],
            station_type,
            charger_types: charger_types.iter().map(|s| s.to_string()).collect(),
            power: vec![],
            price: 70.0,
            hours: "24/7".to_string(),
            available: 1,
            total: 2,
            amenities: vec![],
        }
    }

    #[test]
    fn empty_filters_return_full_list_in_order() {
        let vehicles = fleet();
        let matched = filter_vehicles(&vehicles, &VehicleFilters::default());
        let ids: Vec<u32> = matched.iter().map(|ev| ev.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn price_bounds_are_inclusive_and_yield_a_subset() {
        let vehicles = fleet();
        let filters = VehicleFilters {
            price_min: Some(9_800_000),
            price_max: Some(17_900_000),
            ..Default::default()
        };
        let matched = filter_vehicles(&vehicles, &filters);

        for ev in &matched {
            assert!(ev.price >= 9_800_000 && ev.price <= 17_900_000);
        }
        // Exactly the in-bounds subset, survivors in input order.
        let ids: Vec<u32> = matched.iter().map(|ev| ev.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn predicates_and_combine() {
        let vehicles = fleet();
        let filters = VehicleFilters {
            vehicle_type: Some(VehicleType::Suv),
            range_min: Some(400),
            ..Default::default()
        };
        let ids: Vec<u32> = filter_vehicles(&vehicles, &filters)
            .iter()
            .map(|ev| ev.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn unmatched_criteria_yield_empty_not_error() {
        let vehicles = fleet();
        let filters = VehicleFilters {
            brand: Some("Rivian".to_string()),
            ..Default::default()
        };
        assert!(filter_vehicles(&vehicles, &filters).is_empty());
    }

    #[test]
    fn sort_orders_by_each_key() {
        let vehicles = fleet();
        let all: Vec<&VehicleRecord> = vehicles.iter().collect();

        let by_price: Vec<u32> = sort_vehicles(all.clone(), Some(SortKey::PriceLow))
            .iter()
            .map(|ev| ev.id)
            .collect();
        assert_eq!(by_price, vec![2, 3, 1, 4]);

        let by_range: Vec<u32> = sort_vehicles(all.clone(), Some(SortKey::RangeHigh))
            .iter()
            .map(|ev| ev.id)
            .collect();
        assert_eq!(by_range, vec![4, 1, 3, 2]);
    }

    #[test]
    fn sort_without_key_is_a_passthrough() {
        let vehicles = fleet();
        let all: Vec<&VehicleRecord> = vehicles.iter().collect();
        let ids: Vec<u32> = sort_vehicles(all, None).iter().map(|ev| ev.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        // Two pairs of equal prices; ties must keep input order.
        let vehicles = vec![
            ev(1, "A", VehicleType::Sedan, 10, 100),
            ev(2, "B", VehicleType::Sedan, 5, 100),
            ev(3, "C", VehicleType::Sedan, 10, 100),
            ev(4, "D", VehicleType::Sedan, 5, 100),
        ];
        let all: Vec<&VehicleRecord> = vehicles.iter().collect();

        let sorted: Vec<u32> = sort_vehicles(all.clone(), Some(SortKey::PriceLow))
            .iter()
            .map(|ev| ev.id)
            .collect();
        assert_eq!(sorted, vec![2, 4, 1, 3]);

        let once = sort_vehicles(all, Some(SortKey::PriceLow));
        let twice: Vec<u32> = sort_vehicles(once.clone(), Some(SortKey::PriceLow))
            .iter()
            .map(|ev| ev.id)
            .collect();
        let once_ids: Vec<u32> = once.iter().map(|ev| ev.id).collect();
        assert_eq!(once_ids, twice);
    }

    #[test]
    fn station_filters_identity_when_unset() {
        let stations = vec![
            station(1, StationType::Public, &["AC", "DC Fast"]),
            station(2, StationType::SemiPublic, &["AC"]),
        ];
        let matched = filter_stations(&stations, &StationFilters::default());
        assert_eq!(matched.len(), stations.len());
    }

    #[test]
    fn station_filters_and_combine() {
        let stations = vec![
            station(1, StationType::Public, &["AC", "DC Fast"]),
            station(2, StationType::SemiPublic, &["AC"]),
            station(3, StationType::Public, &["AC"]),
        ];
        let filters = StationFilters {
            station_type: Some(StationType::Public),
            charger_type: Some("DC Fast".to_string()),
        };
        let ids: Vec<u32> = filter_stations(&stations, &filters)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn unknown_sort_key_does_not_parse() {
        assert_eq!(SortKey::parse("price-low"), Some(SortKey::PriceLow));
        assert_eq!(SortKey::parse("alphabetical"), None);
    }
}
