//! Cost Projection Engine
//!
//! Five-year total-cost-of-ownership estimates for an EV, plus a parallel
//! projection for an equivalent petrol vehicle. Every function here is a
//! pure function of its inputs: identical arguments produce bit-identical
//! output, and nothing is cached between calls.

use serde::Serialize;

use crate::error::{EngineError, Result};

/// Projection horizon, years.
pub const PROJECTION_YEARS: f64 = 5.0;
/// Assumed fleet-average consumption, kWh per km (150 Wh/km).
pub const EV_EFFICIENCY_KWH_PER_KM: f64 = 0.15;
/// Average domestic electricity rate, LKR per kWh.
pub const ELECTRICITY_RATE: f64 = 32.0;
/// Flat annual EV maintenance, LKR.
pub const EV_ANNUAL_MAINTENANCE: f64 = 50_000.0;
/// Annual insurance as a fraction of vehicle value.
pub const INSURANCE_RATE: f64 = 0.03;
/// Resale value lost over the horizon, as a fraction of purchase price.
/// Reported alongside the totals, not added into them.
pub const EV_DEPRECIATION_RATE: f64 = 0.35;

/// Petrol price, LKR per litre.
pub const PETROL_PRICE_PER_LITRE: f64 = 420.0;
/// Petrol fuel efficiency, km per litre.
pub const PETROL_KM_PER_LITRE: f64 = 12.0;
/// Flat annual ICE maintenance, LKR.
pub const PETROL_ANNUAL_MAINTENANCE: f64 = 120_000.0;
/// Comparable petrol car price as a fraction of the EV price.
pub const PETROL_PRICE_FACTOR: f64 = 0.6;

/// Reference range used for the per-100 km charging figure, km.
const REFERENCE_RANGE_KM: f64 = 400.0;

/// Five-year ownership breakdown for one EV.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostProjection {
    pub purchase_price: f64,
    pub annual_electricity: f64,
    pub annual_maintenance: f64,
    pub annual_insurance: f64,
    pub total_running: f64,
    pub depreciation: f64,
    pub total_cost: f64,
    pub total_cost_per_km: f64,
}

/// Five-year ownership breakdown for the equivalent petrol vehicle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetrolProjection {
    pub purchase_price: f64,
    pub annual_fuel: f64,
    pub annual_maintenance: f64,
    pub annual_insurance: f64,
    pub total_running: f64,
    pub total_cost: f64,
    pub total_cost_per_km: f64,
}

/// EV-versus-petrol comparison. A negative `savings` is a loss, reported
/// as such rather than treated as an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetrolComparison {
    pub ev: CostProjection,
    pub petrol: PetrolProjection,
    pub savings: f64,
    pub savings_percentage: f64,
}

/// Full-charge cost breakdown for one battery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingCost {
    pub full_charge: f64,
    #[serde(rename = "per100km")]
    pub per_100_km: f64,
}

fn check_positive(value: f64, name: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// Project the five-year cost of owning an EV bought at `ev_price` and
/// driven `monthly_km` per month.
///
/// A `monthly_km` of zero is rejected up front: the per-km figure would
/// otherwise divide by zero.
pub fn project_ownership_cost(ev_price: f64, monthly_km: f64) -> Result<CostProjection> {
    check_positive(ev_price, "price")?;
    check_positive(monthly_km, "monthly distance")?;

    let annual_km = monthly_km * 12.0;
    let annual_electricity = annual_km * EV_EFFICIENCY_KWH_PER_KM * ELECTRICITY_RATE;
    let annual_insurance = ev_price * INSURANCE_RATE;
    let total_running =
        (annual_electricity + EV_ANNUAL_MAINTENANCE + annual_insurance) * PROJECTION_YEARS;
    let total_cost = ev_price + total_running;

    Ok(CostProjection {
        purchase_price: ev_price,
        annual_electricity,
        annual_maintenance: EV_ANNUAL_MAINTENANCE,
        annual_insurance,
        total_running,
        depreciation: ev_price * EV_DEPRECIATION_RATE,
        total_cost,
        total_cost_per_km: total_cost / (annual_km * PROJECTION_YEARS),
    })
}

/// Compare EV ownership against an equivalent petrol vehicle priced at
/// 60% of the EV.
///
/// The EV side is obtained by calling [`project_ownership_cost`]; the
/// savings figure is always the difference of the two projections, never
/// an independent recomputation.
pub fn compare_with_petrol(ev_price: f64, monthly_km: f64) -> Result<PetrolComparison> {
    let ev = project_ownership_cost(ev_price, monthly_km)?;

    let petrol_price = ev_price * PETROL_PRICE_FACTOR;
    let annual_km = monthly_km * 12.0;
    let annual_fuel = (annual_km / PETROL_KM_PER_LITRE) * PETROL_PRICE_PER_LITRE;
    let annual_insurance = petrol_price * INSURANCE_RATE;
    let total_running =
        (annual_fuel + PETROL_ANNUAL_MAINTENANCE + annual_insurance) * PROJECTION_YEARS;
    let total_cost = petrol_price + total_running;

    let savings = total_cost - ev.total_cost;
    let savings_percentage = savings / total_cost * 100.0;

    Ok(PetrolComparison {
        petrol: PetrolProjection {
            purchase_price: petrol_price,
            annual_fuel,
            annual_maintenance: PETROL_ANNUAL_MAINTENANCE,
            annual_insurance,
            total_running,
            total_cost,
            total_cost_per_km: total_cost / (annual_km * PROJECTION_YEARS),
        },
        savings,
        savings_percentage,
        ev,
    })
}

/// Cost of one full charge at `electricity_rate`, with a per-100 km
/// figure against the reference range.
pub fn charging_cost(battery_capacity: f64, electricity_rate: f64) -> Result<ChargingCost> {
    check_positive(battery_capacity, "battery capacity")?;
    check_positive(electricity_rate, "electricity rate")?;

    let full_charge = battery_capacity * electricity_rate;
    Ok(ChargingCost {
        full_charge,
        per_100_km: (full_charge / REFERENCE_RANGE_KM) * 100.0,
    })
}

/// Theoretical range in km from battery capacity (kWh) and consumption
/// (Wh/km).
pub fn theoretical_range(battery_capacity: f64, efficiency_wh_per_km: f64) -> Result<f64> {
    check_positive(battery_capacity, "battery capacity")?;
    check_positive(efficiency_wh_per_km, "efficiency")?;
    Ok(battery_capacity * 1000.0 / efficiency_wh_per_km)
}
