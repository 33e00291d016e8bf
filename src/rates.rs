// Copyright (c) 2018-2022  Ministerio de Fomento
//                          Instituto de Ciencias de la Construcción Eduardo Torroja (IETcc-CSIC)

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

/*!
Resolución de tarifas
=====================

Maps a bill scenario to a concrete `RateRecord` for each fuel used by the building.

Fuels without consumption get no rate and no bill. A used fuel without a marginal
rate is reported as a warning, which makes the whole scenario non computable.
*/

use itertools::Itertools;
use log::debug;

use crate::{
    ledger::{Building, FuelLedger},
    types::{BillScenario, FuelMap, FuelType, GridConnectionFee, RateRecord},
};
use strum::IntoEnumIterator;

/// Tarifas resueltas de un escenario
///
/// Rates resolved for a bill scenario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRates {
    /// Rate for each fuel with consumption (None for unused fuels or missing rates)
    pub rates: FuelMap<Option<RateRecord>>,
    /// Missing rate warnings (de-duplicated)
    pub warnings: Vec<String>,
}

/// Warning message for a fuel without marginal rate
pub fn missing_rate_warning(fuel: FuelType) -> String {
    format!("Could not find a marginal {} rate.", fuel)
}

/// Cargo mensual por conexión a red para los sistemas fotovoltaicos del edificio
///
/// Monthly grid connection fee. Zero for buildings without PV.
///
/// `has_pv` tells whether the home has PV, either from nameplate metadata or from
/// nonzero production. A per kW fee needs the nameplate capacity.
pub fn grid_connection_fee(
    fee: Option<GridConnectionFee>,
    building: &Building,
    has_pv: bool,
) -> f64 {
    if !has_pv {
        return 0.0;
    }
    match fee {
        Some(GridConnectionFee::PerKw(fee_per_kw)) => building
            .pv_nameplate_kw
            .iter()
            .map(|kw| fee_per_kw * kw)
            .sum(),
        Some(GridConnectionFee::Monthly(fee)) => fee,
        None => 0.0,
    }
}

/// Tarifa de un combustible en un escenario
///
/// Resolve the rate of `fuel` in `scenario`. Returns None when there is no marginal
/// rate for the fuel.
pub fn resolve(
    scenario: &BillScenario,
    fuel: FuelType,
    building: &Building,
    has_pv: bool,
) -> Option<RateRecord> {
    let (fixed_charge, marginal_rate) = scenario.simple_rates(fuel);
    let flat_marginal_rate = marginal_rate?;
    let record = match fuel {
        FuelType::Electricity => RateRecord {
            fuel,
            fixed_monthly_charge: fixed_charge
                + grid_connection_fee(scenario.electricity.grid_fee, building, has_pv),
            flat_marginal_rate,
            pv_compensation: Some(scenario.electricity.pv_compensation),
        },
        FuelType::NaturalGas
        | FuelType::FuelOil
        | FuelType::Propane
        | FuelType::WoodCord
        | FuelType::WoodPellets
        | FuelType::Coal => RateRecord {
            fuel,
            fixed_monthly_charge: fixed_charge,
            flat_marginal_rate,
            pv_compensation: None,
        },
    };
    Some(record)
}

/// Tarifas de todos los combustibles consumidos en el edificio
///
/// Resolve rates for every fuel with nonzero annual consumption.
pub fn resolve_rates(
    scenario: &BillScenario,
    ledger: &FuelLedger,
    building: &Building,
) -> ResolvedRates {
    let mut resolved = ResolvedRates::default();
    let mut warnings = Vec::new();
    let has_pv = building.has_pv() || ledger.has_production();
    for fuel in FuelType::iter() {
        if ledger.annual_consumption(fuel) == 0.0 {
            continue;
        }
        match resolve(scenario, fuel, building, has_pv) {
            Some(record) => {
                debug!(
                    "{}: {} rate, fixed {:.2} $/month, marginal {} $/{}",
                    scenario.name,
                    fuel,
                    record.fixed_monthly_charge,
                    record.flat_marginal_rate,
                    fuel.unit()
                );
                resolved.rates[fuel] = Some(record);
            }
            None => warnings.push(missing_rate_warning(fuel)),
        }
    }
    resolved.warnings = warnings.into_iter().unique().collect();
    resolved
}
