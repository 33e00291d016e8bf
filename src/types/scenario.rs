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
Escenarios de facturación
=========================

A bill scenario is a named set of utility rates: fixed monthly charges and marginal
rates for every fuel, plus the PV compensation policy and grid connection fees for
electricity.

Scenarios are read from JSON:

```json
[{
    "name": "Bills",
    "electricity": {
        "fixed_charge": 8.0,
        "marginal_rate": 0.12,
        "pv_compensation": { "type": "NetMetering", "sellback": "UserSpecified", "user_rate": 0.03 },
        "grid_fee": { "per_kw": 2.5 }
    },
    "natural_gas": { "fixed_charge": 8.0, "marginal_rate": 1.1 }
}]
```
*/

use serde::{Deserialize, Serialize};

use super::FuelType;
use crate::error::Result;

/// Default excess sellback rate for net metering with user-specified sellback [$/kWh]
pub const DEFAULT_USER_SELLBACK_RATE: f64 = 0.03;

/// Tarifas de un combustible (salvo electricidad)
///
/// Simple rates for a fuel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelRates {
    /// Fixed charge [$/month]
    #[serde(default)]
    pub fixed_charge: f64,
    /// Marginal rate [$/unit]
    #[serde(default)]
    pub marginal_rate: Option<f64>,
}

/// Tipo de tarifa eléctrica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Tariff {
    /// Fixed charge plus flat marginal rate
    Simple,
    /// Time-of-use / tiered tariff defined in an external file
    ///
    /// It is billed with the simple algorithm.
    Detailed {
        /// Tariff file path
        #[serde(default)]
        tariff_file: Option<String>,
    },
}

impl Default for Tariff {
    fn default() -> Self {
        Tariff::Simple
    }
}

/// Valoración anual de la energía exportada en balance neto
///
/// Net metering annual excess sellback rate type
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellbackType {
    /// Excess is paid at a user given rate
    #[serde(alias = "User-Specified")]
    UserSpecified,
    /// Excess is paid at the retail marginal rate
    #[serde(alias = "Retail Electricity Cost")]
    RetailElectricityCost,
}

/// Política de compensación de la producción fotovoltaica
///
/// PV compensation policy
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PvCompensation {
    /// Exported energy offsets consumption at the retail rate
    NetMetering {
        /// How the annual net export is compensated
        sellback: SellbackType,
        /// Annual excess sellback rate [$/kWh] (UserSpecified)
        #[serde(default)]
        user_rate: Option<f64>,
    },
    /// All exported energy is paid at a fixed rate
    FeedInTariff {
        /// Feed-in tariff rate [$/kWh]
        rate: f64,
    },
}

impl Default for PvCompensation {
    fn default() -> Self {
        PvCompensation::NetMetering {
            sellback: SellbackType::UserSpecified,
            user_rate: Some(DEFAULT_USER_SELLBACK_RATE),
        }
    }
}

/// Cargo por conexión a red de los sistemas fotovoltaicos
///
/// Monthly grid connection fee for homes with PV
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridConnectionFee {
    /// Fee per kW of PV nameplate capacity [$/kW/month]
    PerKw(f64),
    /// Flat fee [$/month]
    Monthly(f64),
}

/// Tarifas de electricidad
///
/// Electricity rates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectricityRates {
    /// Fixed charge [$/month]
    #[serde(default)]
    pub fixed_charge: f64,
    /// Marginal rate [$/kWh]
    #[serde(default)]
    pub marginal_rate: Option<f64>,
    /// Tariff kind
    #[serde(default)]
    pub tariff: Tariff,
    /// PV compensation policy
    #[serde(default)]
    pub pv_compensation: PvCompensation,
    /// Grid connection fee, only billed for homes with PV
    #[serde(default)]
    pub grid_fee: Option<GridConnectionFee>,
}

/// Escenario de facturación
///
/// Named bill scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillScenario {
    /// Scenario name, used as output key prefix
    pub name: String,
    /// Electricity rates
    #[serde(default)]
    pub electricity: ElectricityRates,
    /// Natural gas rates
    #[serde(default)]
    pub natural_gas: FuelRates,
    /// Fuel oil rates
    #[serde(default)]
    pub fuel_oil: FuelRates,
    /// Propane rates
    #[serde(default)]
    pub propane: FuelRates,
    /// Cord wood rates
    #[serde(default)]
    pub wood_cord: FuelRates,
    /// Wood pellets rates
    #[serde(default)]
    pub wood_pellets: FuelRates,
    /// Coal rates
    #[serde(default)]
    pub coal: FuelRates,
}

impl BillScenario {
    /// Fixed charge and marginal rate for any fuel
    pub fn simple_rates(&self, fuel: FuelType) -> (f64, Option<f64>) {
        let rates = match fuel {
            FuelType::Electricity => {
                return (
                    self.electricity.fixed_charge,
                    self.electricity.marginal_rate,
                )
            }
            FuelType::NaturalGas => &self.natural_gas,
            FuelType::FuelOil => &self.fuel_oil,
            FuelType::Propane => &self.propane,
            FuelType::WoodCord => &self.wood_cord,
            FuelType::WoodPellets => &self.wood_pellets,
            FuelType::Coal => &self.coal,
        };
        (rates.fixed_charge, rates.marginal_rate)
    }

    /// Parse a list of bill scenarios from JSON
    pub fn list_from_json(json: &str) -> Result<Vec<BillScenario>> {
        Ok(serde_json::from_str(json)?)
    }
}
