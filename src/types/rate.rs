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

//! Tarifas resueltas para un combustible

use serde::{Deserialize, Serialize};

use super::{FuelType, PvCompensation};

/// Tarifa aplicable a un combustible en un escenario
///
/// Concrete rate for a fuel in a bill scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Fuel type
    pub fuel: FuelType,
    /// Fixed charge [$/month], including grid connection fees for electricity
    pub fixed_monthly_charge: f64,
    /// Flat marginal rate [$/unit]
    pub flat_marginal_rate: f64,
    /// PV compensation policy (electricity only)
    pub pv_compensation: Option<PvCompensation>,
}

impl RateRecord {
    /// Feed-in tariff rate, if the PV compensation is a feed-in tariff
    pub fn feed_in_tariff_rate(&self) -> Option<f64> {
        match self.pv_compensation {
            Some(PvCompensation::FeedInTariff { rate }) => Some(rate),
            _ => None,
        }
    }
}
