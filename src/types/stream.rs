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
Series mensuales de consumo y producción
========================================

A fuel stream holds the monthly consumed (or, for electricity, produced) energy of a
fuel, expressed in the canonical unit of that fuel.
*/

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};

use super::FuelType;
use crate::error::BillError;

/// Number of monthly values of a fuel stream
pub const MONTHS: usize = 12;

/// Sentido del flujo de energía
///
/// Energy flow direction
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    /// Energy used by the building
    Consumption,
    /// Energy produced on site (PV)
    Production,
}

impl str::FromStr for Flow {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Flow, Self::Err> {
        match s {
            "CONSUMPTION" => Ok(Flow::Consumption),
            "PRODUCTION" => Ok(Flow::Production),
            _ => Err(BillError::Parse {
                from: s.into(),
                into: "Flow".into(),
                desc: "expected CONSUMPTION or PRODUCTION",
            }),
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Consumption => write!(f, "CONSUMPTION"),
            Flow::Production => write!(f, "PRODUCTION"),
        }
    }
}

/// Serie mensual de un combustible
///
/// Monthly fuel stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStream {
    /// Fuel type
    pub fuel: FuelType,
    /// Consumed or produced energy
    pub flow: Flow,
    /// Physical unit of the values
    pub unit: String,
    /// Energy value for each calendar month (January first)
    pub values: Vec<f64>,
    /// Descriptive comment string
    pub comment: String,
}

impl FuelStream {
    /// Stream constructor using the canonical unit of the fuel
    ///
    /// # Errors
    ///
    /// * Number of values other than 12
    /// * Production stream for a fuel other than electricity
    pub fn new(fuel: FuelType, flow: Flow, values: Vec<f64>) -> Result<Self, BillError> {
        let stream = Self {
            fuel,
            flow,
            unit: fuel.unit().to_string(),
            values,
            comment: String::new(),
        };
        stream.check()?;
        Ok(stream)
    }

    /// Is this an on-site production stream?
    pub fn is_production(&self) -> bool {
        self.flow == Flow::Production
    }

    /// Annual energy
    pub fn annual(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Energy for calendar month `month` (1 = January)
    pub fn month(&self, month: u32) -> f64 {
        (month as usize)
            .checked_sub(1)
            .and_then(|idx| self.values.get(idx))
            .copied()
            .unwrap_or(0.0)
    }

    fn check(&self) -> Result<(), BillError> {
        if self.values.len() != MONTHS {
            return Err(BillError::MonthCount {
                fuel: self.fuel,
                found: self.values.len(),
            });
        }
        if self.unit != self.fuel.unit() {
            return Err(BillError::UnitMismatch {
                fuel: self.fuel,
                found: self.unit.clone(),
                expected: self.fuel.unit(),
            });
        }
        if self.is_production() && self.fuel != FuelType::Electricity {
            return Err(BillError::Parse {
                from: format!("{}, {}", self.fuel.code(), self.flow),
                into: "FuelStream".into(),
                desc: "only electricity can be produced on site",
            });
        }
        Ok(())
    }
}

impl fmt::Display for FuelStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valuelist = self
            .values
            .iter()
            .map(|v| format!("{:.2}", v))
            .collect::<Vec<_>>()
            .join(", ");
        let comment = if !self.comment.is_empty() {
            format!(" # {}", self.comment)
        } else {
            "".to_owned()
        };
        write!(
            f,
            "{}, {}, {}, {}{}",
            self.fuel.code(),
            self.flow,
            self.unit,
            valuelist,
            comment
        )
    }
}

impl str::FromStr for FuelStream {
    type Err = BillError;

    fn from_str(s: &str) -> Result<FuelStream, Self::Err> {
        let items: Vec<&str> = s.trim().splitn(2, '#').map(str::trim).collect();
        let comment = items.get(1).unwrap_or(&"").to_string();
        let items: Vec<&str> = items[0].split(',').map(str::trim).collect();
        if items.len() < 4 {
            return Err(BillError::Parse {
                from: s.into(),
                into: "FuelStream".into(),
                desc: "expected FUEL, FLOW, unit and monthly values",
            });
        };
        let fuel: FuelType = items[0].parse()?;
        let flow: Flow = items[1].parse()?;
        let unit = items[2].to_string();
        let values = items[3..]
            .iter()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()?;
        let stream = FuelStream {
            fuel,
            flow,
            unit,
            values,
            comment,
        };
        stream.check()?;
        Ok(stream)
    }
}
