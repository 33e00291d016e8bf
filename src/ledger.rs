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
Consumos mensuales por combustible
==================================

Define el tipo FuelLedger (lista de series mensuales + metadatos) y sus traits.

The ledger holds the monthly consumption of every fuel, and the on-site electricity
production, as computed by the building simulation. Besides the data lines, metadata
lines describe the simulation period and the PV systems of the building:

```text
#META SIM_YEAR: 2002
#META SIM_PERIOD: 1/1-12/31
#META PV_NAMEPLATE_KW: 1.0
ELECTRICITY, CONSUMPTION, kWh, 560.50, 480.00, 450.00, 380.00, 350.00, 430.00, 560.00, 540.00, 400.00, 330.00, 340.00, 421.00
ELECTRICITY, PRODUCTION, kWh, 80.00, 95.00, 125.00, 140.00, 155.00, 165.00, 160.00, 150.00, 130.00, 110.00, 85.00, 80.00
NATURALGAS, CONSUMPTION, therm, 28.00, 24.00, 18.00, 10.00, 5.00, 3.00, 2.00, 2.00, 3.00, 8.00, 15.00, 22.00
```
*/

use std::fmt;
use std::str;

use serde::{Deserialize, Serialize};

use crate::{
    error::{BillError, Result},
    types::{Flow, FuelStream, FuelType, Meta, MetaVec, SimulationPeriod, DEFAULT_CALENDAR_YEAR},
    vecops::veclistsum,
};

/// Calendar year metadata key
pub const META_SIM_YEAR: &str = "SIM_YEAR";
/// Simulation period (`M/D-M/D`) metadata key
pub const META_SIM_PERIOD: &str = "SIM_PERIOD";
/// PV systems nameplate capacity list [kW] metadata key
pub const META_PV_NAMEPLATE_KW: &str = "PV_NAMEPLATE_KW";
/// Non ideal distribution system efficiency metadata key
pub const META_NONIDEAL_DSE: &str = "NONIDEAL_DSE";

/// Datos del edificio relevantes para la facturación
///
/// Building data used by the bill calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Nameplate capacity of each PV system [kW]
    pub pv_nameplate_kw: Vec<f64>,
    /// Non ideal distribution system efficiency is modelled
    pub nonideal_dse: bool,
}

impl Building {
    /// Does the building have PV systems?
    pub fn has_pv(&self) -> bool {
        !self.pv_nameplate_kw.is_empty()
    }
}

/// Lista de series mensuales con sus metadatos
///
/// List of monthly fuel streams bundled with its metadata
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelLedger {
    /// Metadata
    pub meta: Vec<Meta>,
    /// Fuel streams
    pub streams: Vec<FuelStream>,
}

impl MetaVec for FuelLedger {
    fn get_metavec(&self) -> &Vec<Meta> {
        &self.meta
    }
    fn get_mut_metavec(&mut self) -> &mut Vec<Meta> {
        &mut self.meta
    }
}

impl fmt::Display for FuelLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .meta
            .iter()
            .map(|v| format!("{}", v))
            .chain(self.streams.iter().map(|v| format!("{}", v)))
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", lines)
    }
}

impl str::FromStr for FuelLedger {
    type Err = BillError;

    fn from_str(s: &str) -> Result<FuelLedger> {
        let s_nobom = s.trim_start_matches('\u{feff}');
        let lines: Vec<&str> = s_nobom.lines().map(str::trim).collect();
        let metalines = lines.iter().filter(|l| l.starts_with("#META"));
        let datalines = lines
            .iter()
            .filter(|l| !(l.starts_with('#') || l.starts_with("fuel,") || l.is_empty()));
        let meta = metalines
            .map(|e| e.parse())
            .collect::<Result<Vec<Meta>>>()?;
        let streams = datalines
            .map(|e| e.parse())
            .collect::<Result<Vec<FuelStream>>>()?;
        Ok(FuelLedger { meta, streams })
    }
}

impl FuelLedger {
    /// Agrupa las series de igual combustible y sentido
    ///
    /// Merge streams with the same fuel and flow into a single stream, so that every
    /// fuel has at most one consumption stream (and electricity one production stream).
    /// Stream order follows the first appearance of each (fuel, flow) pair.
    pub fn normalize(mut self) -> Self {
        let mut merged: Vec<FuelStream> = Vec::new();
        for stream in self.streams.drain(..) {
            match merged
                .iter_mut()
                .find(|m| m.fuel == stream.fuel && m.flow == stream.flow)
            {
                Some(m) => {
                    m.values = veclistsum(&[m.values.as_slice(), stream.values.as_slice()]);
                    if !stream.comment.is_empty() {
                        m.comment = if m.comment.is_empty() {
                            stream.comment
                        } else {
                            format!("{}; {}", m.comment, stream.comment)
                        };
                    }
                }
                None => merged.push(stream),
            }
        }
        self.streams = merged;
        self
    }

    /// Consumption stream for a fuel
    pub fn consumption(&self, fuel: FuelType) -> Option<&FuelStream> {
        self.streams
            .iter()
            .find(|s| s.fuel == fuel && s.flow == Flow::Consumption)
    }

    /// Electricity production stream
    pub fn production(&self) -> Option<&FuelStream> {
        self.streams
            .iter()
            .find(|s| s.fuel == FuelType::Electricity && s.is_production())
    }

    /// Annual consumption of a fuel (all consumption streams)
    pub fn annual_consumption(&self, fuel: FuelType) -> f64 {
        self.streams
            .iter()
            .filter(|s| s.fuel == fuel && s.flow == Flow::Consumption)
            .map(FuelStream::annual)
            .sum()
    }

    /// Is there any on-site electricity production?
    pub fn has_production(&self) -> bool {
        self.streams
            .iter()
            .any(|s| s.is_production() && s.annual() > 0.0)
    }

    /// Simulation period defined in metadata
    ///
    /// Missing keys default to the full 2007 calendar year.
    ///
    /// # Errors
    ///
    /// * Wrong calendar year or period format
    pub fn period(&self) -> Result<SimulationPeriod> {
        let year = match self.get_meta(META_SIM_YEAR) {
            Some(year) => year.trim().parse::<i32>().map_err(|_| BillError::Parse {
                from: year.clone(),
                into: "Calendar year".into(),
                desc: "expected an integer year",
            })?,
            None => DEFAULT_CALENDAR_YEAR,
        };
        match self.get_meta(META_SIM_PERIOD) {
            Some(period) => SimulationPeriod::parse_in_year(&period, year),
            None => Ok(SimulationPeriod::full_year(year)),
        }
    }

    /// Building data defined in metadata
    ///
    /// # Errors
    ///
    /// * PV nameplate capacity list with non numeric values
    pub fn building(&self) -> Result<Building> {
        let pv_nameplate_kw = self
            .get_meta_f64_list(META_PV_NAMEPLATE_KW)
            .unwrap_or_else(|| Ok(vec![]))?;
        let nonideal_dse = self.get_meta_bool(META_NONIDEAL_DSE).unwrap_or(false);
        Ok(Building {
            pv_nameplate_kw,
            nonideal_dse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TLEDGER1: &str = "#META SIM_YEAR: 2002
#META PV_NAMEPLATE_KW: 1.0, 2.0
ELECTRICITY, CONSUMPTION, kWh, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00, 10.00 # Lighting
ELECTRICITY, PRODUCTION, kWh, 1.00, 2.00, 3.00, 4.00, 5.00, 6.00, 7.00, 8.00, 9.00, 10.00, 11.00, 12.00
NATURALGAS, CONSUMPTION, therm, 5.00, 5.00, 5.00, 5.00, 0.00, 0.00, 0.00, 0.00, 0.00, 5.00, 5.00, 5.00
ELECTRICITY, CONSUMPTION, kWh, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00, 1.00 # Fans";

    const TLEDGERRES1: &str = "#META SIM_YEAR: 2002
#META PV_NAMEPLATE_KW: 1.0, 2.0
ELECTRICITY, CONSUMPTION, kWh, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00, 11.00 # Lighting; Fans
ELECTRICITY, PRODUCTION, kWh, 1.00, 2.00, 3.00, 4.00, 5.00, 6.00, 7.00, 8.00, 9.00, 10.00, 11.00, 12.00
NATURALGAS, CONSUMPTION, therm, 5.00, 5.00, 5.00, 5.00, 0.00, 0.00, 0.00, 0.00, 0.00, 5.00, 5.00, 5.00";

    #[test]
    fn tledger_parse() {
        let ledger = TLEDGER1.parse::<FuelLedger>().unwrap();
        // roundtrip building from/to string
        assert_eq!(ledger.to_string(), TLEDGER1);
        assert_eq!(ledger.annual_consumption(FuelType::Electricity), 132.0);
        assert!(ledger.has_production());
        assert_eq!(ledger.annual_consumption(FuelType::Propane), 0.0);
    }

    #[test]
    fn tledger_normalize() {
        let ledger = TLEDGER1.parse::<FuelLedger>().unwrap().normalize();
        assert_eq!(ledger.to_string(), TLEDGERRES1);
        assert_eq!(ledger.consumption(FuelType::Electricity).unwrap().annual(), 132.0);
        assert_eq!(ledger.production().unwrap().annual(), 78.0);
        assert!(ledger.consumption(FuelType::Coal).is_none());
    }

    #[test]
    fn tledger_meta() {
        let mut ledger = TLEDGER1.parse::<FuelLedger>().unwrap();
        assert_eq!(ledger.period().unwrap(), SimulationPeriod::full_year(2002));
        assert_eq!(
            ledger.building().unwrap(),
            Building {
                pv_nameplate_kw: vec![1.0, 2.0],
                nonideal_dse: false
            }
        );
        ledger.set_meta(META_SIM_PERIOD, "2/10-4/10");
        ledger.set_meta(META_NONIDEAL_DSE, "true");
        assert_eq!(
            ledger.period().unwrap(),
            SimulationPeriod::new(2002, (2, 10), (4, 10)).unwrap()
        );
        assert!(ledger.building().unwrap().nonideal_dse);
        ledger.set_meta(META_SIM_YEAR, "dos mil");
        assert!(ledger.period().is_err());
    }

    #[test]
    fn tledger_bom_and_header() {
        let text = "\u{feff}fuel, flow, unit, values
# Vivienda de prueba
COAL, CONSUMPTION, MBtu, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1
";
        let ledger = text.parse::<FuelLedger>().unwrap();
        assert_eq!(ledger.streams.len(), 1);
        assert!(ledger.meta.is_empty());
        assert_eq!(ledger.building().unwrap(), Building::default());
    }
}
