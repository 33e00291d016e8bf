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
UtilityBills
============

This crate provides a library and binary that **computes the annual utility bills of a
building** from the monthly fuel use given by an energy simulation and a set of
named utility rate scenarios.

For each scenario and fuel (electricity, natural gas, fuel oil, propane, cord wood,
wood pellets and coal) it computes:

- fixed charges, prorated to the fraction of each month covered by the simulation
- energy charges, at a flat marginal rate
- PV production credits (electricity), through net metering with an annual true-up
  or through a feed-in tariff
- annual totals per fuel and per scenario

It also holds the following assumptions:

- net metering is settled on monthly values
- detailed (time of use, tiered) tariffs are billed with the simple algorithm
- scenarios that can't be billed (partial simulation periods for homes with PV,
  missing rates...) are reported with warnings instead of failing

Este *crate* proporciona una biblioteca y un programa que **calcula las facturas
energéticas anuales de un edificio** a partir de los consumos mensuales por combustible
obtenidos en la simulación y de un conjunto de escenarios de tarifas.

# Ejemplo

```rust
use std::fs::read_to_string;
use utilitybills::*;

// lectura de un archivo de consumos mensuales por combustible
let ledger = read_to_string("test_data/denver_base.csv")
    .unwrap()
    .parse::<FuelLedger>()
    .unwrap();

// escenarios de tarifas
let scenarios = BillScenario::list_from_json(
    &read_to_string("test_data/scenarios.json").unwrap()
).unwrap();

// periodo de simulación definido en el archivo de consumos
let period = ledger.period().unwrap();

// cálculo de las facturas y visualización compacta
for outcome in compute_all(&ledger, &period, &scenarios) {
    println!("{}", outcome.unwrap().to_plain());
}
```

*/

#![deny(missing_docs)]

mod bills;
mod ledger;
mod prorate;
mod rates;
mod report;
mod vecops;

pub mod error;
pub mod types;

pub use bills::*;
pub use ledger::*;
pub use prorate::*;
pub use rates::*;
pub use report::*;
pub use types::*;

/// Número de versión de la librería
///
/// Version number
pub static VERSION: &str = env!("CARGO_PKG_VERSION");
