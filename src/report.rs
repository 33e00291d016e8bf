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
Informe de facturas
===================

Flat list of bill lines, as written to the output files:

```text
Bills: Total (USD), 1513.98
Bills: Electricity: Fixed (USD), 96.00
Bills: Electricity: Marginal (USD), 628.98
Bills: Electricity: Total (USD), 724.98
```

Values are rounded to 2 decimals. Zero lines are omitted, except the scenario grand
total.
*/

use std::io;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    bills::{FuelBill, ScenarioBills, ScenarioOutcome},
    types::{FuelType, MONTH_NAMES},
};

/// Concepto de una línea de factura
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum BillComponent {
    /// Fixed charges
    #[strum(to_string = "Fixed")]
    Fixed,
    /// Energy (marginal rate) charges
    #[strum(to_string = "Marginal")]
    Marginal,
    /// PV production credit
    #[strum(to_string = "PV Credit")]
    #[serde(rename = "PV Credit")]
    PvCredit,
    /// Total
    #[strum(to_string = "Total")]
    Total,
}

/// Línea de factura
///
/// Bill line of a scenario. Lines without fuel are scenario totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    /// Scenario name
    pub scenario: String,
    /// Fuel type (None for the scenario grand total)
    pub fuel: Option<FuelType>,
    /// Bill component
    pub component: BillComponent,
    /// Amount [USD]
    pub amount: f64,
}

impl BillLine {
    /// Output key of the line
    pub fn key(&self) -> String {
        match self.fuel {
            Some(fuel) => format!("{}: {}: {} (USD)", self.scenario, fuel, self.component),
            None => format!("{}: {} (USD)", self.scenario, self.component),
        }
    }
}

/// Línea mensual de factura
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyLine {
    /// Scenario name
    pub scenario: String,
    /// Fuel type
    pub fuel: FuelType,
    /// Calendar month (1-12)
    pub month: u32,
    /// Monthly total [USD]
    pub amount: f64,
}

impl MonthlyLine {
    /// Output key of the line
    pub fn key(&self) -> String {
        let month_name = (self.month as usize)
            .checked_sub(1)
            .and_then(|idx| MONTH_NAMES.get(idx))
            .copied()
            .unwrap_or("");
        format!("{}: {}: Total (USD) {}", self.scenario, self.fuel, month_name)
    }
}

/// Redondea a céntimos
pub fn round2(value: f64) -> f64 {
    // + 0.0 avoids -0.00 in the output
    (value * 100.0).round() / 100.0 + 0.0
}

fn fuel_lines(scenario: &str, bill: &FuelBill) -> Vec<BillLine> {
    [
        (BillComponent::Fixed, bill.fixed_charge),
        (BillComponent::Marginal, bill.energy_charge),
        (BillComponent::PvCredit, bill.production_credit),
        (BillComponent::Total, bill.total),
    ]
    .iter()
    .map(|(component, amount)| BillLine {
        scenario: scenario.to_string(),
        fuel: Some(bill.fuel),
        component: *component,
        amount: round2(*amount),
    })
    .filter(|line| line.amount != 0.0)
    .collect()
}

/// Líneas de factura de un escenario
///
/// The scenario grand total comes first, followed by the lines of each fuel.
pub fn bill_lines(bills: &ScenarioBills) -> Vec<BillLine> {
    let total = BillLine {
        scenario: bills.scenario.clone(),
        fuel: None,
        component: BillComponent::Total,
        amount: round2(bills.total),
    };
    std::iter::once(total)
        .chain(
            bills
                .bills()
                .flat_map(|bill| fuel_lines(&bills.scenario, bill)),
        )
        .collect()
}

/// Totales mensuales de cada combustible, para los meses simulados
pub fn monthly_lines(bills: &ScenarioBills) -> Vec<MonthlyLine> {
    bills
        .bills()
        .flat_map(|bill| {
            bill.monthly_total()
                .into_iter()
                .enumerate()
                .map(move |(idx, amount)| MonthlyLine {
                    scenario: bills.scenario.clone(),
                    fuel: bill.fuel,
                    month: idx as u32 + 1,
                    amount: round2(amount),
                })
        })
        .filter(|line| bills.period.contains_month(line.month))
        .collect()
}

/// Muestra en formato simple
///
/// Plain text format: one `key, value` line per bill line
pub trait AsPlain {
    /// Get in plain format
    fn to_plain(&self) -> String;
}

impl AsPlain for BillLine {
    fn to_plain(&self) -> String {
        format!("{}, {:.2}", self.key(), self.amount)
    }
}

impl AsPlain for MonthlyLine {
    fn to_plain(&self) -> String {
        format!("{}, {:.2}", self.key(), self.amount)
    }
}

impl AsPlain for ScenarioBills {
    fn to_plain(&self) -> String {
        bill_lines(self).iter().map(AsPlain::to_plain).join("\n")
    }
}

impl AsPlain for ScenarioOutcome {
    /// Skipped scenarios show their (unique) warnings
    fn to_plain(&self) -> String {
        match self {
            ScenarioOutcome::Billed(bills) => bills.to_plain(),
            ScenarioOutcome::Skipped { scenario, warnings } => warnings
                .iter()
                .unique()
                .map(|w| format!("# {}: {}", scenario, w))
                .join("\n"),
        }
    }
}

/// Líneas de factura de todos los escenarios calculados
pub fn all_bill_lines(outcomes: &[ScenarioOutcome]) -> Vec<BillLine> {
    outcomes
        .iter()
        .filter_map(ScenarioOutcome::bills)
        .flat_map(bill_lines)
        .collect()
}

/// Escribe las facturas en formato CSV
///
/// Writes a `key,amount` header and one record per bill line of the billed scenarios,
/// followed by their monthly lines when `monthly` is set. Skipped scenarios write
/// nothing.
pub fn write_csv<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    outcomes: &[ScenarioOutcome],
    monthly: bool,
) -> csv::Result<()> {
    wtr.write_record(&["key", "amount"])?;
    for bills in outcomes.iter().filter_map(ScenarioOutcome::bills) {
        for line in bill_lines(bills) {
            wtr.write_record(&[line.key(), format!("{:.2}", line.amount)])?;
        }
        if monthly {
            for line in monthly_lines(bills) {
                wtr.write_record(&[line.key(), format!("{:.2}", line.amount)])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
