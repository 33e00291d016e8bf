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
Cálculo de facturas
===================

Simple utility bill algorithm: fixed monthly charges prorated to the simulated
fraction of each month plus a flat marginal rate on consumption, with PV production
credited through net metering or a feed-in tariff.

A scenario is billed in three steps, each one a distinct type:

1. `AccumulatingBills`: every fuel stream is applied month by month. The electricity
   net balance (consumption - production) is tracked along the way.
2. `TruedUpBills`: annual net metering true-up for electricity, once all streams have
   been applied.
3. `ScenarioBills`: finalized bills, with production credits as negative amounts
   and annual totals.

Scenarios that can't be billed (partial periods with PV, missing rates...) are not
errors but produce a `ScenarioOutcome::Skipped` with the list of warnings.
*/

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    error::{BillError, Result},
    ledger::{Building, FuelLedger},
    prorate::monthly_fractions,
    rates::{resolve_rates, ResolvedRates},
    types::{
        BillScenario, FuelMap, FuelStream, FuelType, PvCompensation, RateRecord, SellbackType,
        SimulationPeriod, Tariff, MONTHS,
    },
    vecops::{veckmul, veclistsum, vecsum},
};

/// Warning for buildings with non ideal distribution system efficiency
pub const WARN_DSE: &str = "DSE is not currently supported when calculating utility bills.";
/// Warning for homes with PV and a partial simulation period
pub const WARN_PV_PERIOD: &str =
    "A full annual simulation is required for calculating utility bills for homes with PV.";
/// Warning for detailed tariffs and a partial simulation period
pub const WARN_DETAILED_PERIOD: &str =
    "A full annual simulation is required for calculating detailed utility bills.";
/// Warning for net metering with user-specified sellback and no sellback rate
pub const WARN_SELLBACK_RATE: &str = "Could not find a user-specified excess sellback rate.";

/// Acumulador de la factura de un combustible
///
/// Running annual and monthly charges of a fuel bill. Credits are accumulated as
/// positive amounts until the bill is finalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillAccumulator {
    /// Annual fixed charge [$]
    pub annual_fixed_charge: f64,
    /// Annual energy (marginal) charge [$]
    pub annual_energy_charge: f64,
    /// Annual production credit [$]
    pub annual_production_credit: f64,
    /// Monthly fixed charges [$]
    pub monthly_fixed_charge: [f64; MONTHS],
    /// Monthly energy charges [$]
    pub monthly_energy_charge: [f64; MONTHS],
    /// Monthly production credits [$]
    pub monthly_production_credit: [f64; MONTHS],
    fixed_applied: bool,
}

/// Aplica la tarifa simple a una serie mensual
///
/// Apply `rate` to the monthly values of `stream` and return the updated electricity
/// net balance [kWh]. Non electricity streams return `net_elec` unchanged.
///
/// Only the first consumption stream of a fuel carries the fixed charge.
pub fn apply_simple_rate(
    stream: &FuelStream,
    rate: &RateRecord,
    period: &SimulationPeriod,
    acc: &mut BillAccumulator,
    net_elec: f64,
) -> f64 {
    let is_elec = stream.fuel == FuelType::Electricity;
    let mut net_elec = net_elec;

    if !stream.is_production() {
        let apply_fixed = !acc.fixed_applied;
        acc.fixed_applied = true;
        let fractions = monthly_fractions(period);
        for (idx, month) in (1..=MONTHS as u32).enumerate() {
            let value = stream.month(month);
            if apply_fixed {
                let fixed = fractions[idx] * rate.fixed_monthly_charge;
                acc.annual_fixed_charge += fixed;
                acc.monthly_fixed_charge[idx] += fixed;
            }
            let energy = value * rate.flat_marginal_rate;
            acc.annual_energy_charge += energy;
            acc.monthly_energy_charge[idx] += energy;
            if is_elec {
                net_elec += value;
            }
        }
    } else {
        let credit_rate = rate
            .feed_in_tariff_rate()
            .unwrap_or(rate.flat_marginal_rate);
        for (idx, month) in (1..=MONTHS as u32).enumerate() {
            let value = stream.month(month);
            let credit = value * credit_rate;
            acc.annual_production_credit += credit;
            acc.monthly_production_credit[idx] += credit;
            net_elec -= value;
        }
    }
    net_elec
}

/// Factura anual y mensual de un combustible
///
/// Finalized bill of a fuel. Production credits are negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelBill {
    /// Fuel type
    pub fuel: FuelType,
    /// Annual fixed charge [$]
    pub fixed_charge: f64,
    /// Annual energy (marginal) charge [$]
    pub energy_charge: f64,
    /// Annual production credit [$] (<= 0)
    pub production_credit: f64,
    /// Annual total [$]
    pub total: f64,
    /// Monthly fixed charges [$]
    pub monthly_fixed_charge: [f64; MONTHS],
    /// Monthly energy charges [$]
    pub monthly_energy_charge: [f64; MONTHS],
    /// Monthly production credits [$]
    pub monthly_production_credit: [f64; MONTHS],
}

impl FuelBill {
    /// Monthly totals [$]
    pub fn monthly_total(&self) -> Vec<f64> {
        veclistsum(&[
            &self.monthly_fixed_charge[..],
            &self.monthly_energy_charge[..],
            &self.monthly_production_credit[..],
        ])
    }

    fn from_accumulator(fuel: FuelType, acc: BillAccumulator) -> Self {
        let sign = if acc.annual_production_credit >= 0.0 {
            -1.0
        } else {
            1.0
        };
        let production_credit = -acc.annual_production_credit.abs();
        let mut monthly_production_credit = [0.0; MONTHS];
        for (dst, src) in monthly_production_credit
            .iter_mut()
            .zip(veckmul(&acc.monthly_production_credit, sign))
        {
            *dst = src;
        }
        FuelBill {
            fuel,
            fixed_charge: acc.annual_fixed_charge,
            energy_charge: acc.annual_energy_charge,
            production_credit,
            total: acc.annual_fixed_charge + acc.annual_energy_charge + production_credit,
            monthly_fixed_charge: acc.monthly_fixed_charge,
            monthly_energy_charge: acc.monthly_energy_charge,
            monthly_production_credit,
        }
    }
}

/// Facturas en proceso de acumulación
///
/// Bills of a scenario while fuel streams are being applied
#[derive(Debug, Clone)]
pub struct AccumulatingBills {
    scenario: String,
    period: SimulationPeriod,
    bills: FuelMap<Option<BillAccumulator>>,
    net_elec: f64,
}

impl AccumulatingBills {
    /// Start the bills of `scenario` for the simulation `period`
    pub fn new(scenario: &str, period: &SimulationPeriod) -> Self {
        Self {
            scenario: scenario.to_string(),
            period: *period,
            bills: FuelMap::default(),
            net_elec: 0.0,
        }
    }

    /// Apply the rate of the stream fuel to the stream
    pub fn apply(&mut self, stream: &FuelStream, rate: &RateRecord) {
        let acc = self.bills[stream.fuel].get_or_insert_with(BillAccumulator::default);
        self.net_elec = apply_simple_rate(stream, rate, &self.period, acc, self.net_elec);
    }

    /// Electricity net balance so far [kWh]
    pub fn net_elec(&self) -> f64 {
        self.net_elec
    }

    /// Regularización anual del balance neto
    ///
    /// Annual true-up of the electricity bill for net metering with user-specified
    /// sellback: the production credit is capped to the energy charge and the annual
    /// net export is paid at the user sellback rate. The adjustment is booked in the
    /// last simulated month.
    ///
    /// Retail electricity cost sellback and feed-in tariffs need no adjustment.
    pub fn true_up(mut self, elec_rate: Option<&RateRecord>) -> TruedUpBills {
        let user_rate = match elec_rate.and_then(|r| r.pv_compensation) {
            Some(PvCompensation::NetMetering {
                sellback: SellbackType::UserSpecified,
                user_rate,
            }) => user_rate,
            _ => None,
        };
        let net_elec = self.net_elec;
        let last_idx = self.period.last_month() as usize - 1;
        if let (Some(user_rate), Some(acc)) = (user_rate, self.bills[FuelType::Electricity].as_mut())
        {
            let credit_before = acc.annual_production_credit;
            let mut credit = credit_before.min(acc.annual_energy_charge);
            if net_elec < 0.0 {
                credit += -net_elec * user_rate;
            }
            let delta = credit - credit_before;
            if delta != 0.0 {
                debug!(
                    "{}: net metering true-up, net balance {:.2} kWh, credit adjustment {:.2} $",
                    self.scenario, net_elec, delta
                );
            }
            acc.annual_production_credit = credit;
            acc.monthly_production_credit[last_idx] += delta;
        }
        TruedUpBills {
            scenario: self.scenario,
            period: self.period,
            bills: self.bills,
        }
    }
}

/// Facturas regularizadas, pendientes de cierre
///
/// Bills after the annual true-up
#[derive(Debug, Clone)]
pub struct TruedUpBills {
    scenario: String,
    period: SimulationPeriod,
    bills: FuelMap<Option<BillAccumulator>>,
}

impl TruedUpBills {
    /// Close the bills: production credits become negative amounts and totals are computed
    pub fn finalize(self) -> ScenarioBills {
        let mut fuels: FuelMap<Option<FuelBill>> = FuelMap::default();
        for (fuel, acc) in self.bills.iter() {
            if let Some(acc) = acc {
                fuels[fuel] = Some(FuelBill::from_accumulator(fuel, acc.clone()));
            }
        }
        let totals: Vec<f64> = fuels
            .iter()
            .filter_map(|(_, bill)| bill.as_ref().map(|b| b.total))
            .collect();
        ScenarioBills {
            scenario: self.scenario,
            period: self.period,
            total: vecsum(&totals),
            fuels,
        }
    }
}

/// Facturas de un escenario
///
/// Finalized bills of a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioBills {
    /// Scenario name
    pub scenario: String,
    /// Simulation period
    pub period: SimulationPeriod,
    /// Bill of each fuel used by the building
    pub fuels: FuelMap<Option<FuelBill>>,
    /// Grand total of the scenario [$]
    pub total: f64,
}

impl ScenarioBills {
    /// Bill of a fuel, if it is used by the building
    pub fn fuel(&self, fuel: FuelType) -> Option<&FuelBill> {
        self.fuels[fuel].as_ref()
    }

    /// Iterate over the bills of the fuels used by the building
    pub fn bills(&self) -> impl Iterator<Item = &FuelBill> {
        self.fuels.iter().filter_map(|(_, bill)| bill.as_ref())
    }
}

/// Resultado del cálculo de un escenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScenarioOutcome {
    /// Scenario billed
    Billed(ScenarioBills),
    /// Scenario not billed
    Skipped {
        /// Scenario name
        scenario: String,
        /// Reasons why the scenario could not be billed
        warnings: Vec<String>,
    },
}

impl ScenarioOutcome {
    /// Scenario name
    pub fn scenario(&self) -> &str {
        match self {
            ScenarioOutcome::Billed(bills) => &bills.scenario,
            ScenarioOutcome::Skipped { scenario, .. } => scenario,
        }
    }

    /// Bills, when the scenario could be billed
    pub fn bills(&self) -> Option<&ScenarioBills> {
        match self {
            ScenarioOutcome::Billed(bills) => Some(bills),
            ScenarioOutcome::Skipped { .. } => None,
        }
    }

    /// Warnings, when the scenario was skipped
    pub fn warnings(&self) -> &[String] {
        match self {
            ScenarioOutcome::Billed(_) => &[],
            ScenarioOutcome::Skipped { warnings, .. } => warnings,
        }
    }
}

/// Comprobaciones previas al cálculo de un escenario
///
/// Conditions that prevent billing `scenario`, as warnings. Missing rate warnings
/// are collected by the rate resolution.
///
/// # Errors
///
/// * Detailed tariff selected without a tariff file
pub fn check_scenario(
    ledger: &FuelLedger,
    period: &SimulationPeriod,
    building: &Building,
    scenario: &BillScenario,
) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let has_pv = building.has_pv() || ledger.has_production();

    if let Tariff::Detailed { tariff_file } = &scenario.electricity.tariff {
        match tariff_file {
            None => {
                return Err(BillError::MissingTariffFile {
                    scenario: scenario.name.clone(),
                })
            }
            Some(file) if period.is_full_year() => warn!(
                "{}: detailed tariff \"{}\" billed with the simple algorithm",
                scenario.name, file
            ),
            Some(_) => warnings.push(WARN_DETAILED_PERIOD.to_string()),
        }
    }
    if building.nonideal_dse {
        warnings.push(WARN_DSE.to_string());
    }
    if has_pv && !period.is_full_year() {
        warnings.push(WARN_PV_PERIOD.to_string());
    }
    if ledger.has_production() {
        if let PvCompensation::NetMetering {
            sellback: SellbackType::UserSpecified,
            user_rate: None,
        } = scenario.electricity.pv_compensation
        {
            warnings.push(WARN_SELLBACK_RATE.to_string());
        }
    }
    Ok(warnings)
}

/// Calcula las facturas de un escenario
///
/// Compute the bills of `scenario` for the fuel use in `ledger` during `period`.
///
/// # Errors
///
/// * Wrong building metadata in the ledger
/// * Detailed tariff selected without a tariff file
pub fn compute_bills(
    ledger: &FuelLedger,
    period: &SimulationPeriod,
    scenario: &BillScenario,
) -> Result<ScenarioOutcome> {
    let building = ledger.building()?;
    let mut warnings = check_scenario(ledger, period, &building, scenario)?;
    let ResolvedRates {
        rates,
        warnings: rate_warnings,
    } = resolve_rates(scenario, ledger, &building);
    warnings.extend(rate_warnings);

    if !warnings.is_empty() {
        for w in &warnings {
            warn!("{}: {}", scenario.name, w);
        }
        return Ok(ScenarioOutcome::Skipped {
            scenario: scenario.name.clone(),
            warnings,
        });
    }

    let mut bills = AccumulatingBills::new(&scenario.name, period);
    for stream in &ledger.streams {
        if let Some(rate) = &rates[stream.fuel] {
            debug!(
                "{}: applying {} {} stream ({:.2} {})",
                scenario.name,
                stream.fuel,
                stream.flow,
                stream.annual(),
                stream.unit
            );
            bills.apply(stream, rate);
        }
    }
    let bills = bills
        .true_up(rates[FuelType::Electricity].as_ref())
        .finalize();
    info!("{}: total {:.2} $", bills.scenario, bills.total);
    Ok(ScenarioOutcome::Billed(bills))
}

/// Calcula las facturas de todos los escenarios
///
/// Every scenario is computed independently of the others.
pub fn compute_all(
    ledger: &FuelLedger,
    period: &SimulationPeriod,
    scenarios: &[BillScenario],
) -> Vec<Result<ScenarioOutcome>> {
    scenarios
        .iter()
        .map(|scenario| compute_bills(ledger, period, scenario))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Flow;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn elec_rate(pv_compensation: PvCompensation) -> RateRecord {
        RateRecord {
            fuel: FuelType::Electricity,
            fixed_monthly_charge: 10.0,
            flat_marginal_rate: 0.1,
            pv_compensation: Some(pv_compensation),
        }
    }

    fn stream(fuel: FuelType, flow: Flow, value: f64) -> FuelStream {
        FuelStream::new(fuel, flow, vec![value; MONTHS]).unwrap()
    }

    #[test]
    fn apply_consumption() {
        let period = SimulationPeriod::full_year(2007);
        let rate = elec_rate(PvCompensation::default());
        let mut acc = BillAccumulator::default();
        let cons = stream(FuelType::Electricity, Flow::Consumption, 100.0);
        let net = apply_simple_rate(&cons, &rate, &period, &mut acc, 0.0);
        assert!(approx(net, 1200.0));
        assert!(approx(acc.annual_fixed_charge, 120.0));
        assert!(approx(acc.annual_energy_charge, 120.0));
        // Fixed charge is applied only once per fuel
        let net = apply_simple_rate(&cons, &rate, &period, &mut acc, net);
        assert!(approx(net, 2400.0));
        assert!(approx(acc.annual_fixed_charge, 120.0));
        assert!(approx(acc.annual_energy_charge, 240.0));
    }

    #[test]
    fn apply_non_electricity_keeps_balance() {
        let period = SimulationPeriod::full_year(2007);
        let rate = RateRecord {
            fuel: FuelType::Coal,
            fixed_monthly_charge: 0.0,
            flat_marginal_rate: 20.0,
            pv_compensation: None,
        };
        let mut acc = BillAccumulator::default();
        let cons = stream(FuelType::Coal, Flow::Consumption, 1.0);
        assert_eq!(apply_simple_rate(&cons, &rate, &period, &mut acc, -5.0), -5.0);
        assert!(approx(acc.annual_energy_charge, 240.0));
        assert_eq!(acc.annual_fixed_charge, 0.0);
    }

    #[test]
    fn apply_production_credit() {
        let period = SimulationPeriod::full_year(2007);
        let prod = stream(FuelType::Electricity, Flow::Production, 50.0);

        let mut acc = BillAccumulator::default();
        let net = apply_simple_rate(
            &prod,
            &elec_rate(PvCompensation::default()),
            &period,
            &mut acc,
            0.0,
        );
        assert!(approx(net, -600.0));
        assert!(approx(acc.annual_production_credit, 60.0));
        assert_eq!(acc.annual_fixed_charge, 0.0);

        let mut acc = BillAccumulator::default();
        apply_simple_rate(
            &prod,
            &elec_rate(PvCompensation::FeedInTariff { rate: 0.05 }),
            &period,
            &mut acc,
            0.0,
        );
        assert!(approx(acc.annual_production_credit, 30.0));
    }

    #[test]
    fn true_up_user_specified() {
        let period = SimulationPeriod::full_year(2007);
        let rate = elec_rate(PvCompensation::NetMetering {
            sellback: SellbackType::UserSpecified,
            user_rate: Some(0.02),
        });
        let mut bills = AccumulatingBills::new("Test", &period);
        bills.apply(&stream(FuelType::Electricity, Flow::Consumption, 100.0), &rate);
        bills.apply(&stream(FuelType::Electricity, Flow::Production, 150.0), &rate);
        assert!(approx(bills.net_elec(), -600.0));
        let bills = bills.true_up(Some(&rate)).finalize();
        let elec = bills.fuel(FuelType::Electricity).unwrap();
        // 180 capped to 120 plus 600 kWh at 0.02
        assert!(approx(elec.production_credit, -132.0));
        assert!(approx(elec.total, 120.0 + 120.0 - 132.0));
        assert!(approx(bills.total, elec.total));
        // Adjustment booked in December
        assert!(approx(elec.monthly_production_credit[11], -15.0 + 48.0));
        assert!(approx(vecsum(&elec.monthly_total()), elec.total));
    }

    #[test]
    fn true_up_retail_cost_no_adjustment() {
        let period = SimulationPeriod::full_year(2007);
        let rate = elec_rate(PvCompensation::NetMetering {
            sellback: SellbackType::RetailElectricityCost,
            user_rate: None,
        });
        let mut bills = AccumulatingBills::new("Test", &period);
        bills.apply(&stream(FuelType::Electricity, Flow::Consumption, 100.0), &rate);
        bills.apply(&stream(FuelType::Electricity, Flow::Production, 150.0), &rate);
        let bills = bills.true_up(Some(&rate)).finalize();
        let elec = bills.fuel(FuelType::Electricity).unwrap();
        assert!(approx(elec.production_credit, -180.0));
        assert!(approx(elec.total, 60.0));
        assert!(bills.fuel(FuelType::NaturalGas).is_none());
    }

    #[test]
    fn check_warnings() {
        let ledger: FuelLedger = "#META NONIDEAL_DSE: true
ELECTRICITY, CONSUMPTION, kWh, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1
ELECTRICITY, PRODUCTION, kWh, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1"
            .parse()
            .unwrap();
        let building = ledger.building().unwrap();
        let period = SimulationPeriod::new(2007, (1, 1), (6, 30)).unwrap();
        let mut scenario = BillScenario {
            name: "Test".into(),
            ..Default::default()
        };
        scenario.electricity.pv_compensation = PvCompensation::NetMetering {
            sellback: SellbackType::UserSpecified,
            user_rate: None,
        };
        let warnings = check_scenario(&ledger, &period, &building, &scenario).unwrap();
        assert_eq!(
            warnings,
            vec![
                WARN_DSE.to_string(),
                WARN_PV_PERIOD.to_string(),
                WARN_SELLBACK_RATE.to_string()
            ]
        );

        scenario.electricity.tariff = Tariff::Detailed { tariff_file: None };
        assert!(check_scenario(&ledger, &period, &building, &scenario).is_err());
        scenario.electricity.tariff = Tariff::Detailed {
            tariff_file: Some("tariff.json".into()),
        };
        let warnings = check_scenario(&ledger, &period, &building, &scenario).unwrap();
        assert_eq!(warnings[0], WARN_DETAILED_PERIOD);
    }
}
