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

use std::fs::read_to_string;

use pretty_assertions::assert_eq;
use utilitybills::*;

const TOL: f64 = 0.01;

fn get_ledger(path: &str) -> FuelLedger {
    read_to_string(path)
        .unwrap()
        .parse::<FuelLedger>()
        .unwrap()
        .normalize()
}

fn get_scenarios(path: &str) -> Vec<BillScenario> {
    BillScenario::list_from_json(&read_to_string(path).unwrap()).unwrap()
}

fn get_bills(ledger_path: &str, scenarios_path: &str) -> Vec<ScenarioBills> {
    let ledger = get_ledger(ledger_path);
    let period = ledger.period().unwrap();
    compute_all(&ledger, &period, &get_scenarios(scenarios_path))
        .into_iter()
        .map(|outcome| outcome.unwrap().bills().cloned().unwrap())
        .collect()
}

/// Rounded amount of the bill line with the given key
fn amount(bills: &ScenarioBills, key: &str) -> f64 {
    bill_lines(bills)
        .iter()
        .find(|l| l.key() == key)
        .map(|l| l.amount)
        .unwrap_or_else(|| panic!("Bill line not found: {}", key))
}

fn has_line(bills: &ScenarioBills, key: &str) -> bool {
    bill_lines(bills).iter().any(|l| l.key() == key)
}

fn approx_eq(found: f64, expected: f64, tol: f64) -> bool {
    let ok = (found - expected).abs() < tol;
    if !ok {
        eprintln!("found: {}, expected: {}", found, expected);
    }
    ok
}

#[test]
fn denver_no_pv() {
    let bills = &get_bills("test_data/denver_base.csv", "test_data/scenarios.json")[0];
    assert!(approx_eq(amount(bills, "Bills: Electricity: Fixed (USD)"), 96.0, TOL));
    assert!(approx_eq(amount(bills, "Bills: Electricity: Marginal (USD)"), 628.98, TOL));
    assert!(approx_eq(amount(bills, "Bills: Electricity: Total (USD)"), 725.0, 1.0));
    assert!(approx_eq(amount(bills, "Bills: Natural Gas: Total (USD)"), 250.0, 1.0));
    assert!(approx_eq(amount(bills, "Bills: Fuel Oil: Total (USD)"), 462.0, 1.0));
    assert!(approx_eq(amount(bills, "Bills: Propane: Total (USD)"), 76.0, 1.0));
    assert!(approx_eq(amount(bills, "Bills: Natural Gas: Total (USD)"), 250.88, TOL));
    assert!(approx_eq(amount(bills, "Bills: Propane: Total (USD)"), 76.12, TOL));
    assert!(approx_eq(amount(bills, "Bills: Total (USD)"), 1514.0, 1.0));
    // No production credit, no fixed charges for fuel oil, no unused fuels
    assert!(!has_line(bills, "Bills: Electricity: PV Credit (USD)"));
    assert!(!has_line(bills, "Bills: Fuel Oil: Fixed (USD)"));
    assert!(bills.fuel(FuelType::Coal).is_none());
}

#[test]
fn denver_fixed_charge_once_per_fuel() {
    // Two electricity consumption streams in the file
    let text = read_to_string("test_data/denver_base.csv").unwrap();
    let ledger = text.parse::<FuelLedger>().unwrap();
    assert_eq!(
        ledger
            .streams
            .iter()
            .filter(|s| s.fuel == FuelType::Electricity)
            .count(),
        2
    );
    let scenarios = get_scenarios("test_data/scenarios.json");
    let outcome = compute_bills(&ledger, &SimulationPeriod::default(), &scenarios[0]).unwrap();
    let elec = outcome.bills().unwrap().fuel(FuelType::Electricity).unwrap();
    assert!(approx_eq(elec.fixed_charge, 96.0, TOL));
    assert!(approx_eq(elec.total, 724.98, TOL));
}

#[test]
fn denver_pv_1kw() {
    let bills = &get_bills("test_data/denver_pv1kw.csv", "test_data/scenarios.json")[0];
    assert!(approx_eq(amount(bills, "Bills: Electricity: PV Credit (USD)"), -177.0, TOL));
    assert!(approx_eq(amount(bills, "Bills: Electricity: Total (USD)"), 548.0, 1.0));
    assert!(approx_eq(amount(bills, "Bills: Total (USD)"), 1337.0, 1.0));
}

#[test]
fn denver_pv_10kw() {
    let bills = &get_bills("test_data/denver_pv10kw.csv", "test_data/scenarios.json")[0];
    let elec = bills.fuel(FuelType::Electricity).unwrap();
    // Annual excess paid at a user rate of 0.0304 $/kWh. Paying it at the 0.12 $/kWh
    // marginal rate would bring the scenario total down to about -256 $.
    // Credit capped to the energy charge plus the annual excess at the sellback rate
    assert!(approx_eq(
        elec.production_credit,
        -(628.98 + (14750.0 - 5241.5) * 0.0304),
        TOL
    ));
    assert!(approx_eq(amount(bills, "Bills: Electricity: Total (USD)"), -193.0, 1.0));
    assert!(approx_eq(amount(bills, "Bills: Total (USD)"), 596.0, 1.0));
    // Monthly totals add up to the annual total
    let monthly: f64 = elec.monthly_total().iter().sum();
    assert!(approx_eq(monthly, elec.total, 1e-6));
}

#[test]
fn grid_fee_additivity() {
    let base = &get_bills("test_data/denver_pv1kw.csv", "test_data/scenarios.json")[0];
    let fee = &get_bills("test_data/denver_pv1kw.csv", "test_data/scenarios_gridfee.json")[0];
    let base_elec = base.fuel(FuelType::Electricity).unwrap();
    let fee_elec = fee.fuel(FuelType::Electricity).unwrap();
    assert!(approx_eq(fee_elec.fixed_charge - base_elec.fixed_charge, 30.0, 1e-9));
    assert!(approx_eq(fee_elec.total - base_elec.total, 30.0, 1e-9));
    assert!(approx_eq(fee.total - base.total, 30.0, 1e-9));
    assert!(approx_eq(amount(fee, "Grid fee: Electricity: Fixed (USD)"), 126.0, TOL));

    // No fee without PV
    let nopv = &get_bills("test_data/denver_base.csv", "test_data/scenarios_gridfee.json")[0];
    assert!(approx_eq(amount(nopv, "Grid fee: Electricity: Fixed (USD)"), 96.0, TOL));
}

#[test]
fn grid_fee_from_production_without_nameplate() {
    let ledger = "ELECTRICITY, CONSUMPTION, kWh, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100
ELECTRICITY, PRODUCTION, kWh, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10"
        .parse::<FuelLedger>()
        .unwrap();
    assert!(!ledger.building().unwrap().has_pv());
    let scenarios = BillScenario::list_from_json(
        r#"[{
            "name": "Fee",
            "electricity": { "fixed_charge": 8.0, "marginal_rate": 0.12, "grid_fee": { "monthly": 5.0 } }
        }]"#,
    )
    .unwrap();
    let outcome = compute_bills(&ledger, &SimulationPeriod::default(), &scenarios[0]).unwrap();
    let elec = outcome.bills().unwrap().fuel(FuelType::Electricity).unwrap();
    assert!(approx_eq(elec.fixed_charge, 12.0 * (8.0 + 5.0), 1e-9));
}

#[test]
fn feed_in_tariff_scaling() {
    let bills = get_bills("test_data/denver_pv1kw.csv", "test_data/scenarios_fit.json");
    assert_eq!(bills.len(), 2);
    let fit5 = bills[0].fuel(FuelType::Electricity).unwrap();
    let fit10 = bills[1].fuel(FuelType::Electricity).unwrap();
    assert!(approx_eq(fit5.production_credit, -73.75, 1e-9));
    assert!(approx_eq(fit10.production_credit, 2.0 * fit5.production_credit, 1e-9));
    let delta = fit10.production_credit - fit5.production_credit;
    assert!(approx_eq(fit10.total - fit5.total, delta, 1e-9));
    assert!(approx_eq(bills[1].total - bills[0].total, delta, 1e-9));
}

#[test]
fn production_credit_never_positive() {
    for ledger in &[
        "test_data/denver_base.csv",
        "test_data/denver_pv1kw.csv",
        "test_data/denver_pv10kw.csv",
    ] {
        for scenarios in &[
            "test_data/scenarios.json",
            "test_data/scenarios_gridfee.json",
            "test_data/scenarios_fit.json",
        ] {
            for bills in get_bills(ledger, scenarios) {
                assert!(bills.bills().all(|b| b.production_credit <= 0.0));
            }
        }
    }
}

#[test]
fn idempotence() {
    let ledger = get_ledger("test_data/denver_pv10kw.csv");
    let scenarios = get_scenarios("test_data/scenarios.json");
    let period = ledger.period().unwrap();
    let first = compute_bills(&ledger, &period, &scenarios[0]).unwrap();
    let second = compute_bills(&ledger, &period, &scenarios[0]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_plain(), second.to_plain());
}

#[test]
fn partial_period_fixed_charges() {
    let ledger = get_ledger("test_data/denver_base.csv");
    let scenarios = get_scenarios("test_data/scenarios.json");
    let period = SimulationPeriod::new(2002, (2, 10), (4, 10)).unwrap();
    let outcome = compute_bills(&ledger, &period, &scenarios[0]).unwrap();
    let bills = outcome.bills().unwrap();
    let expected = 8.0 * (19.0 / 28.0 + 1.0 + 10.0 / 30.0);
    for fuel in &[FuelType::Electricity, FuelType::NaturalGas] {
        let bill = bills.fuel(*fuel).unwrap();
        assert!(approx_eq(bill.fixed_charge, expected, 1e-9));
        assert_eq!(bill.monthly_fixed_charge[0], 0.0);
        assert_eq!(bill.monthly_fixed_charge[2], 8.0);
    }
    let months: Vec<u32> = monthly_lines(bills)
        .iter()
        .filter(|l| l.fuel == FuelType::NaturalGas)
        .map(|l| l.month)
        .collect();
    assert_eq!(months, vec![2, 3, 4]);
}

#[test]
fn partial_period_with_pv_is_skipped() {
    let ledger = get_ledger("test_data/denver_pv1kw.csv");
    let scenarios = get_scenarios("test_data/scenarios.json");
    let period = SimulationPeriod::new(2007, (1, 1), (6, 30)).unwrap();
    let outcome = compute_bills(&ledger, &period, &scenarios[0]).unwrap();
    assert_eq!(outcome.bills(), None);
    assert_eq!(
        outcome.warnings(),
        &["A full annual simulation is required for calculating utility bills for homes with PV."
            .to_string()]
    );
}

#[test]
fn scenarios_are_independent() {
    let ledger = get_ledger("test_data/denver_base.csv");
    let scenarios = get_scenarios("test_data/scenarios_mixed.json");
    let outcomes = compute_all(&ledger, &ledger.period().unwrap(), &scenarios);
    assert_eq!(outcomes.len(), 3);

    match &outcomes[0] {
        Ok(ScenarioOutcome::Skipped { scenario, warnings }) => {
            assert_eq!(scenario, "No propane");
            assert_eq!(
                warnings,
                &vec!["Could not find a marginal Propane rate.".to_string()]
            );
        }
        other => panic!("Unexpected outcome: {:?}", other),
    }
    match &outcomes[1] {
        Err(error::BillError::MissingTariffFile { scenario }) => assert_eq!(scenario, "Detailed"),
        other => panic!("Unexpected outcome: {:?}", other),
    }
    let bills = outcomes[2].as_ref().unwrap().bills().unwrap();
    assert!(approx_eq(amount(bills, "Bills: Total (USD)"), 1513.98, TOL));
}

#[test]
fn bill_lines_json() {
    let bills = get_bills("test_data/denver_pv1kw.csv", "test_data/scenarios.json");
    let lines = bill_lines(&bills[0]);
    let json = serde_json::to_string(&lines).unwrap();
    assert!(json.contains(r#""component":"PV Credit""#));
    assert!(json.contains(r#""fuel":"Electricity""#));
    let back: Vec<BillLine> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        back.iter().map(BillLine::key).collect::<Vec<_>>(),
        lines.iter().map(BillLine::key).collect::<Vec<_>>()
    );
}
