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
Prorrateo mensual
=================

Fraction of each calendar month covered by the simulation period. Monthly fixed
charges are billed only for that fraction.
*/

use crate::types::{SimulationPeriod, MONTHS};

/// Fracción del mes `month` (1-12) incluida en el periodo de simulación
///
/// Fraction [0, 1] of calendar month `month` inside the simulation period.
pub fn prorate(period: &SimulationPeriod, month: u32) -> f64 {
    if !period.contains_month(month) {
        return 0.0;
    }
    let days = f64::from(period.days_in_month(month));
    if period.begin_month == period.end_month {
        f64::from(period.end_day - period.begin_day + 1) / days
    } else if month == period.begin_month {
        (days - f64::from(period.begin_day) + 1.0) / days
    } else if month == period.end_month {
        f64::from(period.end_day) / days
    } else {
        1.0
    }
}

/// Fracciones de todos los meses del año, de enero a diciembre
pub fn monthly_fractions(period: &SimulationPeriod) -> [f64; MONTHS] {
    let mut fractions = [0.0; MONTHS];
    for (idx, fraction) in fractions.iter_mut().enumerate() {
        *fraction = prorate(period, idx as u32 + 1);
    }
    fractions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn prorate_single_month() {
        let period = SimulationPeriod::new(2002, (3, 5), (3, 20)).unwrap();
        assert_eq!(prorate(&period, 2), 0.0);
        assert!(approx(prorate(&period, 3), 16.0 / 31.0));
        assert_eq!(prorate(&period, 4), 0.0);
    }

    #[test]
    fn prorate_several_months() {
        let period = SimulationPeriod::new(2002, (2, 10), (4, 10)).unwrap();
        assert_eq!(prorate(&period, 1), 0.0);
        assert!(approx(prorate(&period, 2), 19.0 / 28.0));
        assert_eq!(prorate(&period, 3), 1.0);
        assert!(approx(prorate(&period, 4), 10.0 / 30.0));
        assert_eq!(prorate(&period, 5), 0.0);
    }

    #[test]
    fn prorate_leap_year() {
        let period = SimulationPeriod::new(2004, (2, 10), (4, 10)).unwrap();
        assert!(approx(prorate(&period, 2), 20.0 / 29.0));
    }

    #[test]
    fn prorate_single_day() {
        let period = SimulationPeriod::new(2002, (7, 4), (7, 4)).unwrap();
        let fractions = monthly_fractions(&period);
        assert_eq!(fractions.iter().filter(|f| **f > 0.0).count(), 1);
        assert!(approx(fractions[6], 1.0 / 31.0));
    }

    #[test]
    fn prorate_full_months() {
        let period = SimulationPeriod::new(2002, (6, 1), (6, 30)).unwrap();
        assert_eq!(prorate(&period, 6), 1.0);
        let period = SimulationPeriod::new(2002, (2, 1), (5, 31)).unwrap();
        assert_eq!(prorate(&period, 2), 1.0);
        assert_eq!(prorate(&period, 5), 1.0);
        let fractions = monthly_fractions(&SimulationPeriod::full_year(2004));
        assert_eq!(fractions, [1.0; MONTHS]);
        assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));
    }
}
