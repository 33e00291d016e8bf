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
Errores
=======

Error type for the utility bill calculation.

Only malformed input and broken scenario contracts are errors. Expected data
conditions (missing rates, partial simulation periods with PV...) are reported as
warnings and make the affected scenario to be skipped (see `ScenarioOutcome`).
*/

use thiserror::Error;

use crate::types::FuelType;

/// Error de cálculo de facturas
///
/// Utility bill calculation error
#[derive(Debug, Error)]
pub enum BillError {
    /// Generic parsing error
    #[error("Could not parse {into} from \"{from}\" ({desc})")]
    Parse {
        /// Parsed text
        from: String,
        /// Target type name
        into: String,
        /// Error description
        desc: &'static str,
    },
    /// A fuel stream without exactly one value per calendar month
    #[error("Fuel stream for {fuel} has {found} monthly values, 12 expected")]
    MonthCount {
        /// Fuel type of the stream
        fuel: FuelType,
        /// Number of values found
        found: usize,
    },
    /// Stream unit different from the canonical unit of its fuel
    #[error("Unit \"{found}\" is not valid for {fuel} (expected \"{expected}\")")]
    UnitMismatch {
        /// Fuel type of the stream
        fuel: FuelType,
        /// Unit found
        found: String,
        /// Canonical unit for the fuel
        expected: &'static str,
    },
    /// Wrong simulation period definition
    #[error("Invalid simulation period: {0}")]
    Period(String),
    /// Detailed tariff selected without a tariff file
    #[error("Scenario \"{scenario}\": a detailed electricity tariff was selected but no tariff file was given")]
    MissingTariffFile {
        /// Bill scenario name
        scenario: String,
    },
    /// Bill scenario (de)serialization error
    #[error("Bill scenario JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resultado de las operaciones de cálculo de facturas
///
/// Result type for the utility bill calculation
pub type Result<T> = std::result::Result<T, BillError>;

impl From<std::num::ParseFloatError> for BillError {
    fn from(err: std::num::ParseFloatError) -> Self {
        BillError::Parse {
            from: err.to_string(),
            into: "Number".into(),
            desc: "wrong number format",
        }
    }
}
