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

//! Combustibles (fuel types)

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::BillError;

/// Tipo de combustible facturable (fuel type).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum FuelType {
    /// Electricity
    #[strum(to_string = "Electricity")]
    Electricity,
    /// Natural gas
    #[strum(to_string = "Natural Gas")]
    NaturalGas,
    /// Fuel oil
    #[strum(to_string = "Fuel Oil")]
    FuelOil,
    /// Propane
    #[strum(to_string = "Propane")]
    Propane,
    /// Cord wood
    #[strum(to_string = "Wood Cord")]
    WoodCord,
    /// Wood pellets
    #[strum(to_string = "Wood Pellets")]
    WoodPellets,
    /// Coal
    #[strum(to_string = "Coal")]
    Coal,
}

impl FuelType {
    /// Number of fuel types
    pub const COUNT: usize = 7;

    /// Position of the fuel in fixed size fuel collections
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical reporting unit for the monthly values of this fuel
    pub fn unit(self) -> &'static str {
        match self {
            FuelType::Electricity => "kWh",
            FuelType::NaturalGas => "therm",
            FuelType::FuelOil | FuelType::Propane => "gal",
            FuelType::WoodCord | FuelType::WoodPellets | FuelType::Coal => "MBtu",
        }
    }

    /// Identifier used in fuel ledger files
    pub fn code(self) -> &'static str {
        match self {
            FuelType::Electricity => "ELECTRICITY",
            FuelType::NaturalGas => "NATURALGAS",
            FuelType::FuelOil => "FUELOIL",
            FuelType::Propane => "PROPANE",
            FuelType::WoodCord => "WOODCORD",
            FuelType::WoodPellets => "WOODPELLETS",
            FuelType::Coal => "COAL",
        }
    }
}

impl str::FromStr for FuelType {
    type Err = BillError;

    fn from_str(s: &str) -> Result<FuelType, Self::Err> {
        FuelType::iter()
            .find(|f| f.code() == s || f.to_string() == s)
            .ok_or_else(|| BillError::Parse {
                from: s.into(),
                into: "FuelType".into(),
                desc: "unknown fuel",
            })
    }
}

/// Colección de tamaño fijo indexada por tipo de combustible
///
/// Fixed size collection with one slot per fuel type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelMap<T>([T; FuelType::COUNT]);

impl<T> FuelMap<T> {
    /// Iterate over (fuel, value) pairs in fuel order
    pub fn iter(&self) -> impl Iterator<Item = (FuelType, &T)> {
        FuelType::iter().zip(self.0.iter())
    }
}

impl<T> Index<FuelType> for FuelMap<T> {
    type Output = T;

    fn index(&self, fuel: FuelType) -> &T {
        &self.0[fuel.index()]
    }
}

impl<T> IndexMut<FuelType> for FuelMap<T> {
    fn index_mut(&mut self, fuel: FuelType) -> &mut T {
        &mut self.0[fuel.index()]
    }
}

impl<T: fmt::Display> fmt::Display for FuelMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self
            .iter()
            .map(|(fuel, v)| format!("{}: {}", fuel, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{}}}", items)
    }
}
