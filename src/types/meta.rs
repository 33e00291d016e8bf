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
Tipos para la definición de metadatos
=====================================

- Tipo Meta y su trait MetaVec
*/

use std::fmt;
use std::str;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BillError;

/// Metadatos del archivo de consumos
///
/// Metadata of a fuel ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// metadata name.
    pub key: String,
    /// metadata value
    pub value: String,
}

impl Meta {
    /// Metadata constructor
    pub fn new<T, U>(key: T, value: U) -> Self
    where
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Meta {
    /// Textual representation of metadata.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#META {}: {}", self.key, self.value)
    }
}

impl str::FromStr for Meta {
    type Err = BillError;

    fn from_str(s: &str) -> Result<Meta, Self::Err> {
        let line = s.trim();
        let body = line.strip_prefix("#META").ok_or_else(|| BillError::Parse {
            from: s.into(),
            into: "Meta".into(),
            desc: "metadata lines start with #META",
        })?;
        let items: Vec<&str> = body.splitn(2, ':').map(str::trim).collect();
        if items.len() == 2 && !items[0].is_empty() {
            Ok(Meta::new(items[0], items[1]))
        } else {
            Err(BillError::Parse {
                from: s.into(),
                into: "Meta".into(),
                desc: "expected #META KEY: value",
            })
        }
    }
}

/// Trait común para gestionar metadatos
pub trait MetaVec {
    /// Get vector of metadata
    fn get_metavec(&self) -> &Vec<Meta>;

    /// Get mutable vector of metadata
    fn get_mut_metavec(&mut self) -> &mut Vec<Meta>;

    /// Check if key is included in metadata
    fn has_meta(&self, key: &str) -> bool {
        self.get_metavec().iter().any(|m| m.key == key)
    }

    /// Get (optional) metadata value by key
    fn get_meta(&self, key: &str) -> Option<String> {
        self.get_metavec()
            .iter()
            .find(|m| m.key == key)
            .map(|v| v.value.clone())
    }

    /// Get (optional) metadata value by key as f64
    fn get_meta_f64(&self, key: &str) -> Option<f64> {
        self.get_meta(key)
            .and_then(|v| f64::from_str(v.trim()).ok())
    }

    /// Get (optional) metadata value by key as a list of f64 values
    ///
    /// Fails if any of the comma separated items is not a number
    fn get_meta_f64_list(&self, key: &str) -> Option<Result<Vec<f64>, BillError>> {
        self.get_meta(key).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| item.parse::<f64>().map_err(BillError::from))
                .collect()
        })
    }

    /// Get (optional) metadata value by key as bool
    fn get_meta_bool(&self, key: &str) -> Option<bool> {
        self.get_meta(key)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "yes" | "1"))
    }

    /// Update metadata value for key or insert new metadata.
    fn set_meta(&mut self, key: &str, value: &str) {
        let metavec = self.get_mut_metavec();
        if let Some(pos) = metavec.iter().position(|m| m.key == key) {
            metavec[pos].value = value.to_string();
        } else {
            metavec.push(Meta::new(key, value));
        };
    }
}
