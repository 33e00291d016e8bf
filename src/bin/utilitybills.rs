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

#[macro_use]
extern crate clap;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::process::exit;

use clap::{App, AppSettings, Arg};
use failure::Error;
use failure::ResultExt;

use utilitybills::*;

const LICENSE: &str = "
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the 'Software'), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in
all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED 'AS IS', WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

// Funciones auxiliares -----------------------------------------------------------------------

fn readfile(path: &Path) -> Result<String, Error> {
    let mut f = File::open(path).context(format!("Archivo {} no encontrado", path.display()))?;
    let mut contents = String::new();
    f.read_to_string(&mut contents)
        .context("Error al leer el archivo")?;
    Ok(contents)
}

fn writefile(path: &Path, content: &[u8]) {
    let written = File::create(&path).and_then(|mut file| file.write_all(content));
    if let Err(err) = written {
        eprintln!(
            "ERROR: no se ha podido escribir en \"{}\": {}",
            path.display(),
            err
        );
        exit(exitcode::IOERR);
    }
}

/// Carga los consumos mensuales por combustible desde archivo
fn get_ledger(archivo: &str, verbosity: u64) -> FuelLedger {
    let path = Path::new(archivo);
    let ledgerstring = readfile(path).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: No se ha podido leer el archivo de consumos \"{}\" -> {}",
            path.display(),
            err.as_fail()
        );
        exit(exitcode::IOERR);
    });
    println!("Consumos por combustible: \"{}\"", path.display());
    let ledger = ledgerstring
        .parse::<FuelLedger>()
        .unwrap_or_else(|err| {
            eprintln!(
                "ERROR: Formato incorrecto del archivo de consumos \"{}\" ({})",
                path.display(),
                err
            );
            exit(exitcode::DATAERR);
        })
        .normalize();
    if verbosity > 1 && !ledger.meta.is_empty() {
        println!("Metadatos de consumos:");
        for meta in &ledger.meta {
            println!("  {}: {}", meta.key, meta.value);
        }
    }
    ledger
}

/// Carga los escenarios de facturación desde archivo
fn get_scenarios(archivo: &str, verbosity: u64) -> Vec<BillScenario> {
    let path = Path::new(archivo);
    let scenariostring = readfile(path).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: No se ha podido leer el archivo de escenarios \"{}\" -> {}",
            path.display(),
            err.as_fail()
        );
        exit(exitcode::IOERR);
    });
    println!("Escenarios de facturación: \"{}\"", path.display());
    let scenarios = BillScenario::list_from_json(&scenariostring).unwrap_or_else(|err| {
        eprintln!(
            "ERROR: Formato incorrecto del archivo de escenarios \"{}\" ({})",
            path.display(),
            err
        );
        exit(exitcode::DATAERR);
    });
    if verbosity > 0 {
        for scenario in &scenarios {
            println!("  Escenario: {}", scenario.name);
        }
    }
    scenarios
}

/// Obtén el periodo de simulación
/// Argumentos de CLI > Metadatos de consumos > Valor por defecto (año completo 2007)
fn get_period(ledger: &FuelLedger, matches: &clap::ArgMatches<'_>, verbosity: u64) -> SimulationPeriod {
    let meta_period = ledger.period().unwrap_or_else(|err| {
        eprintln!("ERROR: Periodo de simulación incorrecto en los metadatos ({})", err);
        exit(exitcode::DATAERR);
    });
    let year = if matches.is_present("year") {
        value_t!(matches, "year", i32).unwrap_or_else(|error| {
            eprintln!("ERROR: El año indicado no es un valor numérico válido");
            if verbosity > 2 {
                println!("{}", error)
            };
            exit(exitcode::DATAERR);
        })
    } else {
        meta_period.calendar_year
    };
    let (period, orig) = match matches.value_of("period") {
        Some(period) => (SimulationPeriod::parse_in_year(period, year), "usuario"),
        None if ledger.has_meta(META_SIM_PERIOD) => (meta_period.with_year(year), "metadatos"),
        None => (meta_period.with_year(year), "predefinido"),
    };
    let period = period.unwrap_or_else(|err| {
        eprintln!("ERROR: {}", err);
        exit(exitcode::DATAERR);
    });
    println!(
        "Periodo de simulación ({}): {} ({})",
        orig, period, period.calendar_year
    );
    period
}

// Función principal ------------------------------------------------------------------------------

fn main() {
    let matches = App::new("UtilityBills")
        .bin_name("utilitybills")
        .version(VERSION)
        .author("
Copyright (c) 2018-2022 Ministerio de Fomento,
                        Instituto de CC. de la Construcción Eduardo Torroja (IETcc-CSIC)

Licencia: Publicado bajo licencia MIT.

")
        .about("UtilityBills - Facturas energéticas anuales de edificios residenciales.")
        .setting(AppSettings::NextLineHelp)
        .arg(Arg::with_name("fuel_file")
            .short("c")
            .long("fuel_file")
            .value_name("FUEL_FILE")
            .required_unless("showlicense")
            .help("Archivo de consumos mensuales por combustible")
            .takes_value(true)
            .display_order(1))
        .arg(Arg::with_name("scenarios")
            .short("s")
            .long("scenarios")
            .value_name("SCENARIOS_FILE")
            .required_unless("showlicense")
            .help("Archivo JSON de escenarios de facturación")
            .takes_value(true)
            .display_order(2))
        .arg(Arg::with_name("year")
            .short("y")
            .long("year")
            .value_name("YEAR")
            .help("Año natural de la simulación")
            .takes_value(true)
            .display_order(3))
        .arg(Arg::with_name("period")
            .short("p")
            .long("period")
            .value_name("M/D-M/D")
            .help("Periodo de simulación.\nP.e.: -p 1/1-12/31")
            .takes_value(true)
            .display_order(4))
        .arg(Arg::with_name("archivo_salida_json")
            .long("json")
            .value_name("ARCHIVO_SALIDA_JSON")
            .help("Archivo de salida de las facturas en formato JSON")
            .takes_value(true))
        .arg(Arg::with_name("archivo_salida_csv")
            .long("csv")
            .value_name("ARCHIVO_SALIDA_CSV")
            .help("Archivo de salida de las facturas en formato CSV")
            .takes_value(true))
        .arg(Arg::with_name("monthly")
            .short("m")
            .long("monthly")
            .help("Muestra también los totales mensuales de cada combustible"))
        .arg(Arg::with_name("showlicense")
            .short("L")
            .long("license")
            .help("Muestra la licencia del programa (MIT)"))
        .arg(Arg::with_name("v")
            .short("v")
            .multiple(true)
            .help("Sets the level of verbosity"))
        .get_matches();

    if matches.is_present("showlicense") {
        println!(
            "
Copyright (c) 2018-2022 Ministerio de Fomento
                        Instituto de Ciencias de la Construcción Eduardo Torroja (IETcc-CSIC)
{}",
            LICENSE
        );
        exit(exitcode::OK);
    }

    // Prólogo ------------------------------------------------------------------------------------

    let verbosity = matches.occurrences_of("v");

    // Avisos del cálculo (escenarios omitidos, tarifas detalladas) por stderr
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    if verbosity > 2 {
        println!("Opciones indicadas: ----------");
        println!("{:#?}", matches);
        println!("------------------------------");
    }

    println!("** Datos de entrada");

    let (fuel_file, scenarios_file) =
        match (matches.value_of("fuel_file"), matches.value_of("scenarios")) {
            (Some(fuel_file), Some(scenarios_file)) => (fuel_file, scenarios_file),
            _ => {
                eprintln!("ERROR: Es necesario indicar el archivo de consumos y el de escenarios");
                exit(exitcode::USAGE);
            }
        };

    // Consumos, periodo de simulación y escenarios ----------------------------------------------
    let ledger = get_ledger(fuel_file, verbosity);
    let period = get_period(&ledger, &matches, verbosity);
    let scenarios = get_scenarios(scenarios_file, verbosity);

    if verbosity > 2 {
        println!("Consumos por combustible:\n{}", ledger);
    }

    // Cálculo de las facturas ---------------------------------------------------------------------
    let mut failed = false;
    let outcomes: Vec<ScenarioOutcome> = compute_all(&ledger, &period, &scenarios)
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                eprintln!("ERROR: {}", error);
                failed = true;
                None
            }
        })
        .collect();

    // Salida de resultados ------------------------------------------------------------------------
    let monthly = matches.is_present("monthly");
    let mut lines: Vec<String> = Vec::new();
    for outcome in &outcomes {
        lines.push(outcome.to_plain());
        if let (true, Some(bills)) = (monthly, outcome.bills()) {
            lines.extend(monthly_lines(bills).iter().map(AsPlain::to_plain));
        }
    }

    println!("** Facturas");
    println!("{}", lines.join("\n"));

    if let Some(archivo) = matches.value_of("archivo_salida_json") {
        let path = Path::new(archivo);
        if verbosity > 0 {
            println!("Resultados en formato JSON: {:?}", path.display());
        }
        let json = serde_json::to_string_pretty(&all_bill_lines(&outcomes)).unwrap_or_else(|error| {
            eprintln!("ERROR: No se han podido convertir las facturas al formato JSON");
            if verbosity > 2 {
                println!("{}", error)
            };
            exit(exitcode::DATAERR);
        });
        writefile(&path, json.as_bytes());
    }

    if let Some(archivo) = matches.value_of("archivo_salida_csv") {
        let path = Path::new(archivo);
        if verbosity > 0 {
            println!("Resultados en formato CSV: {:?}", path.display());
        }
        let written = csv::Writer::from_path(&path)
            .and_then(|mut wtr| write_csv(&mut wtr, &outcomes, monthly));
        if let Err(err) = written {
            eprintln!(
                "ERROR: no se ha podido escribir en \"{}\": {}",
                path.display(),
                err
            );
            exit(exitcode::IOERR);
        }
    }

    if failed {
        exit(exitcode::DATAERR);
    }
}
