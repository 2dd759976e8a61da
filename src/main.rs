// SPDX-FileCopyrightText: 2022-2025 RustInFinance
// SPDX-License-Identifier: BSD-3-Clause

use clap::{App, AppSettings, Arg};
use std::path::Path;

use schwabDividendsHelper::ResultExt;

fn create_cmd_line_pattern<'a, 'b>(myapp: App<'a, 'b>) -> App<'a, 'b> {
    myapp.arg(
        Arg::with_name("filepath")
            .help("Schwab transactions export (JSON). exchange_rates.csv is expected next to it")
            .required(true)
            .index(1),
    )
}

fn main() {
    schwabDividendsHelper::init_logging_infrastructure()
        .expect("Error initializing logging infrastructure");

    let myapp = App::new("Schwab dividends tax helper")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::ArgRequiredElseHelp);
    let matches = create_cmd_line_pattern(myapp).get_matches();

    let filepath = matches
        .value_of("filepath")
        .expect_and_log("error getting transactions file path");

    log::info!("Started schwabDividendsHelper");

    match schwabDividendsHelper::run_summary(Path::new(filepath)) {
        Ok(summary) => println!("{}", summary.text),
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
