// nidaqmx/src/bin/nidaq_info_rs.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//

//! Rust application to gather information about the NI-DAQmx driver.
//!

use clap::{Arg, ArgAction, Command};
use nidaqmx as daq;
use std::{ffi::OsStr, fs, process};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    env_logger::init();

    let args = Command::new("nidaq_info_rs")
        .version(VERSION)
        .author("nidaqmx-rs contributors")
        .about("NI-DAQmx driver information.")
        .disable_help_flag(true)
        .arg(
            Arg::new("help")
                .short('?')
                .long("help")
                .global(true)
                .action(ArgAction::Help)
                .help("Print help information"),
        )
        .arg(
            Arg::new("library")
                .short('l')
                .long("library")
                .action(ArgAction::Set)
                .help("Load the driver from the provided library path"),
        )
        .arg(
            Arg::new("names")
                .short('n')
                .long("names")
                .action(ArgAction::Set)
                .help("Extend the error-name table from an NIDAQmx.h header file"),
        )
        .arg(
            Arg::new("code")
                .short('c')
                .long("code")
                .action(ArgAction::Set)
                .allow_hyphen_values(true)
                .help("Look up a status code after loading the driver"),
        )
        .get_matches();

    let mut table = daq::ErrorTable::builtin();
    if let Some(path) = args.get_one::<String>("names") {
        let text = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("Error reading {}: {}", path, err);
            process::exit(1);
        });
        let added = table.extend_from_header(&text);
        println!("Loaded {} error name(s) from {}", added, path);
    }

    let ctx = daq::Context::with_error_table(
        args.get_one::<String>("library").map(OsStr::new),
        table,
    )
    .unwrap_or_else(|err| {
        eprintln!("Error loading the NI-DAQmx driver: {}", err);
        process::exit(1);
    });

    println!("NI-DAQmx version: {}", ctx.version());
    println!("{} error name(s) in the table", ctx.error_table().len());

    if let Some(code) = args.get_one::<String>("code") {
        let code: i32 = code.parse().unwrap_or_else(|_| {
            eprintln!("Status codes are integers; got {:?}", code);
            process::exit(1);
        });
        println!("{}: {}", code, ctx.error_table().label(code));
        match ctx.error_description(code) {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => println!("The driver has no description for this code."),
            Err(err) => {
                eprintln!("Error fetching the description: {}", err);
                process::exit(1);
            }
        }
    }
}
