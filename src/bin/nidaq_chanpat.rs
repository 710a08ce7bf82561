// nidaqmx/src/bin/nidaq_chanpat.rs
//
// Copyright (c) 2021-2025, nidaqmx-rs contributors
//
// Licensed under the MIT license:
//   <LICENSE or http://opensource.org/licenses/MIT>
// This file may not be copied, modified, or distributed except according
// to those terms.
//

//! Rust application to compress and expand NI-DAQmx channel lists.
//!
//! Runs entirely offline; the driver is never loaded.

use clap::{Arg, ArgAction, Command};
use nidaqmx::pattern;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args = Command::new("nidaq_chanpat")
        .version(VERSION)
        .author("nidaqmx-rs contributors")
        .about("Compress channel lists into range notation, or expand it back.")
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
            Arg::new("expand")
                .short('x')
                .long("expand")
                .action(ArgAction::SetTrue)
                .help("Expand patterns into the channels they name"),
        )
        .arg(
            Arg::new("channels")
                .action(ArgAction::Append)
                .required(true)
                .help("Channel names, or patterns with --expand"),
        )
        .get_matches();

    let channels = args.get_many::<String>("channels").unwrap();

    if args.get_flag("expand") {
        for pat in channels {
            for name in pattern::expand_pattern(pat) {
                println!("{}", name);
            }
        }
    } else {
        println!("{}", pattern::compress_pattern(channels));
    }
}
