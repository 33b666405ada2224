#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use clap::Parser;
use nu_ansi_term::Color;
use std::process::ExitCode;

mod cli;
mod config;
mod constants;
mod ctx;
mod errors;
mod git;
mod host;
mod process;
mod prompt;
mod subcommands;

fn main() -> ExitCode {
    match cli::Cli::parse().init_tracing_subscriber().and_then(cli::Cli::run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", Color::Red.bold().paint("error:"), e);
            if let Some(hint) = e.downcast_ref::<errors::ArkError>().and_then(|e| e.hint()) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
