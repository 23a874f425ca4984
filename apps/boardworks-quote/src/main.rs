//! # boardworks-quote Entry Point
//!
//! Setup and dispatch live in `lib.rs` so they can be tested.

use std::process::ExitCode;

fn main() -> ExitCode {
    boardworks_quote::run()
}
