//! # Commands module
//!
//! Backs the binary's subcommands.  Each submodule takes the parsed clap
//! matches, works through the library, and prints to stdout.  Fatal errors
//! propagate to `main` which maps them onto the historical exit statuses.

pub mod mkdsk;
pub mod catalog;
pub mod get;
pub mod put;
pub mod delete;
pub mod stat;
pub mod chains;

use crate::bios;
use crate::fs::msxdos;

pub const RCH: &str = "unreachable was reached";

/// Map a fatal error onto the exit status the tool has always used:
/// 1 bad format size, 2 bad image or host IO, 4 disk full, 5 internal,
/// 6 directory full.
pub fn exit_code(err: &crate::DYNERR) -> i32 {
    if let Some(e) = err.downcast_ref::<bios::Error>() {
        return match e {
            bios::Error::BadFormatSize => 1,
            bios::Error::BadBootSector => 2
        };
    }
    if let Some(e) = err.downcast_ref::<msxdos::Error>() {
        return match e {
            msxdos::Error::BadImage => 2,
            msxdos::Error::BadFat => 2,
            msxdos::Error::ReadFault => 2,
            msxdos::Error::Syntax => 2,
            msxdos::Error::DiskFull => 4,
            msxdos::Error::Internal => 5,
            msxdos::Error::DirectoryFull => 6
        };
    }
    // host IO failures land here
    2
}

/// the patterns following the image path, `*.*` when none were given
pub fn gather_patterns(cmd: &clap::ArgMatches) -> Vec<String> {
    match cmd.get_many::<String>("files") {
        Some(files) => files.map(|s| s.to_string()).collect(),
        None => vec!["*.*".to_string()]
    }
}
