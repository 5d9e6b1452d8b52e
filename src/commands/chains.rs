//! Show the cluster chains of files.

use crate::fs::msxdos;
use crate::fs::msxdos::{Disk,LoadPlan};
use crate::STDRESULT;
use super::RCH;

pub fn chains(cmd: &clap::ArgMatches) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let patterns = super::gather_patterns(cmd);
    let disk = Disk::from_file(path,LoadPlan::BootAndFat)?;
    for pattern in &patterns {
        print!("{}",msxdos::display::chain_map(&disk,pattern)?);
    }
    Ok(())
}
