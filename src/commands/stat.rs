//! Show the disk information panel.

use crate::fs::msxdos;
use crate::fs::msxdos::{Disk,LoadPlan};
use crate::STDRESULT;
use super::RCH;

pub fn stat(cmd: &clap::ArgMatches) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let disk = Disk::from_file(path,LoadPlan::BootAndFat)?;
    print!("{}",msxdos::display::disk_info(&disk)?);
    Ok(())
}
