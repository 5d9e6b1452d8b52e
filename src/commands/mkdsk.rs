//! Create a blank formatted disk image.

use std::str::FromStr;
use crate::bios::bpb::FloppyKind;
use crate::fs::msxdos::Disk;
use crate::STDRESULT;
use super::RCH;

pub fn mkdsk(cmd: &clap::ArgMatches) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let size = cmd.get_one::<String>("size").expect(RCH);
    let kind = FloppyKind::from_str(size)?;
    let mut disk = Disk::create(kind);
    disk.flush(path)?;
    println!("formatted {} KB image {}",kind,path);
    Ok(())
}
