//! List the files on a disk image.

use log::info;
use crate::fs::{advh,msxdos};
use crate::fs::msxdos::{Disk,LoadPlan};
use crate::STDRESULT;
use super::RCH;

pub fn catalog(cmd: &clap::ArgMatches,advh_mode: bool) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let patterns = super::gather_patterns(cmd);
    if advh_mode {
        let img = std::fs::read(path)?;
        info!("{} KB ADVH format image",img.len()/1024);
        for pattern in &patterns {
            print!("{}",advh::directory_listing(&img,pattern)?);
        }
    } else {
        let disk = Disk::from_file(path,LoadPlan::BootAndFat)?;
        for pattern in &patterns {
            print!("{}",msxdos::display::directory_listing(&disk,pattern)?);
        }
    }
    Ok(())
}
