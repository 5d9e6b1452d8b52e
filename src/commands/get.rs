//! Extract files from a disk image into the working directory.

use log::{info,warn};
use crate::fs::advh;
use crate::fs::msxdos::{Disk,LoadPlan};
use crate::STDRESULT;
use super::RCH;

pub fn get(cmd: &clap::ArgMatches,advh_mode: bool) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let patterns = super::gather_patterns(cmd);
    let mut count = 0;
    if advh_mode {
        let img = std::fs::read(path)?;
        info!("{} KB ADVH format image",img.len()/1024);
        for pattern in &patterns {
            for rec in advh::search(&img,pattern) {
                let data = advh::extract(&img,&rec)?;
                std::fs::write(rec.full_name(),data)?;
                println!("extracting {}",rec.full_name());
                count += 1;
            }
        }
    } else {
        let disk = Disk::from_file(path,LoadPlan::Full)?;
        for pattern in &patterns {
            for finfo in disk.search(pattern) {
                let data = disk.extract(&finfo)?;
                std::fs::write(finfo.full_name(),data)?;
                println!("extracting {}",finfo.full_name());
                count += 1;
            }
        }
    }
    if count==0 {
        warn!("nothing matched");
    }
    Ok(())
}
