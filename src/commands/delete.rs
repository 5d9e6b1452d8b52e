//! Delete files from a disk image.

use log::warn;
use crate::fs::msxdos::{Disk,LoadPlan};
use crate::STDRESULT;
use super::RCH;

pub fn delete(cmd: &clap::ArgMatches) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let patterns = super::gather_patterns(cmd);
    let mut disk = Disk::from_file(path,LoadPlan::Full)?;
    let mut count = 0;
    for pattern in &patterns {
        for finfo in disk.search(pattern) {
            disk.delete(&finfo)?;
            println!("deleting {}",finfo.full_name());
            count += 1;
        }
    }
    match count {
        0 => {
            warn!("nothing matched, image untouched");
            Ok(())
        },
        _ => disk.flush(path)
    }
}
