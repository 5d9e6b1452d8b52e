//! Add host files to a disk image, formatting a fresh 720 KB image if the
//! image file does not exist yet.

use std::path::Path;
use chrono::NaiveDateTime;
use crate::fs::msxdos::{Disk,Error};
use crate::STDRESULT;
use super::RCH;

/// modification time of the host file, None if the host will not say
fn host_mtime(path: &str) -> Option<NaiveDateTime> {
    let meta = std::fs::metadata(path).ok()?;
    let stamp = meta.modified().ok()?;
    Some(chrono::DateTime::<chrono::Local>::from(stamp).naive_local())
}

pub fn put(cmd: &clap::ArgMatches) -> STDRESULT {
    let path = cmd.get_one::<String>("dsk").expect(RCH);
    let files = cmd.get_many::<String>("files").expect(RCH);
    let mut disk = Disk::from_file_or_create(path)?;
    for host_path in files {
        let data = std::fs::read(host_path)?;
        let name = match Path::new(host_path).file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => return Err(Box::new(Error::Syntax))
        };
        let updated = disk.add_file(&name,&data,host_mtime(host_path))?;
        match updated {
            true => println!("updating {}",name.to_uppercase()),
            false => println!("adding {}",name.to_uppercase())
        }
    }
    disk.flush(path)
}
