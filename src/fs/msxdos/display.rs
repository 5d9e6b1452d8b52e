//! ### MSX-DOS disk display
//!
//! Renders the directory listing, the disk information panel, and the
//! cluster chain map.  Everything is written into a `String` so callers
//! decide where it goes.

use std::fmt::Write;
use colored::Colorize;
use super::Disk;
use super::directory::FileInfo;
use crate::DYNERR;

fn file_line(finfo: &FileInfo) -> String {
    let size = match (finfo.volume_id,finfo.directory) {
        (true,_) => "<VOL>".bold().to_string(),
        (_,true) => "<DIR>".bold().to_string(),
        _ => finfo.eof.to_string()
    };
    let date = match finfo.write_date {
        Some(d) => d.format("%-d/%m/%Y").to_string(),
        None => "".to_string()
    };
    let time = match finfo.write_time {
        Some(t) => t.format("%-H:%M:%S").to_string(),
        None => "".to_string()
    };
    let mut attr = String::new();
    if finfo.read_only {
        attr += &"R".red().to_string();
    }
    if finfo.hidden {
        attr += "H";
    }
    if finfo.system {
        attr += "S";
    }
    if finfo.archived {
        attr += "A";
    }
    format!("{:<12} {:>9}  {:<10} {:<8} {}",finfo.full_name(),size,date,time,attr)
}

/// Directory listing of the files matching `pattern`, trailed by the free
/// byte count of the whole disk.
pub fn directory_listing(disk: &Disk,pattern: &str) -> Result<String,DYNERR> {
    let mut ans = String::new();
    writeln!(ans)?;
    writeln!(ans,"Volume name is {}",disk.boot().oem_name())?;
    writeln!(ans)?;
    let files = disk.search(pattern);
    if files.is_empty() {
        writeln!(ans,"*** Disk is empty ***")?;
    } else {
        writeln!(ans,"{:<12} {:>9}  {:<10} {:<8} {}","Name","Bytes","Date","Time","Attr")?;
        writeln!(ans,"{:<12} {:>9}  {:<10} {:<8} {}","====","=====","====","====","====")?;
        for finfo in &files {
            writeln!(ans,"{}",file_line(finfo))?;
        }
        writeln!(ans)?;
        writeln!(ans,"{} files",files.len())?;
    }
    writeln!(ans)?;
    writeln!(ans,"{} bytes free",disk.free_bytes())?;
    writeln!(ans)?;
    Ok(ans)
}

/// Information panel: the BPB fields, the derived region offsets, the FAT
/// mirror check, and the space accounting.
pub fn disk_info(disk: &Disk) -> Result<String,DYNERR> {
    let boot = disk.boot();
    let mut ans = String::new();
    writeln!(ans)?;
    writeln!(ans,"{:<21}{}","Volume name",boot.oem_name())?;
    writeln!(ans,"{:<21}{}","Bytes per sector",boot.sec_size())?;
    writeln!(ans,"{:<21}{}","Sectors per cluster",boot.secs_per_clus())?;
    writeln!(ans,"{:<21}{}","Reserved sectors",boot.res_secs())?;
    writeln!(ans,"{:<21}{}","FAT copies",boot.num_fats())?;
    writeln!(ans,"{:<21}{}","Root entries",boot.root_dir_entries())?;
    writeln!(ans,"{:<21}{}","Total sectors",boot.tot_secs())?;
    writeln!(ans,"{:<21}0x{:02X}","Media descriptor",boot.media_byte())?;
    writeln!(ans,"{:<21}{}","Sectors per FAT",boot.fat_secs())?;
    writeln!(ans,"{:<21}{}","Sectors per track",boot.secs_per_track())?;
    writeln!(ans,"{:<21}{}","Heads",boot.heads())?;
    writeln!(ans,"{:<21}{}","Hidden sectors",boot.hidden_secs())?;
    writeln!(ans)?;
    writeln!(ans,"{:<21}bytes 0..{}","Boot sector",boot.fat_offset()-1)?;
    for copy in 0..boot.num_fats() {
        let offset = boot.fat_offset() + copy*boot.fat_byte_len();
        writeln!(ans,"{:<21}bytes {}..{}",format!("FAT copy {}",copy+1),offset,offset+boot.fat_byte_len()-1)?;
    }
    writeln!(ans,"{:<21}bytes {}..{}","Root directory",boot.root_dir_offset(),boot.data_offset()-1)?;
    writeln!(ans,"{:<21}bytes {}..{}","Cluster region",boot.data_offset(),boot.disk_size()-1)?;
    writeln!(ans,"{:<21}{}","Clusters",boot.cluster_count())?;
    let mut mirrors_ok = true;
    for copy in 1..boot.num_fats() {
        if disk.fat_copy(copy)!=disk.fat() {
            mirrors_ok = false;
        }
    }
    match mirrors_ok {
        true => writeln!(ans,"{:<21}{}","FAT mirrors","good".green())?,
        false => writeln!(ans,"{:<21}{}","FAT mirrors","diverged".red())?
    }
    writeln!(ans)?;
    writeln!(ans,"{} files",disk.catalog().len())?;
    writeln!(ans,"{} bytes free",disk.free_bytes())?;
    writeln!(ans)?;
    Ok(ans)
}

/// Cluster chains of the files matching `pattern`, one line per cluster
/// with the byte range it occupies in the image.
pub fn chain_map(disk: &Disk,pattern: &str) -> Result<String,DYNERR> {
    let bs = disk.boot().block_size();
    let mut ans = String::new();
    for finfo in disk.search(pattern) {
        writeln!(ans,"{}",finfo.full_name().bold())?;
        let chain = disk.chain(&finfo)?;
        if chain.is_empty() {
            writeln!(ans,"    no clusters")?;
        }
        for curr in chain {
            let offset = disk.cluster_offset(curr as usize);
            writeln!(ans,"    cluster {:>4}: bytes {}..{}",curr,offset,offset+bs-1)?;
        }
    }
    Ok(ans)
}

#[test]
fn listing_smoke() {
    colored::control::set_override(false);
    let mut disk = Disk::create(crate::bios::bpb::FloppyKind::F720);
    let empty = directory_listing(&disk,"*.*").expect("listing failed");
    assert!(empty.contains("*** Disk is empty ***"));
    assert!(empty.contains("730112 bytes free"));
    disk.add_file("test.bas",&[0;100],None).expect("add failed");
    let full = directory_listing(&disk,"*.*").expect("listing failed");
    assert!(full.contains("TEST.BAS"));
    assert!(full.contains("1 files"));
    assert!(full.contains("729088 bytes free"));
}

#[test]
fn chain_map_smoke() {
    colored::control::set_override(false);
    let mut disk = Disk::create(crate::bios::bpb::FloppyKind::F720);
    disk.add_file("two.bin",&[7;1500],None).expect("add failed");
    let map = chain_map(&disk,"*.*").expect("map failed");
    assert!(map.contains("TWO.BIN"));
    assert!(map.contains("cluster    2"));
    assert!(map.contains("cluster    3"));
}

#[test]
fn info_smoke() {
    colored::control::set_override(false);
    let disk = Disk::create(crate::bios::bpb::FloppyKind::F720);
    let info = disk_info(&disk).expect("info failed");
    assert!(info.contains("Media descriptor     0xF9"));
    assert!(info.contains("FAT mirrors          good"));
    assert!(info.contains("730112 bytes free"));
}
