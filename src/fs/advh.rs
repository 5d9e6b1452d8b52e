//! ### ADVH flat-table format
//!
//! Reader for the legacy ADVH disk layout.  There is no FAT; a fixed table
//! of 16-byte records maps names straight onto sector runs.  The first
//! record slot is the format header and is skipped, the table ends at the
//! first record whose name starts with `0xFF`, or after 190 records.
//!
//! The format is read-only here, these disks are only unpacked.

use std::fmt::Write;
use log::debug;
use crate::DYNERR;
use super::msxdos::types::Error;
use super::msxdos::directory::match_pattern;
use super::msxdos::pack;

pub const RECORD_SIZE: usize = 16;
pub const MAX_RECORDS: usize = 190;
pub const SEC_SIZE: usize = 512;
/// the header record occupies the first slot of the second sector
const TABLE_OFFSET: usize = SEC_SIZE + RECORD_SIZE;
const TERMINATOR: u8 = 0xff;

/// One table record: a name mapped onto a run of sectors.
pub struct Record {
    pub idx: usize,
    pub name: String,
    pub typ: String,
    /// byte offset of the data in the image
    pub offset: usize,
    /// byte length of the data
    pub size: usize
}

impl Record {
    pub fn full_name(&self) -> String {
        match self.typ.len() {
            0 => self.name.clone(),
            _ => [self.name.as_str(),".",self.typ.as_str()].concat()
        }
    }
    pub fn matches(&self,pattern: &str) -> bool {
        match_pattern(&self.name,&self.typ,pattern)
    }
}

/// Decode the record table.  Name and extension are at offsets 0 and 8,
/// the initial sector and sector count are 16-bit words at 11 and 13,
/// the last byte is reserved.
pub fn read_directory(img: &[u8]) -> Vec<Record> {
    let mut ans = Vec::new();
    for idx in 0..MAX_RECORDS {
        let offset = TABLE_OFFSET + idx*RECORD_SIZE;
        if offset+RECORD_SIZE > img.len() {
            debug!("record table ran off the image at {}",idx);
            break;
        }
        let rec = &img[offset..offset+RECORD_SIZE];
        if rec[0]==TERMINATOR {
            break;
        }
        let name: [u8;8] = rec[0..8].try_into().expect("bounds");
        let ext: [u8;3] = rec[8..11].try_into().expect("bounds");
        let (name,typ) = pack::file_name_to_split_string(name,ext);
        let secini = u16::from_le_bytes([rec[11],rec[12]]) as usize;
        let secsize = u16::from_le_bytes([rec[13],rec[14]]) as usize;
        ans.push(Record {
            idx,
            name,
            typ,
            offset: secini*SEC_SIZE,
            size: secsize*SEC_SIZE
        });
    }
    ans
}

pub fn search(img: &[u8],pattern: &str) -> Vec<Record> {
    read_directory(img).into_iter().filter(|r| r.matches(pattern)).collect()
}

/// The record's data, a direct byte range of the image.
pub fn extract(img: &[u8],rec: &Record) -> Result<Vec<u8>,DYNERR> {
    if rec.offset + rec.size > img.len() {
        debug!("record {} runs off the image",rec.full_name());
        return Err(Box::new(Error::BadImage));
    }
    Ok(img[rec.offset..rec.offset+rec.size].to_vec())
}

/// Listing of the records matching `pattern`, sizes in bytes.
pub fn directory_listing(img: &[u8],pattern: &str) -> Result<String,DYNERR> {
    let mut ans = String::new();
    writeln!(ans)?;
    let records = search(img,pattern);
    if records.is_empty() {
        writeln!(ans,"*** Disk is empty ***")?;
    } else {
        writeln!(ans,"{:<12} {:>9}","Name","Bytes")?;
        writeln!(ans,"{:<12} {:>9}","====","=====")?;
        for rec in &records {
            writeln!(ans,"{:<12} {:>9}",rec.full_name(),rec.size)?;
        }
        writeln!(ans)?;
        writeln!(ans,"{} files",records.len())?;
    }
    writeln!(ans)?;
    Ok(ans)
}

#[cfg(test)]
fn test_image() -> Vec<u8> {
    let mut img = vec![0u8;16*SEC_SIZE];
    // header record
    img[SEC_SIZE..SEC_SIZE+4].copy_from_slice(b"ADVH");
    // GAME.BIN at sector 4, 2 sectors
    let rec = TABLE_OFFSET;
    img[rec..rec+11].copy_from_slice(b"GAME    BIN");
    img[rec+11..rec+13].copy_from_slice(&u16::to_le_bytes(4));
    img[rec+13..rec+15].copy_from_slice(&u16::to_le_bytes(2));
    // LOADER at sector 6, 1 sector
    let rec = TABLE_OFFSET + RECORD_SIZE;
    img[rec..rec+11].copy_from_slice(b"LOADER     ");
    img[rec+11..rec+13].copy_from_slice(&u16::to_le_bytes(6));
    img[rec+13..rec+15].copy_from_slice(&u16::to_le_bytes(1));
    // terminator
    img[TABLE_OFFSET + 2*RECORD_SIZE] = TERMINATOR;
    for i in 0..2*SEC_SIZE {
        img[4*SEC_SIZE+i] = (i % 253) as u8;
    }
    img
}

#[test]
fn table_decoding() {
    let img = test_image();
    let records = read_directory(&img);
    assert_eq!(records.len(),2);
    assert_eq!(records[0].full_name(),"GAME.BIN");
    assert_eq!(records[0].offset,4*SEC_SIZE);
    assert_eq!(records[0].size,2*SEC_SIZE);
    assert_eq!(records[1].full_name(),"LOADER");
    assert_eq!(search(&img,"*.BIN").len(),1);
    assert_eq!(search(&img,"*.*").len(),2);
}

#[test]
fn record_extraction() {
    let img = test_image();
    let records = read_directory(&img);
    let data = extract(&img,&records[0]).expect("extract failed");
    assert_eq!(data.len(),2*SEC_SIZE);
    assert_eq!(data[0],0);
    assert_eq!(data[100],100);
    // a record pointing past the end is rejected
    let bogus = Record { idx: 0, name: "X".to_string(), typ: "".to_string(), offset: 15*SEC_SIZE, size: 2*SEC_SIZE };
    assert!(extract(&img,&bogus).is_err());
}
