//! ### MSX-DOS directory structures
//!
//! This module encapsulates the root directory.  The FAT itself is
//! implemented in `crate::bios::fat`.  The BPB is in `crate::bios::bpb`.
//!
//! MSX-DOS 1 has no subdirectories, so a directory is always the fixed-size
//! root directory region, a packed sequence of 32-byte entries.

use chrono::{NaiveDate,NaiveTime};
use super::pack;

/// Size of the directory entry in bytes, always 32
pub const DIR_ENTRY_SIZE: usize = 32;
/// first name byte for a deleted entry
pub const DELETED: u8 = 0xe5;

pub const READ_ONLY: u8 = 1;
pub const HIDDEN: u8 = 2;
pub const SYSTEM: u8 = 4;
pub const VOLUME_ID: u8 = 8;
pub const DIRECTORY: u8 = 16;
pub const ARCHIVE: u8 = 32;

/// Convenient collection of information about one directory entry.
/// Attribute flags are broken out into their own variables.
/// Created on demand by `Disk`, carries no identity beyond `idx`.
#[derive(Clone)]
pub struct FileInfo {
    /// index of the entry in the root directory
    pub idx: usize,
    pub name: String,
    pub typ: String,
    pub read_only: bool,
    pub hidden: bool,
    pub system: bool,
    pub volume_id: bool,
    pub directory: bool,
    pub archived: bool,
    pub write_date: Option<NaiveDate>,
    pub write_time: Option<NaiveTime>,
    pub eof: usize,
    pub cluster1: usize
}

impl FileInfo {
    /// `NAME.EXT`, or just `NAME` when there is no extension
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

/// One 32-byte root directory entry, decoded and encoded field by field
/// at fixed offsets; never read through a structure overlay.
pub struct Entry {
    name: [u8;8],
    ext: [u8;3],
    /// RO=1,hidden=2,sys=4,vol=8,dir=16,archive=32
    attr: u8,
    /// MSX-DOS 2 uses the first of these for the original first character
    /// of a deleted file, we preserve whatever is there
    reserved: [u8;2],
    creation_time: [u8;2],
    creation_date: [u8;2],
    unused: [u8;4],
    write_time: [u8;2],
    write_date: [u8;2],
    /// initial cluster of the file's chain
    cluster1: [u8;2],
    file_size: [u8;4]
}

impl Entry {
    /// Create an entry with the given name and modification timestamp
    /// (time==None means use current time).  The creation timestamp is set
    /// equal to the modification timestamp only for brand-new entries.
    pub fn create(name: &str, time: Option<chrono::NaiveDateTime>, brand_new: bool) -> Self {
        let mtime = pack::pack_time(time);
        let mdate = pack::pack_date(time);
        let (base,ext) = pack::string_to_file_name(name);
        Self {
            name: base,
            ext,
            attr: 0,
            reserved: [0,0],
            creation_time: if brand_new { mtime } else { [0,0] },
            creation_date: if brand_new { mdate } else { [0,0] },
            unused: [0;4],
            write_time: mtime,
            write_date: mdate,
            cluster1: [0,0],
            file_size: [0,0,0,0]
        }
    }
    pub fn from_bytes(buf: &[u8; DIR_ENTRY_SIZE]) -> Self {
        Self {
            name: buf[0..8].try_into().expect("bounds"),
            ext: buf[8..11].try_into().expect("bounds"),
            attr: buf[0x0b],
            reserved: buf[0x0c..0x0e].try_into().expect("bounds"),
            creation_time: buf[0x0e..0x10].try_into().expect("bounds"),
            creation_date: buf[0x10..0x12].try_into().expect("bounds"),
            unused: buf[0x12..0x16].try_into().expect("bounds"),
            write_time: buf[0x16..0x18].try_into().expect("bounds"),
            write_date: buf[0x18..0x1a].try_into().expect("bounds"),
            cluster1: buf[0x1a..0x1c].try_into().expect("bounds"),
            file_size: buf[0x1c..0x20].try_into().expect("bounds")
        }
    }
    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut ans = [0; DIR_ENTRY_SIZE];
        ans[0..8].copy_from_slice(&self.name);
        ans[8..11].copy_from_slice(&self.ext);
        ans[0x0b] = self.attr;
        ans[0x0c..0x0e].copy_from_slice(&self.reserved);
        ans[0x0e..0x10].copy_from_slice(&self.creation_time);
        ans[0x10..0x12].copy_from_slice(&self.creation_date);
        ans[0x12..0x16].copy_from_slice(&self.unused);
        ans[0x16..0x18].copy_from_slice(&self.write_time);
        ans[0x18..0x1a].copy_from_slice(&self.write_date);
        ans[0x1a..0x1c].copy_from_slice(&self.cluster1);
        ans[0x1c..0x20].copy_from_slice(&self.file_size);
        ans
    }
    pub fn set_cluster(&mut self,cluster: usize) {
        self.cluster1 = u16::to_le_bytes(cluster as u16);
    }
    pub fn set_eof(&mut self,eof: usize) {
        self.file_size = u32::to_le_bytes(eof as u32);
    }
    pub fn eof(&self) -> usize {
        u32::from_le_bytes(self.file_size) as usize
    }
}

/// Interpret one raw directory slot as a file record.  Returns None for
/// unused or deleted slots (any of the 11 name bytes outside printable
/// ASCII), and for garbage entries whose initial cluster or size could not
/// belong to this disk.  The filters silently drop corrupt slots rather
/// than failing the whole directory.
pub fn parse_entry(raw: &[u8],idx: usize,cluster_limit: usize,disk_size: usize) -> Option<FileInfo> {
    for i in 0..11 {
        if raw[i] < 0x20 || raw[i] >= 0x80 {
            return None;
        }
    }
    let entry = Entry::from_bytes(raw.try_into().expect("bounds"));
    let cluster1 = u16::from_le_bytes(entry.cluster1) as usize;
    if cluster1 >= cluster_limit {
        return None;
    }
    if entry.eof() >= disk_size {
        return None;
    }
    let (name,typ) = pack::file_name_to_split_string(entry.name,entry.ext);
    Some(FileInfo {
        idx,
        name,
        typ,
        read_only: (entry.attr & READ_ONLY) > 0,
        hidden: (entry.attr & HIDDEN) > 0,
        system: (entry.attr & SYSTEM) > 0,
        volume_id: (entry.attr & VOLUME_ID) > 0,
        directory: (entry.attr & DIRECTORY) > 0,
        archived: (entry.attr & ARCHIVE) > 0,
        write_date: pack::unpack_date(entry.write_date),
        write_time: pack::unpack_time(entry.write_time),
        eof: entry.eof(),
        cluster1
    })
}

/// Is this raw directory slot available for a new entry?  A slot is free
/// when its first name byte is outside printable ASCII, which covers both
/// never-used slots and deleted ones.
pub fn is_slot_free(raw: &[u8]) -> bool {
    raw[0] < 0x20 || raw[0] >= 0x80
}

/// Test a file name against a classic DOS `DIR`-style glob.  The name and
/// extension portions are matched independently, `*` accepts the remainder
/// of its portion and `?` matches exactly one existing character.  Case
/// insensitive, no regex, no nested wildcards.
pub fn match_pattern(name: &str,typ: &str,pattern: &str) -> bool {
    let name_b = name.as_bytes();
    let pat = pattern.as_bytes();
    let mut pi = 0;
    let mut si = 0;
    let mut star = false;
    // name portion, up to 8 pattern characters
    for _i in 0..8 {
        if pi >= pat.len() {
            break;
        }
        match pat[pi] {
            b'*' => {
                star = true;
                pi += 1;
                break;
            },
            b'.' => break,
            b'?' if si < name_b.len() => {
                pi += 1;
                si += 1;
            },
            c => {
                let src = match si < name_b.len() {
                    true => name_b[si],
                    false => 0
                };
                if c.to_ascii_uppercase() != src.to_ascii_uppercase() {
                    return false;
                }
                pi += 1;
                si += 1;
            }
        }
    }
    if !star && si < name_b.len() {
        return false;
    }
    // extension portion, only entered through the dot separator
    let typ_b = typ.as_bytes();
    if pi >= pat.len() {
        return typ_b.is_empty();
    }
    if pat[pi] != b'.' {
        return false;
    }
    pi += 1;
    let mut ti = 0;
    for _i in 0..3 {
        if pi >= pat.len() {
            break;
        }
        match pat[pi] {
            b'*' => return true,
            b'?' if ti < typ_b.len() => {
                pi += 1;
                ti += 1;
            },
            c => {
                let src = match ti < typ_b.len() {
                    true => typ_b[ti],
                    false => 0
                };
                if c.to_ascii_uppercase() != src.to_ascii_uppercase() {
                    return false;
                }
                pi += 1;
                ti += 1;
            }
        }
    }
    pi >= pat.len() && ti >= typ_b.len()
}

#[test]
fn wildcard_matching() {
    assert!(match_pattern("TEST","BAS","*.*"));
    assert!(match_pattern("NOEXT","","*.*"));
    assert!(match_pattern("COMMAND","COM","*.COM"));
    assert!(!match_pattern("COMMAND","BAS","*.COM"));
    assert!(match_pattern("FOO1","BAS","FOO?.BAS"));
    assert!(match_pattern("FOOX","BAS","FOO?.BAS"));
    assert!(!match_pattern("FOOBAR","BAS","FOO?.BAS"));
    assert!(!match_pattern("FOO","BAS","FOO?.BAS"));
    assert!(match_pattern("MSXDOS","SYS","msxdos.sys"));
    // a pattern without an extension only matches extension-less entries
    assert!(!match_pattern("MSXDOS","SYS","MSX*"));
    assert!(match_pattern("MSXDOS","SYS","MSX*.*"));
    assert!(!match_pattern("MSXDOS","SYS","MSXDOS"));
    assert!(match_pattern("NOEXT","","NOEXT"));
    assert!(!match_pattern("NOEXT","","NOEXTRA"));
}

#[test]
fn entry_round_trip() {
    let date = chrono::NaiveDate::from_ymd_opt(2019,6,1).unwrap();
    let time = chrono::NaiveTime::from_hms_opt(10,20,30).unwrap();
    let mut entry = Entry::create("hello.bin",Some(chrono::NaiveDateTime::new(date,time)),true);
    entry.set_cluster(5);
    entry.set_eof(1500);
    let raw = entry.to_bytes();
    let finfo = parse_entry(&raw,7,713,737280).expect("entry rejected");
    assert_eq!(finfo.full_name(),"HELLO.BIN");
    assert_eq!(finfo.cluster1,5);
    assert_eq!(finfo.eof,1500);
    assert_eq!(finfo.idx,7);
    assert_eq!(finfo.write_date,Some(date));
    assert_eq!(finfo.write_time,Some(time));
}

#[test]
fn garbage_entries_filtered() {
    let mut raw = [0u8;DIR_ENTRY_SIZE];
    // unused slot
    assert!(parse_entry(&raw,0,713,737280).is_none());
    assert!(is_slot_free(&raw));
    // deleted slot
    raw[0..11].copy_from_slice(b"HELLO   BIN");
    raw[0] = DELETED;
    assert!(parse_entry(&raw,0,713,737280).is_none());
    assert!(is_slot_free(&raw));
    // cluster beyond the disk
    let mut entry = Entry::create("hello.bin",None,true);
    entry.set_cluster(1000);
    assert!(parse_entry(&entry.to_bytes(),0,713,737280).is_none());
    // size beyond the disk
    let mut entry = Entry::create("hello.bin",None,true);
    entry.set_cluster(2);
    entry.set_eof(800000);
    assert!(parse_entry(&entry.to_bytes(),0,713,737280).is_none());
}
