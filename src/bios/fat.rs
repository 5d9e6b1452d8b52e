//! ### File allocation table (FAT)
//!
//! Module for manipulating the 12-bit FAT on MSX-DOS volumes.  This module
//! assumes the entire FAT is buffered (as usual we suppose small retro
//! volumes).
//!
//! The FAT can be thought of as a cluster pool with forward links.
//! The links form chains of clusters, each chain holds a file's data.
//! Entries are packed two-per-three-bytes: entry `n` lives in the 16-bit
//! word at byte offset `n + n/2`, in the high 12 bits when `n` is odd and
//! the low 12 bits when `n` is even.
//!
//! The first two entries are reserved, so the first data cluster is cluster 2.
//! Entry 0 carries the BPB's media descriptor in the low 8 bits, higher bits
//! are 1.  Entry 1 contains the end of chain mark upon formatting.

/// end of cluster chain (EOC); entries >= this value terminate a chain
const EOC_MIN: u16 = 0xff8;
/// the EOC value we write
pub const EOC: u16 = 0xfff;
const FREE_CLUSTER: u16 = 0;
pub const FIRST_DATA_CLUSTER: usize = 2;

/// get the value of entry `n`, `buf` holds the entire FAT
pub fn get_cluster(n: usize,buf: &[u8]) -> u16 {
    let offset = n + n/2;
    let val16 = u16::from_le_bytes([buf[offset],buf[offset+1]]);
    if n & 1 == 1 {
        val16 >> 4
    } else {
        val16 & 0x0fff
    }
}

/// set the value of entry `n`, preserving the 4 bits belonging to the
/// neighboring entry that shares the middle byte
pub fn set_cluster(n: usize,val: u16,buf: &mut [u8]) {
    let offset = n + n/2;
    let old16 = u16::from_le_bytes([buf[offset],buf[offset+1]]);
    let new16 = if n & 1 == 1 {
        (val << 4) | (old16 & 0x000f)
    } else {
        (val & 0x0fff) | (old16 & 0xf000)
    };
    let bytes = u16::to_le_bytes(new16);
    buf[offset] = bytes[0];
    buf[offset+1] = bytes[1];
}

/// zero entry `n` and return its prior value, used when unlinking one
/// node of a chain during delete
pub fn clear_cluster(n: usize,buf: &mut [u8]) -> u16 {
    let prior = get_cluster(n,buf);
    set_cluster(n,FREE_CLUSTER,buf);
    prior
}

pub fn is_free(n: usize,buf: &[u8]) -> bool {
    get_cluster(n,buf)==FREE_CLUSTER
}

/// entries at or above `0xff8` are accepted as end of chain, we always
/// write `0xfff`
pub fn is_last(n: usize,buf: &[u8]) -> bool {
    get_cluster(n,buf) >= EOC_MIN
}

pub fn is_last_value(val: u16) -> bool {
    val >= EOC_MIN
}

pub fn mark_last(n: usize,buf: &mut [u8]) {
    set_cluster(n,EOC,buf);
}

/// install the reserved entries 0 and 1 on a fresh FAT
pub fn init(media: u8,buf: &mut [u8]) {
    buf[0] = media;
    buf[1] = 0xff;
    buf[2] = 0xff;
}

#[test]
fn codec_round_trip() {
    let mut buf = vec![0u8;512*3];
    for link in 2..16 {
        for val in [0u16,1,0x5a5,0xabc,0xfff] {
            set_cluster(link,val,&mut buf);
            assert_eq!(get_cluster(link,&buf),val);
        }
    }
}

#[test]
fn neighbors_unaffected() {
    let mut buf = vec![0u8;512*3];
    set_cluster(4,0xabc,&mut buf);
    set_cluster(5,0x123,&mut buf);
    assert_eq!(get_cluster(4,&buf),0xabc);
    assert_eq!(get_cluster(5,&buf),0x123);
    set_cluster(4,0x000,&mut buf);
    assert_eq!(get_cluster(5,&buf),0x123);
    let prior = clear_cluster(5,&mut buf);
    assert_eq!(prior,0x123);
    assert_eq!(get_cluster(5,&buf),0);
    assert_eq!(get_cluster(4,&buf),0);
}

#[test]
fn packed_layout() {
    // entries 2 and 3 share bytes 3..6: [lo2, hi3<<4|mid2, hi3..]
    let mut buf = vec![0u8;512];
    set_cluster(2,0xabc,&mut buf);
    set_cluster(3,0x123,&mut buf);
    assert_eq!(&buf[3..6],&[0xbc,0x3a,0x12]);
}

#[test]
fn reserved_entries() {
    let mut buf = vec![0u8;512];
    init(0xf9,&mut buf);
    assert_eq!(get_cluster(0,&buf),0xff9);
    assert_eq!(get_cluster(1,&buf),0xfff);
}
