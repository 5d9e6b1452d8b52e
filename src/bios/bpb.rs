//! ## BIOS Parameter Block Module
//!
//! This contains the boot sector and BIOS parameter block (BPB) used with
//! MSX-DOS 1 FAT12 volumes.  Every field is decoded and encoded explicitly at
//! its fixed byte offset, little-endian; the on-disk layout is never read
//! through a structure overlay.
//!
//! MEDIA DESCRIPTOR TABLE (3.5 inch subset)
//!
//! | FAT-ID | dir entries | secs/FAT | secs/track | heads | secs/cluster | total secs |
//! |--------|-------------|----------|------------|-------|--------------|------------|
//! | 0xF8   | 112         | 2        | 9          | 1     | 2            | 720        |
//! | 0xF9   | 112         | 3        | 9          | 2     | 2            | 1440       |
//! | 0xF0   | 224         | 9        | 18 or 36   | 2     | 1 or 2       | 2880/5760  |

use std::str::FromStr;
use log::debug;
use crate::DYNERR;

const JMP_BOOT: [u8;3] = [0xeb,0xfe,0x90];
const OEM_NAME: [u8;8] = *b"MSXDSK10";
/// Z80 `JR -2`, the MSX-DOS 1 entry point catches the CPU in a tight loop
/// since we do not install real boot code.
const Z80_SPIN: [u8;2] = [0x18,0xfe];
/// Size of the boot code region following the entry point at offset 0x20.
const BOOT_CODE_SIZE: usize = 482;

/// The four supported capacity classes for 3.5 inch diskettes, named by
/// their capacity in KB.
#[derive(PartialEq,Eq,Clone,Copy,Debug)]
pub enum FloppyKind {
    F360,
    F720,
    F1440,
    F2880
}

impl FromStr for FloppyKind {
    type Err = super::Error;
    fn from_str(s: &str) -> Result<Self,Self::Err> {
        match s {
            "360" => Ok(Self::F360),
            "720" => Ok(Self::F720),
            "1440" => Ok(Self::F1440),
            "2880" => Ok(Self::F2880),
            _ => Err(super::Error::BadFormatSize)
        }
    }
}

impl std::fmt::Display for FloppyKind {
    fn fmt(&self,f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::F360 => write!(f,"360"),
            Self::F720 => write!(f,"720"),
            Self::F1440 => write!(f,"1440"),
            Self::F2880 => write!(f,"2880")
        }
    }
}

/// This represents and manages the data in the boot sector.  One is created
/// at load or format time and is immutable thereafter.  All layout offsets
/// used by the file system layer are derived from these fields.
pub struct BootSector {
    jmp: [u8;3],
    oem: [u8;8],
    /// always 512 on the supported formats
    bytes_per_sec: u16,
    /// 1 or 2 logical sectors per cluster
    secs_per_clus: u8,
    /// sectors before the first FAT, 1 on MSX-DOS
    res_secs: u16,
    /// number of FAT copies, 2 on MSX-DOS
    num_fats: u8,
    /// entries in the root directory, 112 or 224
    root_ents: u16,
    /// total logical sectors in the volume
    tot_secs: u16,
    /// media descriptor, duplicated in the first FAT byte
    media: u8,
    /// logical sectors per FAT copy
    fat_secs: u16,
    secs_per_trk: u16,
    heads: u16,
    hidden_secs: u16,
    /// MSX-DOS 1 Z80 code entry point at offset 0x1e
    entry_point: [u8;2],
    /// whatever follows through the end of the sector
    boot_code: Vec<u8>
}

impl BootSector {
    /// Boot sector for a blank 720 KB diskette, the template all other
    /// capacity classes are derived from.
    fn template720() -> Self {
        Self {
            jmp: JMP_BOOT,
            oem: OEM_NAME,
            bytes_per_sec: 512,
            secs_per_clus: 2,
            res_secs: 1,
            num_fats: 2,
            root_ents: 112,
            tot_secs: 1440,
            media: 0xf9,
            fat_secs: 3,
            secs_per_trk: 9,
            heads: 2,
            hidden_secs: 0,
            entry_point: Z80_SPIN,
            boot_code: vec![0;BOOT_CODE_SIZE]
        }
    }
    /// Create a boot sector for the requested capacity class by seeding from
    /// the 720 KB template and overriding the fields that differ.
    pub fn create(kind: FloppyKind) -> Self {
        let mut boot = Self::template720();
        match kind {
            FloppyKind::F360 => {
                boot.tot_secs = 720;
                boot.media = 0xf8;
                boot.fat_secs = 2;
                boot.heads = 1;
            },
            FloppyKind::F720 => {},
            FloppyKind::F1440 => {
                boot.secs_per_clus = 1;
                boot.root_ents = 224;
                boot.tot_secs = 2880;
                boot.media = 0xf0;
                boot.fat_secs = 9;
                boot.secs_per_trk = 18;
            },
            FloppyKind::F2880 => {
                boot.root_ents = 224;
                boot.tot_secs = 5760;
                boot.media = 0xf0;
                boot.fat_secs = 9;
                boot.secs_per_trk = 36;
            }
        }
        boot
    }
    /// Decode the boot sector field by field.  The buffer must hold at least
    /// one full sector; the fields are sanity checked with `verify`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self,DYNERR> {
        if buf.len() < 512 {
            debug!("boot sector buffer too small ({})",buf.len());
            return Err(Box::new(super::Error::BadBootSector));
        }
        let boot = Self {
            jmp: buf[0..3].try_into()?,
            oem: buf[3..11].try_into()?,
            bytes_per_sec: u16::from_le_bytes([buf[0x0b],buf[0x0c]]),
            secs_per_clus: buf[0x0d],
            res_secs: u16::from_le_bytes([buf[0x0e],buf[0x0f]]),
            num_fats: buf[0x10],
            root_ents: u16::from_le_bytes([buf[0x11],buf[0x12]]),
            tot_secs: u16::from_le_bytes([buf[0x13],buf[0x14]]),
            media: buf[0x15],
            fat_secs: u16::from_le_bytes([buf[0x16],buf[0x17]]),
            secs_per_trk: u16::from_le_bytes([buf[0x18],buf[0x19]]),
            heads: u16::from_le_bytes([buf[0x1a],buf[0x1b]]),
            hidden_secs: u16::from_le_bytes([buf[0x1c],buf[0x1d]]),
            entry_point: buf[0x1e..0x20].try_into()?,
            boot_code: buf[0x20..512].to_vec()
        };
        if !boot.verify() {
            return Err(Box::new(super::Error::BadBootSector));
        }
        Ok(boot)
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ans: Vec<u8> = Vec::new();
        ans.extend_from_slice(&self.jmp);
        ans.extend_from_slice(&self.oem);
        ans.extend_from_slice(&u16::to_le_bytes(self.bytes_per_sec));
        ans.push(self.secs_per_clus);
        ans.extend_from_slice(&u16::to_le_bytes(self.res_secs));
        ans.push(self.num_fats);
        ans.extend_from_slice(&u16::to_le_bytes(self.root_ents));
        ans.extend_from_slice(&u16::to_le_bytes(self.tot_secs));
        ans.push(self.media);
        ans.extend_from_slice(&u16::to_le_bytes(self.fat_secs));
        ans.extend_from_slice(&u16::to_le_bytes(self.secs_per_trk));
        ans.extend_from_slice(&u16::to_le_bytes(self.heads));
        ans.extend_from_slice(&u16::to_le_bytes(self.hidden_secs));
        ans.extend_from_slice(&self.entry_point);
        ans.extend_from_slice(&self.boot_code);
        ans.resize(512,0);
        ans
    }
    /// Sanity checks for a freshly decoded boot sector, returns false if the
    /// layout cannot describe a FAT12 floppy.
    pub fn verify(&self) -> bool {
        let mut ans = true;
        if ![512,1024,2048,4096].contains(&self.bytes_per_sec) {
            debug!("invalid bytes per sector {}",self.bytes_per_sec);
            ans = false;
        }
        if ![1,2,4,8,16,32,64,128].contains(&self.secs_per_clus) {
            debug!("invalid sectors per cluster {}",self.secs_per_clus);
            ans = false;
        }
        if self.res_secs==0 {
            debug!("invalid count of reserved sectors 0");
            ans = false;
        }
        if self.num_fats==0 || self.fat_secs==0 {
            debug!("invalid FAT region {}x{}",self.num_fats,self.fat_secs);
            ans = false;
        }
        if self.tot_secs==0 {
            debug!("invalid sector count 0");
            ans = false;
        }
        if ans && self.avail_secs() <= 0 {
            debug!("data region came out 0 or negative");
            ans = false;
        }
        if ans {
            debug!("BPB counts: {}({}) FAT, {} tot, {} res, {} root",
                self.fat_secs,self.num_fats,self.tot_secs,self.res_secs,self.root_ents);
        }
        ans
    }
    /// OEM name at offset 3, reported as the volume name
    pub fn oem_name(&self) -> String {
        String::from_utf8_lossy(&self.oem).trim_end().to_string()
    }
    pub fn sec_size(&self) -> usize {
        self.bytes_per_sec as usize
    }
    /// bytes per cluster
    pub fn block_size(&self) -> usize {
        self.secs_per_clus as usize * self.bytes_per_sec as usize
    }
    pub fn secs_per_clus(&self) -> usize {
        self.secs_per_clus as usize
    }
    pub fn res_secs(&self) -> usize {
        self.res_secs as usize
    }
    pub fn num_fats(&self) -> usize {
        self.num_fats as usize
    }
    pub fn root_dir_entries(&self) -> usize {
        self.root_ents as usize
    }
    pub fn tot_secs(&self) -> usize {
        self.tot_secs as usize
    }
    pub fn media_byte(&self) -> u8 {
        self.media
    }
    /// sectors occupied by 1 FAT copy
    pub fn fat_secs(&self) -> usize {
        self.fat_secs as usize
    }
    pub fn secs_per_track(&self) -> usize {
        self.secs_per_trk as usize
    }
    pub fn heads(&self) -> usize {
        self.heads as usize
    }
    pub fn hidden_secs(&self) -> usize {
        self.hidden_secs as usize
    }
    /// total image size in bytes, `tot_secs * bytes_per_sec`
    pub fn disk_size(&self) -> usize {
        self.tot_secs as usize * self.bytes_per_sec as usize
    }
    /// byte offset of the first FAT copy
    pub fn fat_offset(&self) -> usize {
        self.res_secs as usize * self.bytes_per_sec as usize
    }
    /// length in bytes of one FAT copy
    pub fn fat_byte_len(&self) -> usize {
        self.fat_secs as usize * self.bytes_per_sec as usize
    }
    /// byte offset of the root directory, right after all FAT copies
    pub fn root_dir_offset(&self) -> usize {
        self.fat_offset() + self.num_fats as usize * self.fat_byte_len()
    }
    /// byte offset of the cluster region, right after the root directory
    pub fn data_offset(&self) -> usize {
        self.root_dir_offset() + self.root_ents as usize * 32
    }
    /// sectors left over for the cluster region, can come out negative on a
    /// corrupt BPB, hence the signed return
    fn avail_secs(&self) -> i64 {
        self.tot_secs as i64
            - self.res_secs as i64
            - self.num_fats as i64 * self.fat_secs as i64
            - (self.root_ents as i64 * 32) / self.bytes_per_sec as i64
    }
    /// count of clusters in the data region, a.k.a. the number of usable
    /// FAT entries starting from cluster 2
    pub fn cluster_count(&self) -> usize {
        (self.avail_secs().max(0) as usize) / self.secs_per_clus as usize
    }
}

#[test]
fn capacity_table() {
    let kinds = [FloppyKind::F360,FloppyKind::F720,FloppyKind::F1440,FloppyKind::F2880];
    let tot = [720,1440,2880,5760];
    let media = [0xf8,0xf9,0xf0,0xf0];
    let fat_secs = [2,3,9,9];
    let spc = [2,2,1,2];
    let root = [112,112,224,224];
    let spt = [9,9,18,36];
    let heads = [1,2,2,2];
    for i in 0..4 {
        let boot = BootSector::create(kinds[i]);
        assert_eq!(boot.tot_secs(),tot[i]);
        assert_eq!(boot.media_byte(),media[i]);
        assert_eq!(boot.fat_secs(),fat_secs[i]);
        assert_eq!(boot.secs_per_clus(),spc[i]);
        assert_eq!(boot.root_dir_entries(),root[i]);
        assert_eq!(boot.secs_per_track(),spt[i]);
        assert_eq!(boot.heads(),heads[i]);
        assert_eq!(boot.sec_size(),512);
    }
}

#[test]
fn boot_sector_round_trip() {
    let boot = BootSector::create(FloppyKind::F720);
    let buf = boot.to_bytes();
    assert_eq!(buf.len(),512);
    let echo = BootSector::from_bytes(&buf).expect("decode failed");
    assert_eq!(echo.tot_secs(),1440);
    assert_eq!(echo.media_byte(),0xf9);
    assert_eq!(echo.fat_secs(),3);
    assert_eq!(echo.root_dir_entries(),112);
    assert_eq!(echo.disk_size(),737280);
    assert_eq!(echo.fat_offset(),512);
    assert_eq!(echo.root_dir_offset(),512+2*3*512);
    assert_eq!(echo.data_offset(),512+2*3*512+112*32);
    assert_eq!(echo.cluster_count(),(1440-1-6-7)/2);
}

#[test]
fn reject_bad_size() {
    assert!(FloppyKind::from_str("1200").is_err());
    assert!(FloppyKind::from_str("720").is_ok());
}
