//! # BIOS Module
//!
//! Byte-level structures shared by the file system layer:
//! the boot sector with its BIOS parameter block, and the FAT entry codec.

pub mod bpb;
pub mod fat;

#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("bad format size, only 360, 720, 1440, 2880 are supported")]
    BadFormatSize,
    #[error("bad .DSK image")]
    BadBootSector
}
