//! # `msxdsk` main library
//!
//! This library manipulates MSX-DOS 1 diskette images (`.DSK` files) for the
//! 3.5 inch 360/720/1440/2880 KB floppy formats.  The whole image is held in
//! one owned byte buffer; the boot sector, FAT, root directory, and cluster
//! region are views into that buffer computed from the BIOS parameter block.
//!
//! ## Architecture
//!
//! Disk operations are built around two layers:
//! * `bios` decodes/encodes the on-disk structures: the boot sector with its
//!   BIOS parameter block, and the 12-bit FAT entry packing
//! * `fs` imposes the file system on the buffered image: `fs::msxdos` is the
//!   FAT12 engine (MSX-DOS 1 is root-only FAT12), `fs::advh` is a read-only
//!   reader for the legacy ADVH flat-table format
//!
//! When a `fs::msxdos::Disk` is created it owns the image buffer.  Any changes
//! are not permanent until the buffer is flushed back to the hosting file
//! system, at which point the second FAT copy is synchronized with the first.
//!
//! ## CLI
//!
//! The `commands` module backs the binary's subcommands, which keep the
//! original single-letter command set (`c`, `l`, `e`, `a`, `d`, `i`, `f`),
//! with an `h` suffix selecting ADVH mode where supported.

pub mod bios;
pub mod fs;
pub mod commands;

pub type DYNERR = Box<dyn std::error::Error>;
pub type STDRESULT = Result<(),Box<dyn std::error::Error>>;
