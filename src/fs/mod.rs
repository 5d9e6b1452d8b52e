//! # File system module
//!
//! The file system layer imposes structure on a buffered disk image.
//! `msxdos` is the FAT12 engine used by the standard MSX-DOS 1 format,
//! `advh` reads the legacy flat-table format.

pub mod msxdos;
pub mod advh;
