/// Enumerates the fatal conditions of the tool.  The `Display` trait prints
/// the user-facing message; the CLI maps each variant to its exit status.
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("bad .DSK image")]
    BadImage,
    #[error("file allocation table bad")]
    BadFat,
    #[error("file read mismatch")]
    ReadFault,
    #[error("invalid MSX-DOS file name")]
    Syntax,
    #[error("disk full")]
    DiskFull,
    #[error("root directory full")]
    DirectoryFull,
    #[error("internal error")]
    Internal
}

/// How much of the image file to materialize on load.  Listing and info
/// only need the boot sector, FAT, and root directory; commands that touch
/// file data need the whole image.
#[derive(PartialEq,Eq,Clone,Copy)]
pub enum LoadPlan {
    Full,
    BootAndFat
}
