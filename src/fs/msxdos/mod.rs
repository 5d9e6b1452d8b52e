//! ## MSX-DOS file system module
//!
//! This implements the FAT12 file system as MSX-DOS 1 uses it: a boot
//! sector, two FAT copies, a fixed root directory, and a cluster region.
//! There are no subdirectories.
//!
//! The `Disk` object owns the entire image as one byte buffer and carries
//! the decoded boot sector beside it.  All regions are accessed as slices
//! of the buffer at offsets computed from the BIOS parameter block.
//! Mutations are not permanent until `flush` writes the buffer back, at
//! which point the first FAT copy is mirrored into the others.

pub mod types;
pub mod pack;
pub mod directory;
pub mod display;

use std::path::Path;
use log::{debug,info};
use crate::bios::{bpb,fat};
use crate::{DYNERR,STDRESULT};
use bpb::{BootSector,FloppyKind};
use fat::FIRST_DATA_CLUSTER;
use directory::{FileInfo,Entry,DIR_ENTRY_SIZE};
pub use types::{Error,LoadPlan};

/// In-memory session with one disk image.
pub struct Disk {
    buf: Vec<u8>,
    boot: BootSector
}

impl Disk {
    /// Format a blank disk of the given capacity class.  The boot sector
    /// and the reserved FAT entries are installed, everything else is zero.
    pub fn create(kind: FloppyKind) -> Self {
        let boot = BootSector::create(kind);
        let mut buf = vec![0;boot.disk_size()];
        buf[0..512].copy_from_slice(&boot.to_bytes());
        for copy in 0..boot.num_fats() {
            let offset = boot.fat_offset() + copy*boot.fat_byte_len();
            fat::init(boot.media_byte(),&mut buf[offset..offset+boot.fat_byte_len()]);
        }
        Self { buf, boot }
    }
    /// Interpret a buffer as a disk image.  With `LoadPlan::BootAndFat` only
    /// the metadata regions need to be present, the cluster region is zeroed;
    /// suitable for listing and inspection but never for writing back.
    pub fn from_bytes(img: &[u8],plan: LoadPlan) -> Result<Self,DYNERR> {
        let boot = BootSector::from_bytes(img)?;
        let need = match plan {
            LoadPlan::Full => boot.disk_size(),
            LoadPlan::BootAndFat => boot.data_offset()
        };
        if img.len() < need {
            debug!("image holds {} bytes, need {}",img.len(),need);
            return Err(Box::new(Error::BadImage));
        }
        let mut buf = vec![0;boot.disk_size()];
        buf[0..need].copy_from_slice(&img[0..need]);
        info!("{} KB standard format image",boot.disk_size()/1024);
        Ok(Self { buf, boot })
    }
    pub fn from_file(path: &str,plan: LoadPlan) -> Result<Self,DYNERR> {
        let img = std::fs::read(path)?;
        Self::from_bytes(&img,plan)
    }
    /// Open an existing image, or format a fresh 720 KB disk if the file
    /// does not exist yet.  Used when adding files.
    pub fn from_file_or_create(path: &str) -> Result<Self,DYNERR> {
        match Path::new(path).exists() {
            true => Self::from_file(path,LoadPlan::Full),
            false => {
                info!("image `{}` not found, formatting 720 KB",path);
                Ok(Self::create(FloppyKind::F720))
            }
        }
    }
    /// Write the image back to the hosting file system.  The first FAT copy
    /// is mirrored into the remaining copies first.
    pub fn flush(&mut self,path: &str) -> STDRESULT {
        let fat_len = self.boot.fat_byte_len();
        let fat1 = self.boot.fat_offset();
        for copy in 1..self.boot.num_fats() {
            let offset = fat1 + copy*fat_len;
            self.buf.copy_within(fat1..fat1+fat_len,offset);
        }
        std::fs::write(path,&self.buf)?;
        Ok(())
    }
    pub fn boot(&self) -> &BootSector {
        &self.boot
    }
    pub fn image(&self) -> &[u8] {
        &self.buf
    }
    /// first FAT copy
    pub fn fat(&self) -> &[u8] {
        let offset = self.boot.fat_offset();
        &self.buf[offset..offset+self.boot.fat_byte_len()]
    }
    /// the other FAT copies, used to check the mirrors
    pub fn fat_copy(&self,copy: usize) -> &[u8] {
        let offset = self.boot.fat_offset() + copy*self.boot.fat_byte_len();
        &self.buf[offset..offset+self.boot.fat_byte_len()]
    }
    fn fat_mut(&mut self) -> &mut [u8] {
        let offset = self.boot.fat_offset();
        let len = self.boot.fat_byte_len();
        &mut self.buf[offset..offset+len]
    }
    fn entry_slice(&self,idx: usize) -> &[u8] {
        let offset = self.boot.root_dir_offset() + idx*DIR_ENTRY_SIZE;
        &self.buf[offset..offset+DIR_ENTRY_SIZE]
    }
    fn entry_slice_mut(&mut self,idx: usize) -> &mut [u8] {
        let offset = self.boot.root_dir_offset() + idx*DIR_ENTRY_SIZE;
        &mut self.buf[offset..offset+DIR_ENTRY_SIZE]
    }
    fn cluster_offset(&self,n: usize) -> usize {
        self.boot.data_offset() + (n - FIRST_DATA_CLUSTER)*self.boot.block_size()
    }
    fn cluster_limit(&self) -> usize {
        FIRST_DATA_CLUSTER + self.boot.cluster_count()
    }
    pub fn free_cluster_count(&self) -> usize {
        let fat = self.fat();
        let mut ans = 0;
        for n in FIRST_DATA_CLUSTER..self.cluster_limit() {
            if fat::is_free(n,fat) {
                ans += 1;
            }
        }
        ans
    }
    pub fn free_bytes(&self) -> usize {
        self.free_cluster_count() * self.boot.block_size()
    }
    /// All valid files in the root directory, in slot order.
    pub fn catalog(&self) -> Vec<FileInfo> {
        let mut ans = Vec::new();
        // sanity limit on the initial cluster when screening raw entries
        let limit = self.boot.tot_secs() / self.boot.secs_per_clus();
        for idx in 0..self.boot.root_dir_entries() {
            if let Some(finfo) = directory::parse_entry(self.entry_slice(idx),idx,limit,self.boot.disk_size()) {
                ans.push(finfo);
            }
        }
        ans
    }
    /// Files matching a DOS glob such as `*.*` or `FOO?.BAS`.
    pub fn search(&self,pattern: &str) -> Vec<FileInfo> {
        self.catalog().into_iter().filter(|f| f.matches(pattern)).collect()
    }
    fn find_free_slot(&self) -> Option<usize> {
        for idx in 0..self.boot.root_dir_entries() {
            if directory::is_slot_free(self.entry_slice(idx)) {
                return Some(idx);
            }
        }
        None
    }
    /// first free FAT entry, the earlier free-space check guarantees one
    fn first_free(&self) -> Result<usize,DYNERR> {
        let fat = self.fat();
        for n in FIRST_DATA_CLUSTER..self.cluster_limit() {
            if fat::is_free(n,fat) {
                return Ok(n);
            }
        }
        Err(Box::new(Error::Internal))
    }
    /// second free FAT entry in a fresh scan; the first one found is the
    /// cluster currently being filled, whose link is not yet written
    fn next_free(&self) -> Result<usize,DYNERR> {
        let fat = self.fat();
        let mut passed_current = false;
        for n in FIRST_DATA_CLUSTER..self.cluster_limit() {
            if fat::is_free(n,fat) {
                if passed_current {
                    return Ok(n);
                }
                passed_current = true;
            }
        }
        Err(Box::new(Error::Internal))
    }
    /// The cluster chain of a file in order, empty for zero-length files.
    /// The walk is bounded by the cluster count, a cycle or a link outside
    /// the data region is a bad FAT.
    pub fn chain(&self,finfo: &FileInfo) -> Result<Vec<u16>,DYNERR> {
        let mut ans = Vec::new();
        if finfo.cluster1 < FIRST_DATA_CLUSTER {
            return Ok(ans);
        }
        let mut curr = finfo.cluster1;
        for _i in 0..self.boot.cluster_count() {
            ans.push(curr as u16);
            let link = fat::get_cluster(curr,self.fat());
            if fat::is_last_value(link) {
                return Ok(ans);
            }
            curr = link as usize;
            if curr < FIRST_DATA_CLUSTER || curr >= self.cluster_limit() {
                debug!("chain of {} leaves the data region at {}",finfo.full_name(),curr);
                return Err(Box::new(Error::BadFat));
            }
        }
        debug!("chain of {} exceeds the cluster count",finfo.full_name());
        Err(Box::new(Error::BadFat))
    }
    /// The file's data, truncated to its recorded size.  A chain too short
    /// to cover the recorded size is a read mismatch.
    pub fn extract(&self,finfo: &FileInfo) -> Result<Vec<u8>,DYNERR> {
        if finfo.eof==0 || finfo.cluster1 < FIRST_DATA_CLUSTER {
            return Ok(Vec::new());
        }
        let bs = self.boot.block_size();
        let mut ans: Vec<u8> = Vec::new();
        for curr in self.chain(finfo)? {
            let offset = self.cluster_offset(curr as usize);
            ans.extend_from_slice(&self.buf[offset..offset+bs]);
        }
        if ans.len() < finfo.eof {
            debug!("{} bytes in chain, directory says {}",ans.len(),finfo.eof);
            return Err(Box::new(Error::ReadFault));
        }
        ans.truncate(finfo.eof);
        Ok(ans)
    }
    /// clear the FAT links of a chain, leaving the data bytes behind
    fn free_chain(&mut self,cluster1: usize) -> STDRESULT {
        if cluster1 < FIRST_DATA_CLUSTER {
            return Ok(());
        }
        let limit = self.cluster_limit();
        let mut curr = cluster1;
        for _i in 0..self.boot.cluster_count() {
            let prior = fat::clear_cluster(curr,self.fat_mut());
            if fat::is_last_value(prior) {
                return Ok(());
            }
            curr = prior as usize;
            if curr < FIRST_DATA_CLUSTER || curr >= limit {
                return Err(Box::new(Error::BadFat));
            }
        }
        Err(Box::new(Error::BadFat))
    }
    /// Delete a file: the directory slot becomes a tombstone and the
    /// cluster chain is freed.
    pub fn delete(&mut self,finfo: &FileInfo) -> STDRESULT {
        let cluster1 = finfo.cluster1;
        self.entry_slice_mut(finfo.idx)[0] = directory::DELETED;
        self.free_chain(cluster1)
    }
    /// Add a file, or update it if the name is already present.  An update
    /// tombstones the old entry and appends a new one in a slot that was
    /// free beforehand, it never rewrites in place.  Returns whether an
    /// existing file was updated.
    ///
    /// `time` is the modification timestamp, None means now.  The creation
    /// timestamp is only set for brand-new files.
    pub fn add_file(&mut self,name: &str,data: &[u8],time: Option<chrono::NaiveDateTime>) -> Result<bool,DYNERR> {
        if !pack::is_name_valid(name) {
            return Err(Box::new(Error::Syntax));
        }
        let (base,ext) = pack::string_to_file_name(name);
        let (base,ext) = pack::file_name_to_split_string(base,ext);
        let matches: Vec<FileInfo> = self.catalog().into_iter()
            .filter(|f| f.name==base && f.typ==ext).collect();
        let updated = !matches.is_empty();
        // the slot is selected before any tombstoning so it is never the
        // slot being vacated
        let slot = match self.find_free_slot() {
            Some(idx) => idx,
            None => return Err(Box::new(Error::DirectoryFull))
        };
        for old in &matches {
            self.delete(old)?;
        }
        if data.len() > self.free_bytes() {
            return Err(Box::new(Error::DiskFull));
        }
        let bs = self.boot.block_size();
        let mut cluster1 = 0;
        if !data.is_empty() {
            let blocks = (data.len() + bs - 1) / bs;
            let mut curr = self.first_free()?;
            cluster1 = curr;
            for b in 0..blocks {
                let chunk = &data[b*bs..data.len().min((b+1)*bs)];
                let offset = self.cluster_offset(curr);
                self.buf[offset..offset+chunk.len()].copy_from_slice(chunk);
                // the cluster may hold remnants of a deleted file
                self.buf[offset+chunk.len()..offset+bs].fill(0);
                if b+1 < blocks {
                    let next = self.next_free()?;
                    fat::set_cluster(curr,next as u16,self.fat_mut());
                    curr = next;
                } else {
                    fat::mark_last(curr,self.fat_mut());
                }
            }
        }
        let mut entry = Entry::create(name,time,!updated);
        entry.set_cluster(cluster1);
        entry.set_eof(data.len());
        self.entry_slice_mut(slot).copy_from_slice(&entry.to_bytes());
        Ok(updated)
    }
}

#[test]
fn blank_disk_accounting() {
    let disk = Disk::create(FloppyKind::F720);
    assert_eq!(disk.image().len(),737280);
    assert_eq!(disk.free_cluster_count(),713);
    assert_eq!(disk.free_bytes(),713*1024);
    assert_eq!(disk.catalog().len(),0);
}

#[test]
fn add_and_extract() {
    let mut disk = Disk::create(FloppyKind::F720);
    let data: Vec<u8> = (0..1500).map(|i| (i % 251) as u8).collect();
    let updated = disk.add_file("test.bas",&data,None).expect("add failed");
    assert!(!updated);
    assert_eq!(disk.free_bytes(),711*1024);
    let cat = disk.catalog();
    assert_eq!(cat.len(),1);
    assert_eq!(cat[0].full_name(),"TEST.BAS");
    assert_eq!(cat[0].eof,1500);
    let echo = disk.extract(&cat[0]).expect("extract failed");
    assert_eq!(echo,data);
}

#[test]
fn update_appends_fresh_slot() {
    let mut disk = Disk::create(FloppyKind::F720);
    disk.add_file("first.bin",&[1;100],None).expect("add failed");
    disk.add_file("test.bas",&[2;100],None).expect("add failed");
    let updated = disk.add_file("test.bas",&[3;200],None).expect("update failed");
    assert!(updated);
    let finfo = disk.search("TEST.BAS").pop().expect("file lost");
    // slot 1 is a tombstone, the update landed in slot 2
    assert_eq!(finfo.idx,2);
    assert_eq!(finfo.eof,200);
    assert_eq!(disk.extract(&finfo).expect("extract failed"),vec![3;200]);
    assert_eq!(disk.catalog().len(),2);
}

#[test]
fn delete_restores_space() {
    let mut disk = Disk::create(FloppyKind::F720);
    disk.add_file("test.bas",&[5;3000],None).expect("add failed");
    assert_eq!(disk.free_bytes(),710*1024);
    let finfo = disk.search("*.*").pop().expect("file lost");
    disk.delete(&finfo).expect("delete failed");
    assert_eq!(disk.free_bytes(),713*1024);
    assert_eq!(disk.catalog().len(),0);
}

#[test]
fn disk_full_rejected() {
    let mut disk = Disk::create(FloppyKind::F720);
    let big = vec![0u8;714*1024];
    let fat_before = disk.fat().to_vec();
    match disk.add_file("big.bin",&big,None) {
        Err(e) => assert_eq!(e.to_string(),"disk full"),
        Ok(_) => panic!("oversized file accepted")
    }
    assert_eq!(disk.fat(),&fat_before[..]);
    assert_eq!(disk.catalog().len(),0);
}

#[test]
fn directory_full_rejected() {
    let mut disk = Disk::create(FloppyKind::F720);
    for i in 0..112 {
        let name = format!("F{}.DAT",i);
        disk.add_file(&name,&[0;16],None).expect("add failed");
    }
    match disk.add_file("LAST.DAT",&[0;16],None) {
        Err(e) => assert_eq!(e.to_string(),"root directory full"),
        Ok(_) => panic!("113th entry accepted")
    }
}

#[test]
fn partial_cluster_tail_zeroed() {
    let mut disk = Disk::create(FloppyKind::F720);
    disk.add_file("old.bin",&[0xaa;2048],None).expect("add failed");
    let finfo = disk.search("OLD.BIN").pop().expect("file lost");
    disk.delete(&finfo).expect("delete failed");
    disk.add_file("new.bin",&[0x55;1500],None).expect("add failed");
    // 1500 bytes fill cluster 2 and 476 bytes of cluster 3, the rest of
    // cluster 3 must not leak the deleted file's bytes
    let img = disk.image();
    assert_eq!(&img[7168..8192],&[0x55;1024][..]);
    assert_eq!(&img[8192..8668],&[0x55;476][..]);
    assert!(img[8668..9216].iter().all(|b| *b==0));
}

#[test]
fn zero_length_file() {
    let mut disk = Disk::create(FloppyKind::F720);
    disk.add_file("empty.txt",&[],None).expect("add failed");
    assert_eq!(disk.free_bytes(),713*1024);
    let finfo = disk.search("EMPTY.TXT").pop().expect("file lost");
    assert_eq!(finfo.eof,0);
    assert_eq!(finfo.cluster1,0);
    assert_eq!(disk.chain(&finfo).expect("chain failed").len(),0);
    assert_eq!(disk.extract(&finfo).expect("extract failed").len(),0);
}

#[test]
fn image_round_trip() {
    let mut disk = Disk::create(FloppyKind::F1440);
    disk.add_file("hello.com",&[0xc9;700],None).expect("add failed");
    let echo = Disk::from_bytes(disk.image(),LoadPlan::Full).expect("reload failed");
    let finfo = echo.search("HELLO.COM").pop().expect("file lost");
    assert_eq!(echo.extract(&finfo).expect("extract failed"),vec![0xc9;700]);
}
