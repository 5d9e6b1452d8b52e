// Library-level tests covering a whole session with an image file:
// format, add, flush, reload, extract, delete.

use msxdsk::bios::bpb::FloppyKind;
use msxdsk::fs::msxdos::{Disk,LoadPlan};
use msxdsk::fs::msxdos::display;

fn test_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn session_round_trip() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let img_path = dir.path().join("session.dsk");
    let img_path = img_path.to_str().expect("bad path");

    let mut disk = Disk::create(FloppyKind::F720);
    let data = test_payload(1500);
    disk.add_file("test.bas",&data,None).expect("add failed");
    disk.flush(img_path).expect("flush failed");
    assert_eq!(std::fs::metadata(img_path).expect("no image").len(),737280);

    let disk = Disk::from_file(img_path,LoadPlan::Full).expect("load failed");
    let finfo = disk.search("*.BAS").pop().expect("file lost");
    assert_eq!(finfo.full_name(),"TEST.BAS");
    assert_eq!(disk.extract(&finfo).expect("extract failed"),data);
    // 1500 bytes occupy 2 clusters of 1024
    assert_eq!(disk.free_bytes(),711*1024);

    let mut disk = Disk::from_file(img_path,LoadPlan::Full).expect("load failed");
    let finfo = disk.search("TEST.BAS").pop().expect("file lost");
    disk.delete(&finfo).expect("delete failed");
    disk.flush(img_path).expect("flush failed");

    let disk = Disk::from_file(img_path,LoadPlan::BootAndFat).expect("load failed");
    assert_eq!(disk.catalog().len(),0);
    assert_eq!(disk.free_bytes(),713*1024);
}

#[test]
fn flush_mirrors_the_fat() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let img_path = dir.path().join("mirror.dsk");
    let img_path = img_path.to_str().expect("bad path");
    let mut disk = Disk::create(FloppyKind::F720);
    disk.add_file("a.bin",&test_payload(5000),None).expect("add failed");
    disk.flush(img_path).expect("flush failed");
    let disk = Disk::from_file(img_path,LoadPlan::BootAndFat).expect("load failed");
    assert_eq!(disk.fat(),disk.fat_copy(1));
}

#[test]
fn update_through_the_file() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let img_path = dir.path().join("update.dsk");
    let img_path = img_path.to_str().expect("bad path");
    let mut disk = Disk::create(FloppyKind::F720);
    disk.add_file("keep.dat",&test_payload(100),None).expect("add failed");
    disk.add_file("prog.com",&test_payload(3000),None).expect("add failed");
    disk.flush(img_path).expect("flush failed");

    let mut disk = Disk::from_file_or_create(img_path).expect("load failed");
    let updated = disk.add_file("prog.com",&test_payload(400),None).expect("update failed");
    assert!(updated);
    disk.flush(img_path).expect("flush failed");

    let disk = Disk::from_file(img_path,LoadPlan::Full).expect("load failed");
    assert_eq!(disk.catalog().len(),2);
    let finfo = disk.search("PROG.COM").pop().expect("file lost");
    assert_eq!(disk.extract(&finfo).expect("extract failed"),test_payload(400));
    let keep = disk.search("KEEP.DAT").pop().expect("file lost");
    assert_eq!(disk.extract(&keep).expect("extract failed"),test_payload(100));
}

#[test]
fn metadata_plan_lists_without_data() {
    let dir = tempfile::tempdir().expect("no temp dir");
    let img_path = dir.path().join("meta.dsk");
    let img_path = img_path.to_str().expect("bad path");
    let mut disk = Disk::create(FloppyKind::F1440);
    disk.add_file("readme.txt",&test_payload(2000),None).expect("add failed");
    disk.flush(img_path).expect("flush failed");

    // only hand over the metadata regions
    let img = std::fs::read(img_path).expect("no image");
    let meta = &img[0..512+2*9*512+224*32];
    let disk = Disk::from_bytes(meta,LoadPlan::BootAndFat).expect("load failed");
    colored::control::set_override(false);
    let listing = display::directory_listing(&disk,"*.*").expect("listing failed");
    assert!(listing.contains("README.TXT"));
    assert!(listing.contains("2000"));
    // the same buffer is short of a full image
    assert!(Disk::from_bytes(meta,LoadPlan::Full).is_err());
}

#[test]
fn truncated_image_rejected() {
    let disk = Disk::create(FloppyKind::F720);
    let img = disk.image();
    assert!(Disk::from_bytes(&img[0..1024],LoadPlan::BootAndFat).is_err());
    assert!(Disk::from_bytes(&[0u8;256],LoadPlan::BootAndFat).is_err());
}
