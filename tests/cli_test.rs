// Tests of the command line interface: subcommand flows and exit statuses.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

type DYNERR = Box<dyn std::error::Error>;

#[test]
fn create_image() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("new.dsk");
    let img = img.to_str().ok_or("bad path")?;
    Command::cargo_bin("msxdsk")?
        .args(["c","720",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("formatted 720 KB image"));
    assert_eq!(std::fs::metadata(img)?.len(),737280);
    Ok(())
}

#[test]
fn create_requires_both_args() -> Result<(),DYNERR> {
    Command::cargo_bin("msxdsk")?
        .args(["c","720"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn reject_bad_size() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("bad.dsk");
    let img = img.to_str().ok_or("bad path")?;
    Command::cargo_bin("msxdsk")?
        .args(["c","1200",img])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bad format size"));
    Ok(())
}

#[test]
fn missing_image_fails() -> Result<(),DYNERR> {
    Command::cargo_bin("msxdsk")?
        .args(["l","no_such_image.dsk"])
        .assert()
        .failure()
        .code(2);
    Ok(())
}

#[test]
fn add_list_extract_delete() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("work.dsk");
    let img = img.to_str().ok_or("bad path")?;
    let payload: Vec<u8> = (0..1500).map(|i| (i % 251) as u8).collect();
    let host_file = dir.path().join("test.bas");
    std::fs::write(&host_file,&payload)?;

    // `a` formats a fresh 720 KB image on demand
    Command::cargo_bin("msxdsk")?
        .args(["a",img,host_file.to_str().ok_or("bad path")?])
        .assert()
        .success()
        .stdout(predicate::str::contains("adding TEST.BAS"));

    Command::cargo_bin("msxdsk")?
        .args(["l",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEST.BAS")
            .and(predicate::str::contains("1500"))
            .and(predicate::str::contains("728064 bytes free")));

    let out_dir = tempfile::tempdir()?;
    Command::cargo_bin("msxdsk")?
        .args(["e",img,"*.BAS"])
        .current_dir(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("extracting TEST.BAS"));
    assert_eq!(std::fs::read(out_dir.path().join("TEST.BAS"))?,payload);

    Command::cargo_bin("msxdsk")?
        .args(["d",img,"TEST.BAS"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleting TEST.BAS"));

    Command::cargo_bin("msxdsk")?
        .args(["l",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("*** Disk is empty ***")
            .and(predicate::str::contains("730112 bytes free")));
    Ok(())
}

#[test]
fn update_existing_file() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("upd.dsk");
    let img = img.to_str().ok_or("bad path")?;
    let host_file = dir.path().join("prog.com");
    std::fs::write(&host_file,[1u8;100])?;
    let host = host_file.to_str().ok_or("bad path")?;
    Command::cargo_bin("msxdsk")?.args(["a",img,host]).assert().success();
    std::fs::write(&host_file,[2u8;200])?;
    Command::cargo_bin("msxdsk")?
        .args(["a",img,host])
        .assert()
        .success()
        .stdout(predicate::str::contains("updating PROG.COM"));
    Ok(())
}

#[test]
fn delete_defaults_to_everything() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("wipe.dsk");
    let img = img.to_str().ok_or("bad path")?;
    let one = dir.path().join("one.bas");
    let two = dir.path().join("two.com");
    std::fs::write(&one,[1u8;100])?;
    std::fs::write(&two,[2u8;100])?;
    Command::cargo_bin("msxdsk")?
        .args(["a",img,one.to_str().ok_or("bad path")?,two.to_str().ok_or("bad path")?])
        .assert().success();
    Command::cargo_bin("msxdsk")?
        .args(["d",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleting ONE.BAS")
            .and(predicate::str::contains("deleting TWO.COM")));
    Command::cargo_bin("msxdsk")?
        .args(["l",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("*** Disk is empty ***"));
    Ok(())
}

#[test]
fn info_panel() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("info.dsk");
    let img = img.to_str().ok_or("bad path")?;
    Command::cargo_bin("msxdsk")?.args(["c","1440",img]).assert().success();
    Command::cargo_bin("msxdsk")?
        .args(["i",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("Media descriptor     0xF0")
            .and(predicate::str::contains("Total sectors        2880"))
            .and(predicate::str::contains("FAT mirrors")));
    Ok(())
}

#[test]
fn chain_listing() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("chain.dsk");
    let img = img.to_str().ok_or("bad path")?;
    let host_file = dir.path().join("two.bin");
    std::fs::write(&host_file,[7u8;1500])?;
    Command::cargo_bin("msxdsk")?
        .args(["a",img,host_file.to_str().ok_or("bad path")?])
        .assert().success();
    Command::cargo_bin("msxdsk")?
        .args(["f",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("TWO.BIN")
            .and(predicate::str::contains("cluster")));
    Ok(())
}

/// hand-built ADVH image: header record, GAME.BIN over sectors 4-5,
/// terminator, patterned data
fn advh_image() -> Vec<u8> {
    let mut img = vec![0u8;16*512];
    img[512..516].copy_from_slice(b"ADVH");
    img[528..539].copy_from_slice(b"GAME    BIN");
    img[539..541].copy_from_slice(&u16::to_le_bytes(4));
    img[541..543].copy_from_slice(&u16::to_le_bytes(2));
    img[544] = 0xff;
    for i in 0..1024 {
        img[4*512+i] = (i % 253) as u8;
    }
    img
}

#[test]
fn advh_list_and_extract() -> Result<(),DYNERR> {
    let dir = tempfile::tempdir()?;
    let img = dir.path().join("advh.dsk");
    std::fs::write(&img,advh_image())?;
    let img = img.to_str().ok_or("bad path")?;
    Command::cargo_bin("msxdsk")?
        .args(["lh",img])
        .assert()
        .success()
        .stdout(predicate::str::contains("GAME.BIN")
            .and(predicate::str::contains("1024")));
    let out_dir = tempfile::tempdir()?;
    Command::cargo_bin("msxdsk")?
        .args(["eh",img,"GAME.BIN"])
        .current_dir(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("extracting GAME.BIN"));
    let data = std::fs::read(out_dir.path().join("GAME.BIN"))?;
    assert_eq!(data.len(),1024);
    assert_eq!(data[100],100);
    Ok(())
}

#[test]
fn boot_code_not_implemented() -> Result<(),DYNERR> {
    Command::cargo_bin("msxdsk")?
        .args(["o","whatever.dsk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not implemented yet"));
    Ok(())
}
