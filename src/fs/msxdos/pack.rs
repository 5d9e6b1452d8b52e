//! ### MSX-DOS Packing Module
//!
//! Functions to help pack or unpack DOS dates, times, and 8.3 filenames.

use chrono::{Datelike,Timelike};

/// Characters forbidden from file names
pub const INVALID_CHARS: &str = "\"*+,/:;<=>?[\\]|";

/// pack the date into the DOS format (day=bits 0-4, month=bits 5-8,
/// year-1980=bits 9-15), if the year is out of range it is pegged to the
/// nearest representable date.
pub fn pack_date(time: Option<chrono::NaiveDateTime>) -> [u8;2] {
    let now = match time {
        Some(t) => t,
        _ => chrono::Local::now().naive_local()
    };
    let year = match now.year() {
        y if y < 1980 => {
            log::warn!("date prior to reference date, pegging to reference date");
            1980
        },
        y if y > 2107 => {
            log::warn!("date is pegged to maximum of 2107");
            2107
        },
        y => y
    };
    let ans16 = now.day() as u16 + ((now.month() as u16) << 5) + ((year as u16 - 1980) << 9);
    u16::to_le_bytes(ans16)
}

/// pack the time into the DOS format (seconds/2=bits 0-4, minutes=bits 5-10,
/// hours=bits 11-15)
pub fn pack_time(time: Option<chrono::NaiveDateTime>) -> [u8;2] {
    let now = match time {
        Some(t) => t,
        _ => chrono::Local::now().naive_local()
    };
    let ans16 = (now.second() as u16) / 2 + ((now.minute() as u16) << 5) + ((now.hour() as u16) << 11);
    u16::to_le_bytes(ans16)
}

pub fn unpack_date(dos_date: [u8;2]) -> Option<chrono::NaiveDate> {
    if dos_date==[0,0] {
        return None;
    }
    let date16 = u16::from_le_bytes(dos_date);
    let year = 1980 + (date16 >> 9) as i32;
    let month = ((date16 & 0b0000_0001_1110_0000) >> 5) as u32;
    let day = (date16 & 0b1_1111) as u32;
    chrono::NaiveDate::from_ymd_opt(year, month, day)
}

pub fn unpack_time(dos_time: [u8;2]) -> Option<chrono::NaiveTime> {
    let time16 = u16::from_le_bytes(dos_time);
    let hour = (time16 >> 11) as u32;
    let min = ((time16 & 0b0000_0111_1110_0000) >> 5) as u32;
    let sec2 = (time16 & 0b1_1111) as u32;
    chrono::NaiveTime::from_hms_opt(hour, min, sec2*2)
}

/// Accepts lower case, case is raised by `string_to_file_name`.
/// MSX-DOS 1 has no subdirectories so there is no path form to worry about.
pub fn is_name_valid(s: &str) -> bool {
    let it: Vec<&str> = s.split('.').collect();
    if it.len()>2 {
        return false;
    }
    let base = it[0];
    let ext = match it.len() {
        1 => "",
        _ => it[1]
    };
    for char in [base,ext].concat().chars() {
        if !char.is_ascii() || INVALID_CHARS.contains(char) || char.is_ascii_control() {
            log::debug!("bad file name character `{}` (codepoint {})",char,char as u32);
            return false;
        }
    }
    if base.len()<1 || base.len()>8 {
        log::info!("base name length {} out of range",base.len());
        return false;
    }
    if ext.len()>3 {
        log::info!("extension name too long, max 3");
        return false;
    }
    true
}

/// Convert string to name and extension bytes for the directory, splitting
/// at the first dot, raising case, and padding with spaces.
/// Assumes the string contains a valid filename.
pub fn string_to_file_name(s: &str) -> ([u8;8],[u8;3]) {
    let mut ans: ([u8;8],[u8;3]) = ([0x20;8],[0x20;3]);
    let upper = s.to_uppercase();
    let it: Vec<&str> = upper.splitn(2,'.').collect();
    let base = it[0].as_bytes();
    let ext = match it.len() {
        1 => &[] as &[u8],
        _ => it[1].as_bytes()
    };
    for i in 0..base.len().min(8) {
        ans.0[i] = base[i];
    }
    for i in 0..ext.len().min(3) {
        ans.1[i] = ext[i];
    }
    ans
}

/// Put the filename bytes as a split ASCII string (name,extension),
/// trailing spaces trimmed.
pub fn file_name_to_split_string(name: [u8;8],ext: [u8;3]) -> (String,String) {
    (
        String::from_utf8_lossy(&name).trim_end().to_string(),
        String::from_utf8_lossy(&ext).trim_end().to_string()
    )
}

#[test]
fn date_round_trip() {
    let date = chrono::NaiveDate::from_ymd_opt(1998,3,14).unwrap();
    let time = chrono::NaiveTime::from_hms_opt(13,45,58).unwrap();
    let stamp = chrono::NaiveDateTime::new(date,time);
    assert_eq!(unpack_date(pack_date(Some(stamp))),Some(date));
    assert_eq!(unpack_time(pack_time(Some(stamp))),chrono::NaiveTime::from_hms_opt(13,45,58));
}

#[test]
fn name_packing() {
    assert_eq!(string_to_file_name("test.bas"),(*b"TEST    ",*b"BAS"));
    assert_eq!(string_to_file_name("COMMAND.COM"),(*b"COMMAND ",*b"COM"));
    assert_eq!(string_to_file_name("noext"),(*b"NOEXT   ",*b"   "));
    let (name,ext) = string_to_file_name("autoexec.bat");
    assert_eq!(file_name_to_split_string(name,ext),("AUTOEXEC".to_string(),"BAT".to_string()));
}

#[test]
fn name_validity() {
    assert!(is_name_valid("TEST.BAS"));
    assert!(is_name_valid("lower.txt"));
    assert!(!is_name_valid("TOOLONGNAME.BAS"));
    assert!(!is_name_valid("A.LONG"));
    assert!(!is_name_valid("A.B.C"));
    assert!(!is_name_valid("BAD?.TXT"));
}
