//! Packed date/time codec used on the wire by MDTM and MLSD.
//!
//! Dates and times travel as a 14-digit `YYYYMMDDHHMMSS` string but are
//! stored in the FAT-style packed form: date is `year-1980:7 | month:4 |
//! day:5`, time is `hour:5 | minute:6 | second/2:5`.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};
use filetime::FileTime;
use std::io;
use std::time::SystemTime;

/// Render a packed (date, time) pair as `YYYYMMDDHHMMSS`.
pub fn make_date_time_str(date: u16, time: u16) -> String {
    let year = ((date >> 9) & 0x7f) + 1980;
    let month = (date >> 5) & 0x0f;
    let day = date & 0x1f;
    let hour = (time >> 11) & 0x1f;
    let minute = (time >> 5) & 0x3f;
    let second = (time & 0x1f) << 1;
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        year, month, day, hour, minute, second
    )
}

/// Recognize the MDTM set form: 14 digits, then a space, then a file name.
///
/// Returns the packed (date, time) pair and the number of bytes consumed
/// (digits plus the separating space), or `None` when the parameter does
/// not start with a well-formed date/time.
pub fn parse_date_time(params: &str) -> Option<((u16, u16), usize)> {
    let bytes = params.as_bytes();
    if bytes.len() < 15 || bytes[14] != b' ' {
        return None;
    }
    if !bytes[..14].iter().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |from: usize, to: usize| -> u16 { params[from..to].parse().unwrap_or(0) };
    let date = (field(0, 4).saturating_sub(1980) << 9) | (field(4, 6) << 5) | field(6, 8);
    let time = (field(8, 10) << 11) | (field(10, 12) << 5) | (field(12, 14) >> 1);
    Some(((date, time), 15))
}

/// Pack a filesystem modification timestamp, local time.
pub fn pack_system_time(t: SystemTime) -> (u16, u16) {
    let dt: DateTime<Local> = t.into();
    let year = (dt.year() - 1980).clamp(0, 0x7f) as u16;
    let date = (year << 9) | ((dt.month() as u16) << 5) | dt.day() as u16;
    let time =
        ((dt.hour() as u16) << 11) | ((dt.minute() as u16) << 5) | (dt.second() as u16 >> 1);
    (date, time)
}

/// Turn a packed pair back into a [`FileTime`] suitable for `set_file_mtime`.
///
/// Fails when the packed fields do not name a real calendar date.
pub fn unpack_to_file_time(date: u16, time: u16) -> io::Result<FileTime> {
    let year = (((date >> 9) & 0x7f) + 1980) as i32;
    let month = u32::from((date >> 5) & 0x0f);
    let day = u32::from(date & 0x1f);
    let hour = u32::from((time >> 11) & 0x1f);
    let minute = u32::from((time >> 5) & 0x3f);
    let second = u32::from((time & 0x1f) << 1);

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid date/time"))?;
    let local = Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "ambiguous local time"))?;
    Ok(FileTime::from_unix_time(local.timestamp(), 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_packed_fields() {
        // 2020-01-02 03:04:04 -> year-1980 = 40
        let date = (40 << 9) | (1 << 5) | 2;
        let time = (3 << 11) | (4 << 5) | 2;
        assert_eq!(make_date_time_str(date, time), "20200102030404");
    }

    #[test]
    fn parses_mdtm_set_form() {
        let ((date, time), consumed) = parse_date_time("20200102030405 file.txt").unwrap();
        assert_eq!(consumed, 15);
        assert_eq!(date, (40 << 9) | (1 << 5) | 2);
        // Seconds are stored halved, so 05 becomes 2.
        assert_eq!(time, (3 << 11) | (4 << 5) | 2);
    }

    #[test]
    fn set_form_needs_fourteen_digits_and_a_space() {
        assert!(parse_date_time("file.txt").is_none());
        assert!(parse_date_time("2020010203040 file.txt").is_none());
        assert!(parse_date_time("2020010203040x file.txt").is_none());
        assert!(parse_date_time("20200102030405file.txt").is_none());
    }

    #[test]
    fn render_after_parse_loses_only_the_odd_second() {
        let ((date, time), _) = parse_date_time("19991231235959 x").unwrap();
        assert_eq!(make_date_time_str(date, time), "19991231235958");
    }

    #[test]
    fn unpack_rejects_nonsense_dates() {
        // Month 15 is representable in 4 bits but is not a date.
        let date = (10 << 9) | (15 << 5) | 1;
        assert!(unpack_to_file_time(date, 0).is_err());
    }
}
