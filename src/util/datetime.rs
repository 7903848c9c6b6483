use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Convert ROC year to Gregorian year.
pub fn to_gregorian_year(year: i32) -> i32 {
    year + 1911
}

/// 將固定寬度的民國日期字串轉成西元日期。
///
/// 格式為 `YYYMMDD`，前三碼民國年、次兩碼月份、其餘為日，例如
/// `"1100101"` 代表 2021-01-01。格式錯誤視為上游格式變動，直接回傳錯誤
/// 而不是靜默吸收。
pub fn roc_to_western_date(roc_date_str: &str) -> Result<NaiveDate> {
    let year = roc_date_str
        .get(..3)
        .ok_or_else(|| anyhow!("ROC date '{}' is too short", roc_date_str))?;
    let month = roc_date_str
        .get(3..5)
        .ok_or_else(|| anyhow!("ROC date '{}' is too short", roc_date_str))?;
    let day = roc_date_str
        .get(5..)
        .ok_or_else(|| anyhow!("ROC date '{}' is too short", roc_date_str))?;

    let year = year
        .parse::<i32>()
        .map_err(|why| anyhow!("Failed to parse ROC year '{}' because {:?}", year, why))?;
    let month = month
        .parse::<u32>()
        .map_err(|why| anyhow!("Failed to parse ROC month '{}' because {:?}", month, why))?;
    let day = day
        .parse::<u32>()
        .map_err(|why| anyhow!("Failed to parse ROC day '{}' because {:?}", day, why))?;

    NaiveDate::from_ymd_opt(to_gregorian_year(year), month, day)
        .ok_or_else(|| anyhow!("'{}' is not a valid ROC date", roc_date_str))
}

/// Parse a slash- or dash-separated ROC date string (e.g. `113/05/20`)
/// and return it as a NaiveDate in the Gregorian calendar.
pub fn parse_taiwan_date(date_str: &str) -> Option<NaiveDate> {
    let split_date: Vec<&str> = date_str.split(['/', '-']).collect();
    if split_date.len() != 3 {
        return None;
    }

    let year = to_gregorian_year(split_date[0].parse::<i32>().ok()?);
    let month = split_date[1].parse::<u32>().ok()?;
    let day = split_date[2].parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_to_western_date() {
        assert_eq!(
            roc_to_western_date("1100101").unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert_eq!(
            roc_to_western_date("1131231").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_roc_to_western_date_malformed() {
        assert!(roc_to_western_date("").is_err());
        assert!(roc_to_western_date("113").is_err());
        assert!(roc_to_western_date("1131301").is_err());
        assert!(roc_to_western_date("113/1/1").is_err());
        assert!(roc_to_western_date("民國113年").is_err());
    }

    #[test]
    fn test_parse_taiwan_date() {
        assert_eq!(
            parse_taiwan_date("113/05/20"),
            NaiveDate::from_ymd_opt(2024, 5, 20)
        );
        assert_eq!(
            parse_taiwan_date("110-1-1"),
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert_eq!(parse_taiwan_date("113/05"), None);
        assert_eq!(parse_taiwan_date("abc/de/fg"), None);
    }
}
