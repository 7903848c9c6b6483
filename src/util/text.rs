use std::{collections::HashSet, str::FromStr};

use anyhow::{anyhow, Result};

const NUMBER_ESCAPE_CHAR: &[char] = &['元', '%', ',', ' ', '"', '\n'];

/// Parses an `i64` value from a given string, tolerating thousands
/// separators and the usual decoration found in upstream cells.
pub fn parse_i64(s: &str, escape_chars: Option<Vec<char>>) -> Result<i64> {
    let cleaned = clean_escape_chars(s, escape_chars);
    i64::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as i64 because: {:?}", cleaned, why))
}

/// 將字串轉成 f64，解析失敗時回傳 0.0。
///
/// 上游的百分比欄位常出現 `N/A` 或空字串，這類值視為 0，不作為錯誤。
pub fn str_to_float(s: &str) -> f64 {
    let cleaned = clean_escape_chars(s, None);
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// 第二個儲存格必須是純數字（去除千分位逗號後）才視為資料列，
/// 其餘列是表頭或裝飾列。
pub fn is_digit_cell(s: &str) -> bool {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    !cleaned.is_empty() && cleaned.chars().all(|c| c.is_ascii_digit())
}

/// Removes a set of escape characters from a given string.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("1,234", None).unwrap(), 1_234);
        assert_eq!(parse_i64("21,500,000,000", None).unwrap(), 21_500_000_000);
        assert!(parse_i64("n/a", None).is_err());
    }

    #[test]
    fn test_str_to_float() {
        assert_eq!(str_to_float("12.5"), 12.5);
        assert_eq!(str_to_float("12.5%"), 12.5);
        assert_eq!(str_to_float("1,234.5"), 1_234.5);
        assert_eq!(str_to_float("N/A"), 0.0);
        assert_eq!(str_to_float(""), 0.0);
    }

    #[test]
    fn test_is_digit_cell() {
        assert!(is_digit_cell("1,234"));
        assert!(is_digit_cell(" 5678 "));
        assert!(!is_digit_cell("買進"));
        assert!(!is_digit_cell("12.5"));
        assert!(!is_digit_cell(""));
    }
}
