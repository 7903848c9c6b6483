use chrono::NaiveDate;

/// 交易所
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockExchange {
    /// 臺灣證券交易所 1
    TWSE,
    /// 證券櫃檯買賣市場 2
    TPEx,
}

impl StockExchange {
    pub fn serial_number(&self) -> i32 {
        match self {
            StockExchange::TWSE => 1,
            StockExchange::TPEx => 2,
        }
    }

    pub fn iterator() -> impl Iterator<Item = Self> {
        [Self::TWSE, Self::TPEx].iter().copied()
    }
}

/// 主力進出的回看區間，序號為富邦網址使用的代碼。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum RecentDay {
    /// 近一日 1
    One = 1,
    /// 近五日 2
    Five = 2,
    /// 近十日 3
    Ten = 3,
    /// 近二十日 4
    Twenty = 4,
    /// 近六十日 5
    Sixty = 5,
    /// 近一百二十日 6
    OneHundredTwenty = 6,
    /// 近二百四十日 7
    TwoHundredForty = 7,
}

impl RecentDay {
    pub fn serial(&self) -> i32 {
        *self as i32
    }

    /// 回看的交易日數
    pub fn days(&self) -> u32 {
        match self {
            RecentDay::One => 1,
            RecentDay::Five => 5,
            RecentDay::Ten => 10,
            RecentDay::Twenty => 20,
            RecentDay::Sixty => 60,
            RecentDay::OneHundredTwenty => 120,
            RecentDay::TwoHundredForty => 240,
        }
    }

    pub fn iterator() -> impl Iterator<Item = Self> {
        [
            Self::One,
            Self::Five,
            Self::Ten,
            Self::Twenty,
            Self::Sixty,
            Self::OneHundredTwenty,
            Self::TwoHundredForty,
        ]
        .iter()
        .copied()
    }
}

/// 主力進出查詢範圍：指定單一交易日，或指定回看區間。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MainForceRange {
    /// 指定日期（富邦的 e/f 參數）
    Date(NaiveDate),
    /// 指定回看區間
    Recent(RecentDay),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_day_serial() {
        assert_eq!(RecentDay::One.serial(), 1);
        assert_eq!(RecentDay::TwoHundredForty.serial(), 7);
        assert_eq!(RecentDay::iterator().count(), 7);
    }

    #[test]
    fn test_recent_day_days() {
        let days: Vec<u32> = RecentDay::iterator().map(|d| d.days()).collect();
        assert_eq!(days, vec![1, 5, 10, 20, 60, 120, 240]);
    }
}
