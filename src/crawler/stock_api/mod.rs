use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util::http::HttpClient;

/// 股票基本資料。
///
/// 欄位名稱跟上游 JSON 一致，序列化後可直接進快取再還原。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// 股票代號
    pub id: String,
    /// 股票名稱
    pub name: String,
}

/// 個股單日歷史交易資料。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTrade {
    /// 交易序號
    pub id: i64,
    /// 日期
    pub date: NaiveDate,
    /// 股票代號
    pub stock_id: String,
    /// 總成交量
    pub total_volume: i64,
    /// 總成交值
    pub total_value: i64,
    /// 開盤價
    pub open_price: f64,
    /// 最高價
    pub high_price: f64,
    /// 最低價
    pub low_price: f64,
    /// 收盤價
    pub close_price: f64,
}

/// 取得全部上市上櫃股票的代號與名稱
pub async fn visit_stocks(http: &HttpClient, base: &str) -> Result<Vec<Stock>> {
    let url = format!("{}/stocks", base);

    Ok(http.get_json::<Vec<Stock>>(&url).await?.unwrap_or_default())
}

/// 取得個股最近的歷史交易資料，由新到舊最多 `limit` 筆。
///
/// 上游不一定理會 limit 參數，回來後在本地再截一次。
pub async fn visit_history_trades(
    http: &HttpClient,
    base: &str,
    stock_id: &str,
    limit: usize,
) -> Result<Vec<HistoryTrade>> {
    let url = format!("{}/history_trades/{}?limit={}", base, stock_id, limit);
    let mut trades = http
        .get_json::<Vec<HistoryTrade>>(&url)
        .await?
        .unwrap_or_default();
    trades.truncate(limit);

    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_stock() {
        let json = r#"[{"id":"2330","name":"台積電"},{"id":"5483","name":"中美晶"}]"#;
        let stocks: Vec<Stock> = serde_json::from_str(json).unwrap();

        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].id, "2330");
        assert_eq!(stocks[1].name, "中美晶");
    }

    #[test]
    fn test_deserialize_history_trade() {
        let json = r#"[{
            "id": 123456,
            "date": "2023-09-22",
            "stock_id": "2330",
            "total_volume": 33122715,
            "total_value": 17023231345,
            "open_price": 514.0,
            "high_price": 519.0,
            "low_price": 512.0,
            "close_price": 516.0
        }]"#;
        let trades: Vec<HistoryTrade> = serde_json::from_str(json).unwrap();

        assert_eq!(trades[0].date, NaiveDate::from_ymd_opt(2023, 9, 22).unwrap());
        assert_eq!(trades[0].stock_id, "2330");
        assert_eq!(trades[0].total_volume, 33_122_715);
        assert_eq!(trades[0].close_price, 516.0);
    }
}
