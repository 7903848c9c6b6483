use anyhow::Result;
use serde::Deserialize;

use crate::{crawler::PunishStock, util::datetime, util::http::HttpClient};

/// 調用 twse announcement/punish API 後其回應的數據。
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct TwsePunish {
    #[serde(rename(deserialize = "Name"))]
    name: String,
    #[serde(rename(deserialize = "Code"))]
    stock_symbol: String,
    /// 處置日期（民國年）
    #[serde(rename(deserialize = "Date"))]
    date: String,
}

/// 取得集中市場公布處置股票。
/// 民國日期轉換失敗代表上游格式變動，直接把錯誤往上傳。
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<PunishStock>> {
    let url = format!("https://{}/v1/announcement/punish", host);
    let raw = http
        .get_json::<Vec<TwsePunish>>(&url)
        .await?
        .unwrap_or_default();

    raw.into_iter()
        .map(|p| {
            Ok(PunishStock {
                name: p.name,
                id: p.stock_symbol,
                date: datetime::roc_to_western_date(&p.date)?,
            })
        })
        .collect()
}
