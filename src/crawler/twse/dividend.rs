use anyhow::Result;
use serde::Deserialize;

use crate::util::http::HttpClient;

/// 調用 twse TWT48U_ALL API 後其回應的數據，日期為民國年格式。
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct TwseExDividend {
    #[serde(rename(deserialize = "Code"))]
    pub stock_symbol: String,
    /// 除權息日期（民國年，例 1130704）
    #[serde(rename(deserialize = "Date"))]
    pub date: String,
}

/// 取得上市公司除權息日期
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<TwseExDividend>> {
    let url = format!("https://{}/v1/exchangeReport/TWT48U_ALL", host);

    Ok(http
        .get_json::<Vec<TwseExDividend>>(&url)
        .await?
        .unwrap_or_default())
}
