use anyhow::Result;
use serde::Deserialize;

use crate::util::http::HttpClient;

/// 調用 tpex tpex_exright_prepost API 後其回應的數據，日期為民國年格式。
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct TpexExDividend {
    #[serde(rename(deserialize = "SecuritiesCompanyCode"))]
    pub stock_symbol: String,
    /// 除權息日期（民國年）
    #[serde(rename(deserialize = "ExRrightsExDividendDate"))]
    pub date: String,
}

/// 取得上櫃公司除權息日期
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<TpexExDividend>> {
    let url = format!("https://{}/openapi/v1/tpex_exright_prepost", host);

    Ok(http
        .get_json::<Vec<TpexExDividend>>(&url)
        .await?
        .unwrap_or_default())
}
