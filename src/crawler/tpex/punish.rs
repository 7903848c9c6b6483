use anyhow::Result;
use serde::Deserialize;

use crate::{crawler::PunishStock, util::datetime, util::http::HttpClient};

/// 調用 tpex tpex_disposal_information API 後其回應的數據。
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct TpexPunish {
    #[serde(rename(deserialize = "CompanyName"))]
    name: String,
    #[serde(rename(deserialize = "SecuritiesCompanyCode"))]
    stock_symbol: String,
    /// 處置日期（民國年）
    #[serde(rename(deserialize = "Date"))]
    date: String,
}

/// 取得上櫃處置有價證券資訊
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<PunishStock>> {
    let url = format!("https://{}/openapi/v1/tpex_disposal_information", host);
    let raw = http
        .get_json::<Vec<TpexPunish>>(&url)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_malformed_date_is_fatal() {
        let json = r#"[{"CompanyName":"測試","SecuritiesCompanyCode":"5483","Date":"下週一"}]"#;
        let raw: Vec<TpexPunish> = serde_json::from_str(json).unwrap();

        assert!(datetime::roc_to_western_date(&raw[0].date).is_err());
    }
}
