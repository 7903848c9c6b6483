use anyhow::Result;
use serde::Deserialize;

use crate::util::http::HttpClient;

/// 調用 tpex openapi mopsfin_t187ap03_O API 後其回應的數據。
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct TpexCompany {
    #[serde(rename(deserialize = "SecuritiesCompanyCode"))]
    pub stock_symbol: String,
    #[serde(rename(deserialize = "CompanyName"))]
    pub name: String,
    #[serde(rename(deserialize = "Paidin.Capital.NTDollars"), default)]
    pub paid_in_capital: String,
}

/// 取得上櫃公司基本資料
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<TpexCompany>> {
    let url = format!("https://{}/openapi/v1/mopsfin_t187ap03_O", host);

    Ok(http.get_json::<Vec<TpexCompany>>(&url).await?.unwrap_or_default())
}
