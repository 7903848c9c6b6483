use anyhow::Result;
use serde::Deserialize;

use crate::util::http::HttpClient;

/// 調用 twse opendata t187ap03_L API 後其回應的數據。
/// 上游欄位是中文名稱，透過 rename 集中在這裡對應一次。
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct TwseCompany {
    #[serde(rename(deserialize = "公司代號"))]
    pub stock_symbol: String,
    #[serde(rename(deserialize = "公司簡稱"))]
    pub name: String,
    #[serde(rename(deserialize = "實收資本額"), default)]
    pub paid_in_capital: String,
}

/// 取得上市公司基本資料
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<TwseCompany>> {
    let url = format!("https://{}/v1/opendata/t187ap03_L", host);

    Ok(http.get_json::<Vec<TwseCompany>>(&url).await?.unwrap_or_default())
}
