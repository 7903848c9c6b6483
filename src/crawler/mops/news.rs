use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::util::{datetime, http::element, http::HttpClient};

/// 上市上櫃公司重大訊息。
///
/// 觀測站的列表頁只有代號、名稱、主旨與發布時間，
/// 其餘欄位要點進個別公告才有，列表解析一律填 `None`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    /// 股票代號
    pub stock_id: String,
    /// 股票名稱
    pub stock_name: String,
    /// 主旨
    pub title: String,
    /// 發布時間
    pub date_time: NaiveDateTime,
    /// 符合條款
    pub terms_complied: Option<String>,
    /// 事實發生日
    pub date_of_occurrence: Option<NaiveDate>,
    /// 說明
    pub explanation: Option<String>,
}

/// 取得當日重大訊息列表
pub async fn visit(http: &HttpClient, host: &str) -> Result<Vec<News>> {
    let url = format!("https://{}/mops/web/t05sr01_1", host);
    let text = http.get_text(&url).await?;

    Ok(parse(&text))
}

/// 資料列以 even/odd 交錯上色，兩種 class 都要選；
/// 第三格是民國年日期（113/08/12），與第四格的時分秒合成發布時間。
pub(crate) fn parse(text: &str) -> Vec<News> {
    let document = Html::parse_document(text);
    let tr = Selector::parse("tr.even, tr.odd").expect("tr.even, tr.odd is a valid selector");

    document
        .select(&tr)
        .filter_map(|row| {
            let cells = element::cells(&row);
            if cells.len() < 5 {
                return None;
            }

            let date = datetime::parse_taiwan_date(element::text_of(&cells[2]).trim())?;
            let time =
                NaiveTime::parse_from_str(element::text_of(&cells[3]).trim(), "%H:%M:%S").ok()?;

            Some(News {
                stock_id: element::text_of(&cells[0]).trim().to_string(),
                stock_name: element::text_of(&cells[1]).trim().to_string(),
                title: element::text_of(&cells[4]).trim().to_string(),
                date_time: NaiveDateTime::new(date, time),
                terms_complied: None,
                date_of_occurrence: None,
                explanation: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let html = r#"
<table>
  <tr><td>公司代號</td><td>公司簡稱</td><td>發言日期</td><td>發言時間</td><td>主旨</td></tr>
  <tr class="even">
    <td>2330</td><td>台積電</td><td>113/08/12</td><td>17:30:02</td>
    <td>本公司代重要子公司TSMC Global Ltd.公告發行無擔保公司債</td>
  </tr>
  <tr class="odd">
    <td>5483</td><td>中美晶</td><td>113/08/12</td><td>18:01:45</td>
    <td>公告本公司董事會決議股利分派</td>
  </tr>
</table>"#;

        let news = parse(html);
        assert_eq!(news.len(), 2);

        assert_eq!(news[0].stock_id, "2330");
        assert_eq!(news[0].stock_name, "台積電");
        assert_eq!(
            news[0].date_time,
            NaiveDate::from_ymd_opt(2024, 8, 12)
                .unwrap()
                .and_hms_opt(17, 30, 2)
                .unwrap()
        );
        assert!(news[0].terms_complied.is_none());
        assert!(news[0].date_of_occurrence.is_none());
        assert!(news[0].explanation.is_none());

        assert_eq!(news[1].stock_id, "5483");
        assert_eq!(news[1].title, "公告本公司董事會決議股利分派");
    }

    #[test]
    fn test_parse_skips_unstriped_and_malformed_rows() {
        let html = r#"
<table>
  <tr><td>2330</td><td>台積電</td><td>113/08/12</td><td>17:30:02</td><td>沒有 class 的列</td></tr>
  <tr class="even"><td>2330</td><td>台積電</td><td>日期待補</td><td>17:30:02</td><td>日期壞掉的列</td></tr>
</table>"#;

        assert!(parse(html).is_empty());
    }
}
