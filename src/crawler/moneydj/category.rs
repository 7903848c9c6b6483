use anyhow::{anyhow, Result};
use hashbrown::HashMap;
use scraper::{Html, Selector};

use crate::{
    logging,
    util::http::{element, HttpClient},
};

/// 取得股票分類對應表，鍵為股票代號，值為該股所屬的分類名稱。
///
/// 先從分類總表頁收集各分類的連結，再逐頁抓取分類內的個股，
/// 一檔股票可以同時屬於多個分類。單一分類頁抓取失敗時記錄後跳過，
/// 不讓整個對應表失敗。
pub async fn visit(http: &HttpClient, host: &str) -> Result<HashMap<String, Vec<String>>> {
    let url = format!("https://{}/Z/ZH/ZHA/ZHA.djhtm", host);
    let text = http.get_text(&url).await?;
    let links = parse_category_links(&text, host)?;

    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (category, url) in links {
        let text = match http.get_text(&url).await {
            Ok(text) => text,
            Err(why) => {
                logging::error_file_async(format!(
                    "Failed to fetch category page({}) because {:?}",
                    url, why
                ));
                continue;
            }
        };

        for stock_id in parse_stock_ids(&text) {
            result.entry(stock_id).or_default().push(category.clone());
        }
    }

    Ok(result)
}

/// 分類總表的第一個表格第一列裡，寬 25% 的儲存格各是一個分類連結，
/// 補位格要跳過。
pub(crate) fn parse_category_links(text: &str, host: &str) -> Result<Vec<(String, String)>> {
    let document = Html::parse_document(text);
    let table = Selector::parse("table").expect("table is a valid selector");
    let tr = Selector::parse("tr").expect("tr is a valid selector");
    let td = Selector::parse("td[width=\"25%\"]").expect("td[width] is a valid selector");

    let first_row = document
        .select(&table)
        .next()
        .and_then(|t| t.select(&tr).next())
        .ok_or_else(|| anyhow!("category index page has no table rows"))?;

    Ok(first_row
        .select(&td)
        .filter_map(|cell| {
            // 補位格只有 &nbsp;，取完文字再修剪後會是空字串
            let name = element::text_of(&cell);
            if name.is_empty() {
                return None;
            }

            let href = element::first_href(&cell)?;

            Some((name, format!("https://{}{}", host, href)))
        })
        .collect())
}

/// 分類頁的個股列在第二個表格，每列恰十格，
/// 第一格開頭四碼為股票代號，非四位數字的列（表頭、個股以外的商品）略過。
pub(crate) fn parse_stock_ids(text: &str) -> Vec<String> {
    let document = Html::parse_document(text);
    let table = Selector::parse("table").expect("table is a valid selector");
    let tr = Selector::parse("tr").expect("tr is a valid selector");

    let Some(stock_table) = document.select(&table).nth(1) else {
        return Vec::new();
    };

    stock_table
        .select(&tr)
        .filter_map(|row| {
            let cells = element::cells(&row);
            if cells.len() != 10 {
                return None;
            }

            let stock_id: String = element::text_of(&cells[0]).chars().take(4).collect();
            if stock_id.len() != 4 || !stock_id.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }

            Some(stock_id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "www.moneydj.com";

    #[test]
    fn test_parse_category_links() {
        let html = r#"
<table>
  <tr>
    <td width="25%"><a href="/Z/ZH/ZHB/ZHB_1100.djhtm">水泥工業</a></td>
    <td width="25%"><a href="/Z/ZH/ZHB/ZHB_2500.djhtm">半導體</a></td>
    <td width="25%">&nbsp;</td>
    <td width="50%">版面說明</td>
  </tr>
</table>"#;

        let links = parse_category_links(html, HOST).unwrap();
        assert_eq!(
            links,
            vec![
                (
                    "水泥工業".to_string(),
                    "https://www.moneydj.com/Z/ZH/ZHB/ZHB_1100.djhtm".to_string()
                ),
                (
                    "半導體".to_string(),
                    "https://www.moneydj.com/Z/ZH/ZHB/ZHB_2500.djhtm".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_parse_category_links_without_table_is_err() {
        assert!(parse_category_links("<html><body></body></html>", HOST).is_err());
    }

    fn stock_row(first: &str) -> String {
        let rest: String = (1..10).map(|i| format!("<td>{}</td>", i)).collect();
        format!("<tr><td>{}</td>{}</tr>", first, rest)
    }

    #[test]
    fn test_parse_stock_ids() {
        let html = format!(
            r#"<table><tr><td>選單</td></tr></table>
<table>
  {}{}{}{}
</table>"#,
            "<tr><td>股名</td><td>股價</td></tr>",
            stock_row("2330台積電"),
            stock_row("台指期"),
            stock_row("5483中美晶"),
        );

        assert_eq!(parse_stock_ids(&html), vec!["2330", "5483"]);
    }

    #[test]
    fn test_parse_stock_ids_without_second_table() {
        assert!(parse_stock_ids("<table><tr><td>only</td></tr></table>").is_empty());
    }
}
