use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::{
    declare::MainForceRange,
    util::{
        http::{element, HttpClient},
        text,
    },
};

/// 主力（某日或某區間內，個股的買超或賣超券商之一）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainForce {
    /// 券商名稱
    pub name: String,
    /// 買進（張）
    pub buy: i64,
    /// 賣出（張）
    pub sell: i64,
    /// 買超/賣超（上游已算好，不在本地重算）
    pub overbought: i64,
    /// 佔成交比重(%)
    pub proportion: f64,
    /// 主力進出明細網址
    pub url: String,
    /// 是否為買超主力，false 則為賣超主力
    pub is_buy_force: bool,
}

/// 取得個股的主力進出排行。
pub async fn visit(
    http: &HttpClient,
    host: &str,
    stock_symbol: &str,
    range: MainForceRange,
) -> Result<Vec<MainForce>> {
    let url = match range {
        MainForceRange::Date(date) => {
            let date = date.format("%Y-%m-%d");
            format!(
                "https://{}/z/zc/zco/zco.djhtm?a={}&e={}&f={}",
                host, stock_symbol, date, date
            )
        }
        MainForceRange::Recent(day) => format!(
            "https://{}/z/zc/zco/zco_{}_{}.djhtm",
            host,
            stock_symbol,
            day.serial()
        ),
    };
    let text = http.get_text(&url).await?;

    Ok(parse(&text, host))
}

/// 解析主力進出排行頁。
///
/// 每列恰有十個儲存格：前五格是該名次的買超券商、後五格是賣超券商。
/// 第二格（買進張數）去掉千分位後必須是純數字，否則整列是表頭或裝飾列，
/// 直接捨棄；賣超半列另外做一次同樣的檢查，所以一列可能產出一或兩筆。
pub(crate) fn parse(text: &str, host: &str) -> Vec<MainForce> {
    let document = Html::parse_document(text);
    let tr = Selector::parse("tr").expect("tr is a valid selector");
    let mut main_forces = Vec::new();

    for row in document.select(&tr) {
        let cells = element::cells(&row);
        if cells.len() != 10 {
            continue;
        }

        let (buy_half, sell_half) = cells.split_at(5);
        if !text::is_digit_cell(&element::text_of(&buy_half[1])) {
            continue;
        }

        if let Some(force) = parse_half(buy_half, host, true) {
            main_forces.push(force);
        }

        if !text::is_digit_cell(&element::text_of(&sell_half[1])) {
            continue;
        }

        if let Some(force) = parse_half(sell_half, host, false) {
            main_forces.push(force);
        }
    }

    main_forces
}

fn parse_half(cells: &[ElementRef], host: &str, is_buy_force: bool) -> Option<MainForce> {
    let href = element::first_href(&cells[0])?;

    Some(MainForce {
        name: element::text_of(&cells[0]),
        buy: text::parse_i64(&element::text_of(&cells[1]), None).ok()?,
        sell: text::parse_i64(&element::text_of(&cells[2]), None).ok()?,
        overbought: text::parse_i64(&element::text_of(&cells[3]), None).ok()?,
        proportion: text::str_to_float(&element::text_of(&cells[4])),
        url: format!("https://{}{}", host, href),
        is_buy_force,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "fubon-ebrokerdj.fbs.com.tw";

    fn row(cells: &[&str; 10]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
        format!("<tr>{}</tr>", tds)
    }

    fn link(name: &str) -> String {
        format!("<a href=\"/z/zc/zco/zco0.djhtm?a=2330&b=1440\">{}</a>", name)
    }

    #[test]
    fn test_parse_pairs() {
        let html = format!(
            "<table>{}{}</table>",
            row(&[
                "券商", "買進", "賣出", "買超", "比重", "券商", "買進", "賣出", "賣超", "比重",
            ]),
            row(&[
                &link("摩根大通"),
                "5,700",
                "262",
                "5,438",
                "9.2%",
                &link("富邦"),
                "100",
                "3,900",
                "-3,800",
                "6.4%",
            ]),
        );

        let forces = parse(&html, HOST);
        assert_eq!(forces.len(), 2);

        assert_eq!(forces[0].name, "摩根大通");
        assert_eq!(forces[0].buy, 5_700);
        assert_eq!(forces[0].sell, 262);
        assert_eq!(forces[0].overbought, 5_438);
        assert_eq!(forces[0].proportion, 9.2);
        assert!(forces[0].is_buy_force);
        assert_eq!(
            forces[0].url,
            "https://fubon-ebrokerdj.fbs.com.tw/z/zc/zco/zco0.djhtm?a=2330&b=1440"
        );

        assert_eq!(forces[1].name, "富邦");
        assert_eq!(forces[1].overbought, -3_800);
        assert!(!forces[1].is_buy_force);
    }

    #[test]
    fn test_parse_drops_row_with_non_digit_buy_cell() {
        let html = format!(
            "<table>{}</table>",
            row(&[
                &link("券商名稱"),
                "買進",
                "賣出",
                "買超",
                "比重",
                &link("富邦"),
                "100",
                "50",
                "50",
                "1.0%",
            ]),
        );

        // 買超半列第二格不是數字，整列（含賣超半列）都不產出
        assert!(parse(&html, HOST).is_empty());
    }

    #[test]
    fn test_parse_keeps_buy_half_when_sell_half_invalid() {
        let html = format!(
            "<table>{}</table>",
            row(&[
                &link("摩根大通"),
                "5,700",
                "262",
                "5,438",
                "9.2%",
                "&nbsp;",
                "&nbsp;",
                "&nbsp;",
                "&nbsp;",
                "&nbsp;",
            ]),
        );

        let forces = parse(&html, HOST);
        assert_eq!(forces.len(), 1);
        assert!(forces[0].is_buy_force);
    }

    #[test]
    fn test_parse_ignores_rows_with_other_cell_counts() {
        let html = "<table><tr><td>自選股</td><td>12</td></tr></table>";
        assert!(parse(html, HOST).is_empty());
    }

    #[test]
    fn test_parse_malformed_proportion_is_zero() {
        let html = format!(
            "<table>{}</table>",
            row(&[
                &link("摩根大通"),
                "5,700",
                "262",
                "5,438",
                "N/A",
                &link("富邦"),
                "100",
                "3,900",
                "-3,800",
                "6.4%",
            ]),
        );

        let forces = parse(&html, HOST);
        assert_eq!(forces[0].proportion, 0.0);
    }
}
