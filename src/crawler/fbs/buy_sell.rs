use anyhow::Result;
use chrono::NaiveDate;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::util::{
    http::{element, HttpClient},
    text,
};

/// 單一主力對個股的每日進出明細。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuySell {
    /// 日期
    pub date: NaiveDate,
    /// 買進（張）
    pub buy: i64,
    /// 賣出（張）
    pub sell: i64,
    /// 買賣總額（張）
    pub total: i64,
    /// 買賣超（張）
    pub overbought: i64,
}

/// 取得主力對個股的進出明細表，網址來自主力排行的 [`MainForce::url`](super::main_force::MainForce)。
///
/// 富邦的明細頁偶發連線失敗，這是唯一帶重試的端點，其餘端點一律直接回報錯誤。
pub async fn visit(http: &HttpClient, url: &str) -> Result<Vec<BuySell>> {
    let text = http.get_text_with_retry(url).await?;

    Ok(parse(&text))
}

/// 明細列恰有五個儲存格：日期、買進、賣出、總額、買賣超，
/// 第二格須為純數字，表頭列因此被濾掉。
pub(crate) fn parse(text: &str) -> Vec<BuySell> {
    let document = Html::parse_document(text);
    let tr = Selector::parse("tr").expect("tr is a valid selector");

    document
        .select(&tr)
        .filter_map(|row| {
            let cells = element::cells(&row);
            if cells.len() != 5 {
                return None;
            }

            if !text::is_digit_cell(&element::text_of(&cells[1])) {
                return None;
            }

            let date =
                NaiveDate::parse_from_str(element::text_of(&cells[0]).trim(), "%Y/%m/%d").ok()?;

            Some(BuySell {
                date,
                buy: text::parse_i64(&element::text_of(&cells[1]), None).ok()?,
                sell: text::parse_i64(&element::text_of(&cells[2]), None).ok()?,
                total: text::parse_i64(&element::text_of(&cells[3]), None).ok()?,
                overbought: text::parse_i64(&element::text_of(&cells[4]), None).ok()?,
            })
        })
        .collect()
}
