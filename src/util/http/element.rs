use scraper::{ElementRef, Selector};

/// 取出一列中的所有 `<td>` 元素。
pub fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let td = Selector::parse("td").expect("td is a valid selector");
    row.select(&td).collect()
}

/// 元素內的純文字（已去除前後空白）。
pub fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 儲存格內第一個連結的 href。
pub fn first_href(cell: &ElementRef) -> Option<String> {
    let a = Selector::parse("a").expect("a is a valid selector");
    cell.select(&a)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(String::from)
}
