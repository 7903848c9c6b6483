use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 富邦證券（主力進出）
pub mod fbs;
/// 嘉實資訊-理財網（類股分類）
pub mod moneydj;
/// 公開資訊觀測站（重大訊息）
pub mod mops;
/// 歷史交易 REST 服務
pub mod stock_api;
/// 台灣證券櫃檯買賣中心
pub mod tpex;
/// 台灣證券交易所
pub mod twse;

/// 處置股。上市與上櫃的公告欄位名稱不同，各自的 punish 模組負責轉成這個型別。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunishStock {
    /// 股票名稱
    pub name: String,
    /// 股票代號
    pub id: String,
    /// 公告遭處置日期
    pub date: NaiveDate,
}
