/// 單一主力對個股的進出明細表
pub mod buy_sell;
/// 個股主力進出排行（買超/賣超券商）
pub mod main_force;
