/// 上櫃公司基本資料（含實收資本額）
pub mod company;
/// 上櫃公司除權息預告
pub mod dividend;
/// 上櫃處置有價證券資訊
pub mod punish;
