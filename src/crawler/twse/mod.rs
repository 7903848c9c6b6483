/// 上市公司基本資料（含實收資本額）
pub mod company;
/// 上市公司除權息預告
pub mod dividend;
/// 集中市場公布處置股票
pub mod punish;
