/// 公開資訊觀測站重大訊息
pub mod news;
