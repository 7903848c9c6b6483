//! 台股資料擷取用戶端。
//!
//! Aggregates reference data for TWSE (上市) and TPEx (上櫃) equities from a
//! mix of JSON open-data endpoints and semi-structured HTML pages: company
//! rosters, historical trades, broker main-force rankings (主力進出), dividend
//! dates, punished stocks (處置股) and regulatory news.
//!
//! The entry point is [`client::StockCrawl`]; one instance owns a pooled HTTP
//! session and a TTL response cache for its whole lifetime.

pub mod cache;
pub mod client;
pub mod config;
pub mod crawler;
pub mod declare;
pub mod logging;
pub mod util;

pub use client::StockCrawl;
pub use config::Config;
pub use crawler::{
    fbs::{buy_sell::BuySell, main_force::MainForce},
    mops::news::News,
    stock_api::{HistoryTrade, Stock},
    PunishStock,
};
pub use declare::{MainForceRange, RecentDay, StockExchange};
