use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    cache::Cache,
    config::Config,
    crawler::{
        fbs::{self, buy_sell::BuySell, main_force::MainForce},
        moneydj, mops,
        mops::news::News,
        stock_api,
        stock_api::{HistoryTrade, Stock},
        tpex, twse, PunishStock,
    },
    declare::{MainForceRange, StockExchange},
    util::{http::HttpClient, text},
};

/// 推算最近交易日用的指標股，台積電天天有成交。
const TRADE_DAY_ANCHOR: &str = "2330";

/// 台股資料擷取的進入點。
///
/// 一個實例擁有一個連線池化的 HTTP session 與一份回應快取，
/// 生命週期內重複使用；要釋放連線池時呼叫 [`close`](Self::close)。
pub struct StockCrawl {
    cfg: Config,
    http: HttpClient,
    cache: Cache,
}

impl StockCrawl {
    pub fn new(cfg: Config) -> Result<Self> {
        let http = HttpClient::new(&cfg)?;
        let cache = Cache::new(cfg.cache.max_capacity, cfg.cache_ttl());

        Ok(StockCrawl { cfg, http, cache })
    }

    fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.cfg.cache.enabled {
            return None;
        }

        self.cache.get(key)
    }

    fn cache_put<T: Serialize>(&self, key: &str, value: &T) {
        if self.cfg.cache.enabled {
            self.cache.put(key, value);
        }
    }

    /// 取得全部上市上櫃股票的代號與名稱
    pub async fn fetch_stocks(&self) -> Result<Vec<Stock>> {
        let key = Cache::key("fetch_stocks", &[]);
        if let Some(hit) = self.cache_get::<Vec<Stock>>(&key) {
            return Ok(hit);
        }

        let stocks =
            stock_api::visit_stocks(&self.http, &self.cfg.upstream.stock_api_base).await?;
        self.cache_put(&key, &stocks);

        Ok(stocks)
    }

    /// 以代號或名稱取得單一股票，查無資料時回傳 `None`
    pub async fn fetch_stock(&self, id_or_name: &str) -> Result<Option<Stock>> {
        let stocks = self.fetch_stocks().await?;

        Ok(stocks
            .into_iter()
            .find(|stock| stock.id == id_or_name || stock.name == id_or_name))
    }

    /// 取得上市與上櫃公司代號。
    ///
    /// 代號必須是純數字，`only_four_digits` 為真時再排除四位數以外的
    /// 代號（ETF、權證等商品）。
    pub async fn fetch_stock_ids(&self, only_four_digits: bool) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for exchange in StockExchange::iterator() {
            let symbols: Vec<String> = match exchange {
                StockExchange::TWSE => {
                    twse::company::visit(&self.http, &self.cfg.upstream.twse_host)
                        .await?
                        .into_iter()
                        .map(|c| c.stock_symbol)
                        .collect()
                }
                StockExchange::TPEx => {
                    tpex::company::visit(&self.http, &self.cfg.upstream.tpex_host)
                        .await?
                        .into_iter()
                        .map(|c| c.stock_symbol)
                        .collect()
                }
            };

            ids.extend(
                symbols
                    .into_iter()
                    .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
                    .filter(|id| !only_four_digits || id.len() == 4),
            );
        }

        Ok(ids)
    }

    /// 取得個股的主力進出排行（買超與賣超券商）。
    ///
    /// `range` 指定單一交易日或回看區間，見 [`MainForceRange`]。
    pub async fn fetch_main_forces(
        &self,
        stock_id: &str,
        range: MainForceRange,
    ) -> Result<Vec<MainForce>> {
        let key = Cache::key("fetch_main_forces", &[stock_id, &range_key(range)]);
        if let Some(hit) = self.cache_get::<Vec<MainForce>>(&key) {
            return Ok(hit);
        }

        let forces =
            fbs::main_force::visit(&self.http, &self.cfg.upstream.fbs_host, stock_id, range)
                .await?;
        self.cache_put(&key, &forces);

        Ok(forces)
    }

    /// 取得主力對個股的進出明細表，`url` 來自 [`MainForce::url`]
    pub async fn fetch_force_buy_sells(&self, url: &str) -> Result<Vec<BuySell>> {
        let key = Cache::key("fetch_force_buy_sells", &[url]);
        if let Some(hit) = self.cache_get::<Vec<BuySell>>(&key) {
            return Ok(hit);
        }

        let buy_sells = fbs::buy_sell::visit(&self.http, url).await?;
        self.cache_put(&key, &buy_sells);

        Ok(buy_sells)
    }

    /// 取得上市與上櫃公司的實收資本額對應表，鍵為公司代號。
    /// 資本額欄位不是數字時代表上游格式變動，直接回傳錯誤。
    pub async fn fetch_company_capitals(&self) -> Result<HashMap<String, i64>> {
        let key = Cache::key("fetch_company_capitals", &[]);
        if let Some(hit) = self.cache_get::<HashMap<String, i64>>(&key) {
            return Ok(hit);
        }

        let twse = twse::company::visit(&self.http, &self.cfg.upstream.twse_host).await?;
        let tpex = tpex::company::visit(&self.http, &self.cfg.upstream.tpex_host).await?;

        let mut capitals = HashMap::with_capacity(twse.len() + tpex.len());
        for company in twse {
            let capital = text::parse_i64(&company.paid_in_capital, None)?;
            capitals.insert(company.stock_symbol, capital);
        }
        for company in tpex {
            let capital = text::parse_i64(&company.paid_in_capital, None)?;
            capitals.insert(company.stock_symbol, capital);
        }

        self.cache_put(&key, &capitals);

        Ok(capitals)
    }

    /// 取得個股最近的歷史交易資料，由新到舊最多 `limit` 筆
    pub async fn fetch_history_trades(
        &self,
        stock_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryTrade>> {
        let key = Cache::key("fetch_history_trades", &[stock_id, &limit.to_string()]);
        if let Some(hit) = self.cache_get::<Vec<HistoryTrade>>(&key) {
            return Ok(hit);
        }

        let trades = stock_api::visit_history_trades(
            &self.http,
            &self.cfg.upstream.stock_api_base,
            stock_id,
            limit,
        )
        .await?;
        self.cache_put(&key, &trades);

        Ok(trades)
    }

    /// 取得上市與上櫃公司的除權息日期對應表，鍵為公司代號。
    /// 民國日期轉換失敗時直接回傳錯誤。
    pub async fn fetch_dividend_days(&self) -> Result<HashMap<String, NaiveDate>> {
        let key = Cache::key("fetch_dividend_days", &[]);
        if let Some(hit) = self.cache_get::<HashMap<String, NaiveDate>>(&key) {
            return Ok(hit);
        }

        let twse = twse::dividend::visit(&self.http, &self.cfg.upstream.twse_host).await?;
        let tpex = tpex::dividend::visit(&self.http, &self.cfg.upstream.tpex_host).await?;

        let mut days = HashMap::with_capacity(twse.len() + tpex.len());
        for dividend in twse {
            let date = crate::util::datetime::roc_to_western_date(&dividend.date)?;
            days.insert(dividend.stock_symbol, date);
        }
        for dividend in tpex {
            let date = crate::util::datetime::roc_to_western_date(&dividend.date)?;
            days.insert(dividend.stock_symbol, date);
        }

        self.cache_put(&key, &days);

        Ok(days)
    }

    /// 取得股票分類對應表，鍵為股票代號，值為所屬分類名稱
    pub async fn fetch_stock_cat_map(&self) -> Result<HashMap<String, Vec<String>>> {
        let key = Cache::key("fetch_stock_cat_map", &[]);
        if let Some(hit) = self.cache_get::<HashMap<String, Vec<String>>>(&key) {
            return Ok(hit);
        }

        let map = moneydj::category::visit(&self.http, &self.cfg.upstream.moneydj_host).await?;
        self.cache_put(&key, &map);

        Ok(map)
    }

    /// 取得上市與上櫃公布的處置股票
    pub async fn fetch_punish_stocks(&self) -> Result<Vec<PunishStock>> {
        let key = Cache::key("fetch_punish_stocks", &[]);
        if let Some(hit) = self.cache_get::<Vec<PunishStock>>(&key) {
            return Ok(hit);
        }

        let mut punish = twse::punish::visit(&self.http, &self.cfg.upstream.twse_host).await?;
        let tpex = tpex::punish::visit(&self.http, &self.cfg.upstream.tpex_host).await?;
        punish.extend(tpex);

        self.cache_put(&key, &punish);

        Ok(punish)
    }

    /// 取得當日重大訊息。列表隨時有新公告，不經過快取。
    pub async fn fetch_news(&self) -> Result<Vec<News>> {
        mops::news::visit(&self.http, &self.cfg.upstream.mops_host).await
    }

    /// 以指標股最近的成交日推算最近的交易日，
    /// 收盤後、休市日或連假都會得到正確的日期。
    pub async fn fetch_most_recent_trade_day(&self) -> Result<NaiveDate> {
        let trades = self.fetch_history_trades(TRADE_DAY_ANCHOR, 5).await?;

        trades
            .iter()
            .map(|trade| trade.date)
            .max()
            .ok_or_else(|| anyhow!("No history trades returned for {}", TRADE_DAY_ANCHOR))
    }

    /// 結束使用。取走所有權，連線池與快取隨之釋放，同一個實例無法關閉兩次。
    pub fn close(self) {
        drop(self);
    }
}

fn range_key(range: MainForceRange) -> String {
    match range {
        MainForceRange::Date(date) => date.format("%Y-%m-%d").to_string(),
        MainForceRange::Recent(day) => format!("d{}", day.serial()),
    }
}
