use std::{env, fs, time::Duration};

use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

const STOCK_API_BASE: &str = "STOCK_API_BASE";
const HTTP_RETRY_DELAY_MILLIS: &str = "HTTP_RETRY_DELAY_MILLIS";
const CACHE_TTL_HOURS: &str = "CACHE_TTL_HOURS";
const CACHE_MAX_CAPACITY: &str = "CACHE_MAX_CAPACITY";

/// 用戶端設定。
///
/// 以 `app.json` 為主、環境變數為輔；找不到設定檔時使用預設值。
/// 整份設定在建構 [`crate::StockCrawl`] 時傳入，不使用全域單例，
/// 測試時可直接替換上游主機與重試節奏。
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub upstream: Upstream,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub cache: Cache,
}

/// 各上游資料來源的主機位置。
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Upstream {
    /// 台灣證券交易所 OpenAPI
    pub twse_host: String,
    /// 證券櫃檯買賣中心 OpenAPI
    pub tpex_host: String,
    /// 富邦證券（主力進出）
    pub fbs_host: String,
    /// 嘉實資訊-理財網（類股分類）
    pub moneydj_host: String,
    /// 公開資訊觀測站（重大訊息）
    pub mops_host: String,
    /// 歷史交易 REST 服務
    pub stock_api_base: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Http {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    /// 券商明細頁連線失敗時的額外重試次數上限
    pub retry_max: usize,
    /// 第 n 次重試前等待 retry_delay_millis * n
    pub retry_delay_millis: u64,
    /// 固定 User-Agent；`None` 時每個請求隨機產生
    #[serde(default)]
    pub fixed_user_agent: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Cache {
    pub enabled: bool,
    pub ttl_hours: u64,
    pub max_capacity: u64,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            twse_host: "openapi.twse.com.tw".to_string(),
            tpex_host: "www.tpex.org.tw".to_string(),
            fbs_host: "fubon-ebrokerdj.fbs.com.tw".to_string(),
            moneydj_host: "www.moneydj.com".to_string(),
            mops_host: "mops.twse.com.tw".to_string(),
            stock_api_base: "https://stock-api.seriaati.xyz".to_string(),
        }
    }
}

impl Default for Http {
    fn default() -> Self {
        Http {
            connect_timeout_secs: 8,
            timeout_secs: 15,
            retry_max: 5,
            retry_delay_millis: 5_000,
            fixed_user_agent: None,
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            enabled: true,
            ttl_hours: 24,
            max_capacity: 1_024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            upstream: Default::default(),
            http: Default::default(),
            cache: Default::default(),
        }
    }
}

impl Config {
    /// 讀取 `app.json` 並套用環境變數覆寫；設定檔不存在時回傳預設值。
    pub fn load() -> Self {
        let cfg = match fs::read_to_string(CONFIG_PATH) {
            Ok(text) if !text.is_empty() => match serde_json::from_str::<Config>(&text) {
                Ok(cfg) => cfg,
                Err(why) => {
                    logging::error_file_async(format!(
                        "I can't read the config context because {:?}",
                        why
                    ));
                    Default::default()
                }
            },
            _ => Default::default(),
        };

        cfg.override_with_env()
    }

    fn override_with_env(mut self) -> Self {
        if let Ok(base) = env::var(STOCK_API_BASE) {
            self.upstream.stock_api_base = base;
        }

        if let Ok(millis) = env::var(HTTP_RETRY_DELAY_MILLIS) {
            if let Ok(millis) = millis.parse::<u64>() {
                self.http.retry_delay_millis = millis;
            }
        }

        if let Ok(hours) = env::var(CACHE_TTL_HOURS) {
            if let Ok(hours) = hours.parse::<u64>() {
                self.cache.ttl_hours = hours;
            }
        }

        if let Ok(capacity) = env::var(CACHE_MAX_CAPACITY) {
            if let Ok(capacity) = capacity.parse::<u64>() {
                self.cache.max_capacity = capacity;
            }
        }

        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.http.retry_delay_millis)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_hours * 3_600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let cfg = Config::default();

        assert_eq!(cfg.upstream.twse_host, "openapi.twse.com.tw");
        assert_eq!(cfg.http.retry_max, 5);
        assert_eq!(cfg.retry_delay(), Duration::from_secs(5));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_override_with_env() {
        env::set_var(HTTP_RETRY_DELAY_MILLIS, "10");
        let cfg = Config::default().override_with_env();
        env::remove_var(HTTP_RETRY_DELAY_MILLIS);

        assert_eq!(cfg.retry_delay(), Duration::from_millis(10));
    }
}
