use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tokio_retry::RetryIf;

use crate::{config::Config, logging};

pub mod element;
pub mod user_agent;

/// HTTP 擷取層。
///
/// 一個 `HttpClient` 擁有一個連線池化的 reqwest client，生命週期跟隨
/// [`crate::StockCrawl`]。所有設定（逾時、重試節奏、User-Agent）在建構時
/// 由 [`Config`] 注入，不使用全域單例。
pub struct HttpClient {
    client: Client,
    fixed_user_agent: Option<String>,
    retry_max: usize,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            // ===== 超時設置 =====
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            // ===== TCP 優化 =====
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            // ===== 連接池 =====
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(90))
            // ===== Cookie 和重定向 =====
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .referer(true)
            // 部分上游主機（櫃買中心、富邦）的憑證鏈時常殘缺，這裡刻意停用
            // 憑證驗證換取可用性。抓取的都是公開市場資料，屬於已知的取捨。
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))?;

        Ok(HttpClient {
            client,
            fixed_user_agent: cfg.http.fixed_user_agent.clone(),
            retry_max: cfg.http.retry_max,
            retry_delay: cfg.retry_delay(),
        })
    }

    /// 每個請求各自抽一個 User-Agent；設定檔可固定一個以便測試。
    fn user_agent(&self) -> String {
        self.fixed_user_agent
            .clone()
            .unwrap_or_else(user_agent::gen_random_ua)
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let start = Instant::now();
        let res = self
            .client
            .get(url)
            .header(header::USER_AGENT, self.user_agent())
            .send()
            .await;
        let elapsed = start.elapsed().as_millis();

        match res {
            Ok(response) => {
                logging::debug_file_async(format!("GET:{} {} ms", url, elapsed));
                Ok(response)
            }
            Err(why) => {
                logging::error_file_async(format!(
                    "GET:{} failed because {:?}. {} ms",
                    url, why, elapsed
                ));
                Err(anyhow!(why))
            }
        }
    }

    /// Performs an HTTP GET request and deserializes the JSON response.
    ///
    /// 非 2xx 回應代表「查無資料」而不是錯誤，回傳 `Ok(None)`；
    /// 呼叫端必須自行處理查無資料的情況。
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.send(url).await?;

        if !response.status().is_success() {
            logging::debug_file_async(format!("GET:{} returned {}", url, response.status()));
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| anyhow!("Error reading response body: {:?}", e))?;

        serde_json::from_slice::<T>(&bytes)
            .map(Some)
            .map_err(|e| anyhow!("Error parsing response JSON: {:?}", e))
    }

    /// Performs an HTTP GET request and returns the response as text.
    ///
    /// 以寬鬆模式解碼：無效的位元組序列以替代字元取代，不會因此失敗。
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| anyhow!("Error reading response body: {:?}", e))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 主力進出明細頁專用的抓取：連線層級失敗時重試。
    ///
    /// 第 n 次重試前等待 `retry_delay * n`（預設 5 秒起跳的線性退避），
    /// 最多重試 `retry_max`（預設 5）次，額度用盡時把最後的錯誤丟回呼叫端。
    /// 其他端點不重試，暫時性失敗直接回傳錯誤。
    pub async fn get_text_with_retry(&self, url: &str) -> Result<String> {
        let delays = (1..=self.retry_max as u32).map(|i| self.retry_delay * i);

        RetryIf::spawn(delays, || self.get_text(url), is_connection_error).await
    }
}

fn is_connection_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<reqwest::Error>()
        .map(|e| e.is_connect() || e.is_timeout())
        .unwrap_or(false)
}
