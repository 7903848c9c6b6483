use std::time::Duration;

use moka::sync::Cache as MokaCache;
use serde::{de::DeserializeOwned, Serialize};

use crate::logging;

/// 回應快取。
///
/// 以「操作名稱 + 正規化後的參數」為鍵，值為 JSON 序列化後的結果，
/// 同一個交易日內重複呼叫同一個操作就不再打上游。
///
/// 採固定 TTL（預設 24 小時）加上容量上限的設計，逐出策略交給 moka
/// 的標準（近期使用優先保留）機制；不需要另外向上游查詢「今天」來
/// 當作快取範圍鍵，也沒有整包重寫的持久化檔案。
pub struct Cache {
    inner: MokaCache<String, String>,
}

impl Cache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Cache {
            inner: MokaCache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// 明確的鍵產生器：操作名稱加上正規化後的參數串。
    pub fn key(operation: &str, args: &[&str]) -> String {
        if args.is_empty() {
            operation.to_string()
        } else {
            format!("{}:{}", operation, args.join(":"))
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.inner.get(key)?;

        match serde_json::from_str::<T>(&payload) {
            Ok(value) => Some(value),
            Err(why) => {
                // 反序列化失敗代表快取內容與目前的型別不相容，作廢重抓。
                logging::error_file_async(format!(
                    "Failed to decode cache entry '{}' because {:?}",
                    key, why
                ));
                self.inner.invalidate(key);
                None
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => self.inner.insert(key.to_string(), payload),
            Err(why) => {
                logging::error_file_async(format!(
                    "Failed to encode cache entry '{}' because {:?}",
                    key, why
                ));
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key() {
        assert_eq!(Cache::key("fetch_stocks", &[]), "fetch_stocks");
        assert_eq!(
            Cache::key("fetch_main_forces", &["2330", "d2"]),
            "fetch_main_forces:2330:d2"
        );
    }

    #[test]
    fn test_put_get_roundtrip() {
        let cache = Cache::new(16, Duration::from_secs(60));
        let key = Cache::key("fetch_stock_ids", &["true"]);

        cache.put(&key, &vec!["2330".to_string(), "2317".to_string()]);

        let hit: Vec<String> = cache.get(&key).unwrap();
        assert_eq!(hit, vec!["2330", "2317"]);
        assert!(cache.contains_key(&key));
        assert_eq!(cache.get::<Vec<String>>("missing"), None);
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = Cache::new(16, Duration::from_millis(50));
        cache.put("op", &1_i64);
        assert_eq!(cache.get::<i64>("op"), Some(1));

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.get::<i64>("op"), None);
    }

    #[test]
    fn test_incompatible_entry_is_invalidated() {
        let cache = Cache::new(16, Duration::from_secs(60));
        cache.put("op", &"not a number".to_string());

        assert_eq!(cache.get::<i64>("op"), None);
        assert!(!cache.contains_key("op"));
    }
}
