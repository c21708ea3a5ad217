//! Token inventory synchronizer.
//!
//! Keeps a locally queryable snapshot of every authenticator's serial, type,
//! and presentation options, refreshed from the backend on a fixed schedule
//! and persisted encrypted so the gateway keeps answering while the backend
//! is down. Each successful sync replaces the whole record set; there is no
//! incremental merge.

pub mod options;
pub mod store;

pub use options::OptionsMap;
pub use store::CacheStore;

use crate::backend::SessionManager;
use crate::backend::soap::{self, TokenFilters};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{debug, error, info, instrument, warn};

/// One physical authenticator, as synchronized from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub serial: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_auth_attempt: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_auth_success: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_capable: Option<bool>,
}

/// Lockout counters derived from a user's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutCounters {
    pub max_lockout_attempts: u32,
    pub overall_failed_attempts: u32,
    pub remaining_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub interval_secs: u64,
    pub page_size: usize,
    pub organization: Option<String>,
    pub max_lockout_attempts: u32,
}

/// Fold the backend's raw token states into the normalized vocabulary.
/// Unknown states pass through unchanged.
#[must_use]
pub fn normalize_state(raw: &str) -> String {
    let normalized = match raw.to_uppercase().as_str() {
        "BASE_ACTIVE" | "ACTIVE_TOKEN" | "BASE_ASSIGNED" | "MANUALLY_ASSIGNED" => "active",
        "BASE_SUSPENDED" | "MANUAL_SUSPENSION" | "RULE_SUSPENSION" => "suspended",
        "BASE_LOCKED" | "SERVER_LOCK" | "USER_LOCK" | "PIN_CHANGE_LOCK" => "locked",
        "ENROLLED_PIN_CHANGE" | "PIN_CHANGE" => "pin_change",
        "NOT_INITIALIZED" | "REVOKED" | "BASE_ALLOCATED" | "ALLOCATED" | "ENROLLMENT_PENDING"
        | "MANUAL_REMOVE" | "AUTO_REMOVE" | "BASE_DELETED" | "BASE_PURGED" | "PURGED_TOKEN" => {
            "inactive"
        }
        "CORRUPTED_INVENTORY" | "CORRUPTED" | "BASE_LOST_FAILED" | "LOST_TOKEN"
        | "DAMAGED_TOKEN" => "failed",
        "" => "",
        other => {
            warn!("Unknown state for token: {other}");
            return raw.to_string();
        }
    };

    normalized.to_string()
}

fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

pub struct Inventory {
    session: Arc<SessionManager>,
    store: CacheStore,
    options: OptionsMap,
    config: SyncConfig,
    index: RwLock<HashMap<String, TokenRecord>>,
}

impl Inventory {
    #[must_use]
    pub fn new(
        session: Arc<SessionManager>,
        store: CacheStore,
        options: OptionsMap,
        config: SyncConfig,
    ) -> Self {
        Self {
            session,
            store,
            options,
            config,
            index: RwLock::new(HashMap::new()),
        }
    }

    fn record_from_row(&self, row: &HashMap<String, String>) -> Option<TokenRecord> {
        let serial = row.get("serialnumber").filter(|s| !s.is_empty())?.clone();
        let token_type = row.get("type").cloned().unwrap_or_default();

        let mut raw_state = row.get("state").cloned().unwrap_or_default();
        let mut unlock_time = row.get("unlocktime").and_then(|t| parse_time(t));

        // A server lock whose unlock time has passed is effectively open
        // again; surface that instead of the stale lock.
        if unlock_time.is_some_and(|time| time < Utc::now()) {
            unlock_time = None;
            if raw_state.eq_ignore_ascii_case("SERVER_LOCK") {
                raw_state = "unlock_eligible".to_string();
            }
        }

        let push_capable = if self.options.supports_push(&token_type) {
            Some(true)
        } else if token_type.eq_ignore_ascii_case("mobilepass") {
            Some(false)
        } else {
            None
        };

        Some(TokenRecord {
            serial,
            state: normalize_state(&raw_state),
            failed_attempts: row.get("authattempts").and_then(|a| a.parse().ok()),
            last_auth_attempt: row.get("lastauthdate").and_then(|t| parse_time(t)),
            last_auth_success: row.get("lastsuccessdate").and_then(|t| parse_time(t)),
            unlock_time,
            device_name: row.get("devicename").filter(|d| !d.is_empty()).cloned(),
            push_capable,
            token_type,
        })
    }

    /// Fetch one page of token records.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-2xx response.
    pub async fn fetch_page(
        &self,
        filters: &TokenFilters,
        start_record: usize,
        page_size: usize,
    ) -> Result<Vec<TokenRecord>> {
        let envelope = soap::get_tokens_request(filters, start_record, page_size);
        let (status, body) = self
            .session
            .send_request(envelope, self.session.request_timeout())
            .await?;

        if !status.is_success() {
            return Err(anyhow!("GetTokens returned {status}"));
        }

        Ok(soap::parse_token_rows(&body)
            .iter()
            .filter_map(|row| self.record_from_row(row))
            .collect())
    }

    /// Total record count for the given filters.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-2xx response, or a
    /// response missing the count.
    pub async fn fetch_total(&self, filters: &TokenFilters) -> Result<usize> {
        let envelope = soap::get_total_tokens_request(filters);
        let (status, body) = self
            .session
            .send_request(envelope, self.session.request_timeout())
            .await?;

        if !status.is_success() {
            return Err(anyhow!("GetTotalTokens returned {status}"));
        }

        soap::parse_total_tokens(&body)
            .ok_or_else(|| anyhow!("Error parsing response: no total token count found"))
    }

    /// Full paginated fetch: count, then sequential pages. Any page failure
    /// aborts the whole fetch so a sync cycle never commits partial data.
    ///
    /// # Errors
    /// Returns an error if the count query or any page fails.
    pub async fn fetch_all(&self, filters: &TokenFilters) -> Result<Vec<TokenRecord>> {
        let total = self.fetch_total(filters).await?;
        let page_size = self.config.page_size.max(1);
        let pages = total.div_ceil(page_size);

        debug!("Fetching {total} token record(s) across {pages} page(s)");

        let mut all = Vec::with_capacity(total);

        for page in 0..pages {
            let start_record = page * page_size;
            let records = self.fetch_page(filters, start_record, page_size).await?;
            all.extend(records);
        }

        Ok(all)
    }

    async fn replace_index(&self, records: Vec<TokenRecord>) {
        let map: HashMap<String, TokenRecord> = records
            .into_iter()
            .map(|record| (record.serial.clone(), record))
            .collect();

        *self.index.write().await = map;
    }

    /// One sync cycle: fetch everything, persist, then swap the in-memory
    /// index. On failure the previous snapshot stays in place.
    ///
    /// # Errors
    /// Returns an error if the session cannot be established or the fetch or
    /// persist fails.
    #[instrument(skip(self))]
    pub async fn sync_once(&self) -> Result<usize> {
        self.session.ensure_connected().await?;

        let filters = TokenFilters {
            organization: self.config.organization.clone(),
            ..TokenFilters::default()
        };

        let records = self.fetch_all(&filters).await?;
        self.store.persist(&records)?;

        let count = records.len();
        self.replace_index(records).await;

        Ok(count)
    }

    /// Startup policy: reuse the cache when it exists, otherwise sync now if
    /// the backend is reachable, otherwise start empty and keep serving.
    pub async fn bootstrap(&self) {
        if let Some(records) = self.store.load() {
            info!("Loaded {} token record(s) from cache", records.len());
            self.replace_index(records).await;
            return;
        }

        if self.session.is_connected().await {
            info!("No inventory cache. Fetching inventory...");
            match self.sync_once().await {
                Ok(count) => info!("Synchronized {count} token record(s)"),
                Err(err) => error!("Initial inventory sync failed: {err}"),
            }
        } else {
            error!(
                "No inventory cache and backend unreachable; serving an empty inventory until the next sync"
            );
        }
    }

    /// Serial numbers owned by a user, straight from the backend.
    ///
    /// # Errors
    /// Returns an error if the session is unusable or the call fails.
    pub async fn serials_by_owner(
        &self,
        username: &str,
        organization: Option<&str>,
    ) -> Result<Vec<String>> {
        self.session.ensure_connected().await?;

        let organization = organization
            .or(self.config.organization.as_deref())
            .unwrap_or("");

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("userName", username)
            .append_pair("organization", organization)
            .finish();

        let (status, text) = self
            .session
            .send_form("/GetTokensByOwner", body, self.session.request_timeout())
            .await?;

        if !status.is_success() {
            return Err(anyhow!("GetTokensByOwner returned {status}"));
        }

        Ok(soap::parse_string_list(&text))
    }

    /// De-duplicated presentation options for a set of serials, resolved
    /// through the in-memory index. Never fails: unknown serials map to the
    /// default option.
    pub async fn options_for_serials(&self, serials: &[String]) -> BTreeSet<String> {
        let index = self.index.read().await;
        let mut options = BTreeSet::new();

        for serial in serials {
            let token_type = index
                .get(serial)
                .map_or("", |record| record.token_type.as_str());

            options.extend(self.options.options_for_type(token_type));
        }

        options
    }

    /// Lockout counters across a user's records: the worst failed-attempt
    /// count among non-suspended tokens, reset when any token is eligible
    /// for unlock.
    pub async fn lockout_counters(&self, serials: &[String]) -> LockoutCounters {
        let index = self.index.read().await;
        let records: Vec<&TokenRecord> = serials
            .iter()
            .filter_map(|serial| index.get(serial))
            .collect();

        let max = self.config.max_lockout_attempts;

        if records.iter().any(|record| record.state == "unlock_eligible") {
            return LockoutCounters {
                max_lockout_attempts: max,
                overall_failed_attempts: 0,
                remaining_attempts: max,
            };
        }

        let overall = records
            .iter()
            .filter(|record| record.state != "suspended")
            .filter_map(|record| record.failed_attempts)
            .max()
            .unwrap_or(0);

        LockoutCounters {
            max_lockout_attempts: max,
            overall_failed_attempts: overall,
            remaining_attempts: max.saturating_sub(overall),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.index.read().await.len()
    }
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Spawn the periodic sync task. One cycle per tick, awaited inline, so sync
/// cycles never overlap.
pub fn spawn_sync(inventory: Arc<Inventory>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(interval_secs));

        // Bootstrap already ran; skip the immediate tick.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            info!("Synchronizing token inventory");

            match inventory.sync_once().await {
                Ok(count) => info!("Inventory sync complete: {count} record(s)"),
                Err(err) => error!("Inventory sync failed: {err}"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;
    use secrecy::SecretString;
    use std::fmt::Write as _;
    use std::net::TcpListener;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn page_xml(start: usize, count: usize) -> String {
        let mut xml = String::from("<GetTokensResponse>");
        for i in start..start + count {
            let _ = write!(
                xml,
                "<Named_Tokens_Table><serialnumber>SER{i:06}</serialnumber><type>etoken</type><state>BASE_ACTIVE</state></Named_Tokens_Table>"
            );
        }
        xml.push_str("</GetTokensResponse>");
        xml
    }

    fn test_options() -> OptionsMap {
        OptionsMap::new(
            HashMap::from([
                ("mobilepass".to_string(), vec!["push".to_string(), "code".to_string()]),
                ("etoken".to_string(), vec!["code".to_string()]),
            ]),
            "code".to_string(),
        )
    }

    async fn connected_session(server: &MockServer, key: &str) -> Result<Arc<SessionManager>> {
        let session = Arc::new(SessionManager::new(
            &server.uri(),
            crypto::encrypt(key, "operator@example.com")?,
            crypto::encrypt(key, "123456")?,
            SecretString::from(key.to_string()),
            Duration::from_secs(5),
        )?);

        Mock::given(method("POST"))
            .and(body_string_contains("OperatorEmail"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("AUTH_SUCCESS")
                    .insert_header("Set-Cookie", "session=abc; Path=/"),
            )
            .mount(server)
            .await;

        session.connect().await?;
        Ok(session)
    }

    fn inventory(
        session: Arc<SessionManager>,
        dir: &tempfile::TempDir,
        key: &str,
        page_size: usize,
    ) -> Inventory {
        Inventory::new(
            session,
            CacheStore::new(
                dir.path().join("tokens.enc"),
                SecretString::from(key.to_string()),
            ),
            test_options(),
            SyncConfig {
                interval_secs: 3600,
                page_size,
                organization: None,
                max_lockout_attempts: 3,
            },
        )
    }

    #[test]
    fn normalize_state_folds_families() {
        assert_eq!(normalize_state("BASE_ACTIVE"), "active");
        assert_eq!(normalize_state("manual_suspension"), "suspended");
        assert_eq!(normalize_state("USER_LOCK"), "locked");
        assert_eq!(normalize_state("PIN_CHANGE"), "pin_change");
        assert_eq!(normalize_state("REVOKED"), "inactive");
        assert_eq!(normalize_state("LOST_TOKEN"), "failed");
        // Unknown states pass through untouched
        assert_eq!(normalize_state("SOMETHING_NEW"), "SOMETHING_NEW");
        assert_eq!(normalize_state(""), "");
    }

    #[tokio::test]
    async fn fetch_all_walks_every_page() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = connected_session(&server, &key).await?;
        let dir = tempfile::tempdir()?;
        let inventory = inventory(session, &dir, &key, 100);

        Mock::given(method("POST"))
            .and(body_string_contains("<GetTotalTokens xmlns"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<GetTotalTokensResponse><GetTotalTokensResult>250</GetTotalTokensResult></GetTotalTokensResponse>",
            ))
            .expect(1)
            .mount(&server)
            .await;

        for (start, count) in [(0usize, 100usize), (100, 100), (200, 50)] {
            Mock::given(method("POST"))
                .and(body_string_contains(format!(
                    "<startRecord>{start}</startRecord>"
                )))
                .respond_with(ResponseTemplate::new(200).set_body_string(page_xml(start, count)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let records = inventory.fetch_all(&TokenFilters::default()).await?;
        assert_eq!(records.len(), 250);
        assert_eq!(records[0].serial, "SER000000");
        assert_eq!(records[249].serial, "SER000249");
        Ok(())
    }

    #[tokio::test]
    async fn failed_page_aborts_sync_without_commit() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = connected_session(&server, &key).await?;
        let dir = tempfile::tempdir()?;
        let inventory = inventory(session, &dir, &key, 100);

        Mock::given(method("POST"))
            .and(body_string_contains("<GetTotalTokens xmlns"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<GetTotalTokensResponse><GetTotalTokensResult>150</GetTotalTokensResult></GetTotalTokensResponse>",
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_string_contains("<startRecord>0</startRecord>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_xml(0, 100)))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_string_contains("<startRecord>100</startRecord>"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(inventory.sync_once().await.is_err());
        assert_eq!(inventory.record_count().await, 0);
        assert!(inventory.store.load().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn sync_persists_and_indexes() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = connected_session(&server, &key).await?;
        let dir = tempfile::tempdir()?;
        let inventory = inventory(session, &dir, &key, 100);

        Mock::given(method("POST"))
            .and(body_string_contains("<GetTotalTokens xmlns"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<GetTotalTokensResponse><GetTotalTokensResult>2</GetTotalTokensResult></GetTotalTokensResponse>",
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_string_contains("<startRecord>0</startRecord>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<GetTokensResponse>\
                 <Named_Tokens_Table><serialnumber>1000001</serialnumber><type>mobilepass</type><state>BASE_ACTIVE</state></Named_Tokens_Table>\
                 <Named_Tokens_Table><serialnumber>1000002</serialnumber><type>etoken</type><state>USER_LOCK</state></Named_Tokens_Table>\
                 </GetTokensResponse>",
            ))
            .mount(&server)
            .await;

        let count = inventory.sync_once().await?;
        assert_eq!(count, 2);
        assert_eq!(inventory.record_count().await, 2);

        // The cache round-trips through the encrypted file
        let cached = inventory.store.load().ok_or_else(|| anyhow!("no cache"))?;
        assert_eq!(cached.len(), 2);

        let options = inventory
            .options_for_serials(&["1000001".to_string(), "1000002".to_string()])
            .await;
        assert_eq!(
            options.into_iter().collect::<Vec<_>>(),
            vec!["code", "push"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unknown_serials_fall_back_to_default_option() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = Arc::new(SessionManager::new(
            &server.uri(),
            crypto::encrypt(&key, "operator@example.com")?,
            crypto::encrypt(&key, "123456")?,
            SecretString::from(key.clone()),
            Duration::from_secs(5),
        )?);
        let dir = tempfile::tempdir()?;
        let inventory = inventory(session, &dir, &key, 100);

        let options = inventory
            .options_for_serials(&["does-not-exist".to_string()])
            .await;
        assert_eq!(options.into_iter().collect::<Vec<_>>(), vec!["code"]);

        // Empty input yields an empty, never-failing result
        assert!(inventory.options_for_serials(&[]).await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_cache_and_unreachable_backend_start_cold() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = Arc::new(SessionManager::new(
            &server.uri(),
            crypto::encrypt(&key, "operator@example.com")?,
            crypto::encrypt(&key, "123456")?,
            SecretString::from(key.clone()),
            Duration::from_secs(5),
        )?);

        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("tokens.enc"), "corrupted")?;

        // Connect is rejected: bootstrap must not panic and must leave an
        // empty, queryable index behind.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("AUTH_FAILURE"))
            .mount(&server)
            .await;

        let inventory = inventory(session, &dir, &key, 100);
        inventory.bootstrap().await;

        assert_eq!(inventory.record_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn serials_by_owner_parses_string_list() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = connected_session(&server, &key).await?;
        let dir = tempfile::tempdir()?;
        let inventory = inventory(session, &dir, &key, 100);

        Mock::given(method("POST"))
            .and(path("/GetTokensByOwner"))
            .and(body_string_contains("userName=alice"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<ArrayOfString><string>1000001</string><string>1000002</string></ArrayOfString>",
            ))
            .mount(&server)
            .await;

        let serials = inventory.serials_by_owner("alice", None).await?;
        assert_eq!(serials, vec!["1000001", "1000002"]);
        Ok(())
    }

    #[tokio::test]
    async fn lockout_counters_follow_failed_attempts() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let key = crypto::generate_key();
        let session = Arc::new(SessionManager::new(
            &server.uri(),
            crypto::encrypt(&key, "operator@example.com")?,
            crypto::encrypt(&key, "123456")?,
            SecretString::from(key.clone()),
            Duration::from_secs(5),
        )?);
        let dir = tempfile::tempdir()?;
        let inventory = inventory(session, &dir, &key, 100);

        let record = |serial: &str, state: &str, attempts: u32| TokenRecord {
            serial: serial.to_string(),
            token_type: "etoken".to_string(),
            state: state.to_string(),
            failed_attempts: Some(attempts),
            last_auth_attempt: None,
            last_auth_success: None,
            unlock_time: None,
            device_name: None,
            push_capable: None,
        };

        inventory
            .replace_index(vec![
                record("a", "active", 2),
                record("b", "suspended", 5),
                record("c", "active", 1),
            ])
            .await;

        let serials: Vec<String> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
        let counters = inventory.lockout_counters(&serials).await;

        // Suspended tokens don't count toward the overall figure
        assert_eq!(counters.overall_failed_attempts, 2);
        assert_eq!(counters.remaining_attempts, 1);

        inventory
            .replace_index(vec![record("a", "unlock_eligible", 3)])
            .await;
        let counters = inventory.lockout_counters(&["a".to_string()]).await;
        assert_eq!(counters.overall_failed_attempts, 0);
        assert_eq!(counters.remaining_attempts, 3);
        Ok(())
    }
}
