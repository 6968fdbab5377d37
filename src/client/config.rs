//! API connection settings

use rand::Rng;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5003";
pub const DEFAULT_CHANNEL_CODE: &str = "WEB";
pub const DEFAULT_USERNAME: &str = "testuser";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_COUNTRY_CODE: &str = "NL";
pub const DEFAULT_CUSTOMER_ID: &str = "CUST001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SESSION_SUFFIX_LEN: usize = 9;
const SESSION_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Where the portal API lives and how requests identify themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub channel_code: String,
    pub username: String,
    pub lang: String,
    pub country_code: String,
    pub customer_id: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            channel_code: DEFAULT_CHANNEL_CODE.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            lang: DEFAULT_LANG.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            customer_id: DEFAULT_CUSTOMER_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Header pairs sent with every request, with a fresh session id
    pub fn default_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", "application/json".to_string()),
            ("channelCode", self.channel_code.clone()),
            ("username", self.username.clone()),
            ("lang", self.lang.clone()),
            ("countryCode", self.country_code.clone()),
            ("sessionId", new_session_id()),
            ("customerId", self.customer_id.clone()),
        ]
    }
}

/// `session_<unix millis>_<9 base-36 characters>`
pub fn new_session_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SESSION_SUFFIX_LEN)
        .map(|_| char::from(SESSION_ALPHABET[rng.gen_range(0..SESSION_ALPHABET.len())]))
        .collect();
    format!("session_{millis}_{suffix}")
}
