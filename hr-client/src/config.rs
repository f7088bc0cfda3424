//! Client configuration

use shared::Lang;
use std::time::Duration;

/// Refresh period of each auto-updating page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Payroll list
    pub payroll: Duration,
    /// Manager complaint queue
    pub support: Duration,
    /// Employee task board
    pub tasks: Duration,
    /// Open chat conversation and conversation list
    pub chat: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            payroll: Duration::from_secs(60),
            support: Duration::from_secs(30),
            tasks: Duration::from_secs(20),
            chat: Duration::from_secs(5),
        }
    }
}

/// Client configuration for connecting to the HR server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Session cookie forwarded as-is (`session=...`)
    pub session_cookie: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Display language
    pub lang: Lang,

    /// Auto-refresh periods
    pub poll: PollIntervals,

    /// How long a notice stays visible
    pub notice_ttl: Duration,

    /// Log level used when RUST_LOG is unset
    pub log_level: String,

    /// Emit JSON logs
    pub log_json: bool,

    /// Directory for rolling log files
    pub log_dir: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            session_cookie: None,
            timeout: 30,
            lang: Lang::default(),
            poll: PollIntervals::default(),
            notice_ttl: Duration::from_secs(5),
            log_level: "info".to_string(),
            log_json: false,
            log_dir: None,
        }
    }

    /// Load configuration from `.env` and the environment
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | HR_BASE_URL | http://localhost:5000 |
    /// | HR_TOKEN | - |
    /// | HR_SESSION_COOKIE | - |
    /// | HR_TIMEOUT_SECS | 30 |
    /// | HR_LANG | ar |
    /// | HR_PAYROLL_POLL_SECS | 60 |
    /// | HR_SUPPORT_POLL_SECS | 30 |
    /// | HR_TASKS_POLL_SECS | 20 |
    /// | HR_CHAT_POLL_SECS | 5 |
    /// | HR_NOTICE_TTL_SECS | 5 |
    /// | HR_LOG_LEVEL | info |
    /// | HR_LOG_JSON | false |
    /// | HR_LOG_DIR | - |
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = PollIntervals::default();
        let mut config = Self::new(
            std::env::var("HR_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".into()),
        );
        config.token = non_empty_var("HR_TOKEN");
        config.session_cookie = non_empty_var("HR_SESSION_COOKIE");
        config.timeout = parse_var("HR_TIMEOUT_SECS").unwrap_or(30);
        config.lang = parse_var("HR_LANG").unwrap_or_default();
        config.poll = PollIntervals {
            payroll: secs_var("HR_PAYROLL_POLL_SECS").unwrap_or(defaults.payroll),
            support: secs_var("HR_SUPPORT_POLL_SECS").unwrap_or(defaults.support),
            tasks: secs_var("HR_TASKS_POLL_SECS").unwrap_or(defaults.tasks),
            chat: secs_var("HR_CHAT_POLL_SECS").unwrap_or(defaults.chat),
        };
        config.notice_ttl = secs_var("HR_NOTICE_TTL_SECS").unwrap_or(config.notice_ttl);
        config.log_level = std::env::var("HR_LOG_LEVEL").unwrap_or_else(|_| "info".into());
        config.log_json = parse_var("HR_LOG_JSON").unwrap_or(false);
        config.log_dir = non_empty_var("HR_LOG_DIR");
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the session cookie
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the display language
    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }

    /// Set the refresh periods
    pub fn with_poll(mut self, poll: PollIntervals) -> Self {
        self.poll = poll;
        self
    }

    /// Set the notice lifetime
    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Whole seconds, zero rejected
fn secs_var(key: &str) -> Option<Duration> {
    parse_var::<u64>(key)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.lang, Lang::Ar);
        assert_eq!(config.poll.payroll, Duration::from_secs(60));
        assert_eq!(config.poll.support, Duration::from_secs(30));
        assert_eq!(config.poll.tasks, Duration::from_secs(20));
        assert_eq!(config.poll.chat, Duration::from_secs(5));
        assert_eq!(config.notice_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://hr.local")
            .with_token("t")
            .with_lang(Lang::En)
            .with_timeout(5);
        assert_eq!(config.base_url, "http://hr.local");
        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.lang, Lang::En);
        assert_eq!(config.timeout, 5);
    }
}
