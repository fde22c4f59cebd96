//! Provider configuration.

use std::time::Duration;

/// Public EDGAR host.
pub const DEFAULT_BASE_URL: &str = "https://www.sec.gov";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`EdgarProvider`](crate::EdgarProvider).
///
/// The SEC requires an identifying user agent. Format should be:
/// "AppName/Version (contact@email.com)"
///
/// # Example
/// ```
/// use filings_edgar::EdgarConfig;
/// use std::time::Duration;
///
/// let config = EdgarConfig::new("MyApp/1.0 (contact@example.com)")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.base_url, "https://www.sec.gov");
/// ```
#[derive(Clone, Debug)]
pub struct EdgarConfig {
    /// Scheme and host the browse endpoint is resolved against.
    pub base_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Timeout covering the whole request, body included.
    pub timeout: Duration,
}

impl EdgarConfig {
    /// Creates a configuration for the public EDGAR host.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: user_agent.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Points the provider at a different host, e.g. a mirror or a test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
