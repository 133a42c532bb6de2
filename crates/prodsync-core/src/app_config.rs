use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Rendering/anti-bot bypass service credentials. When present, every page
/// fetch is routed through the service instead of hitting the retailer
/// directly.
#[derive(Clone)]
pub struct ProxySettings {
    pub endpoint: String,
    pub api_key: String,
}

impl std::fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxySettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Retailer origin searches are issued against, e.g. `https://www.walmart.com`.
    pub search_base_url: String,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Politeness pause between successive page fetches of one search.
    pub inter_page_delay_ms: u64,
    pub proxy: Option<ProxySettings>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("search_base_url", &self.search_base_url)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_page_delay_ms", &self.inter_page_delay_ms)
            .field("proxy", &self.proxy)
            .finish()
    }
}
