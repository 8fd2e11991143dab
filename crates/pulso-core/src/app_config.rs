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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Upper bound on an uploaded workbook, in bytes.
    pub max_upload_bytes: usize,
    /// Minimum token length kept by the keyword tokenizer, in chars.
    pub min_token_len: usize,
    /// How many sectors/tags a top-N insight list names.
    pub top_n: usize,
    /// Minimum responses a sector needs in a weekday before it can be
    /// flagged as the most critical one.
    pub min_sector_sample: u64,
    pub summary_api_key: Option<String>,
    pub summary_base_url: String,
    pub summary_model: String,
    pub summary_timeout_secs: u64,
    pub summary_max_comments: usize,
}

impl AppConfig {
    /// Whether the narrative summarizer is configured at all.
    #[must_use]
    pub fn summaries_enabled(&self) -> bool {
        self.summary_api_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("min_token_len", &self.min_token_len)
            .field("top_n", &self.top_n)
            .field("min_sector_sample", &self.min_sector_sample)
            .field(
                "summary_api_key",
                &self.summary_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("summary_base_url", &self.summary_base_url)
            .field("summary_model", &self.summary_model)
            .field("summary_timeout_secs", &self.summary_timeout_secs)
            .field("summary_max_comments", &self.summary_max_comments)
            .finish()
    }
}
