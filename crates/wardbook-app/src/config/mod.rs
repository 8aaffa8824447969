use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub service_url: String,
    pub service_key: String,
    pub session_file: PathBuf,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8086".to_string(),
            service_url: "http://127.0.0.1:54321".to_string(),
            service_key: String::new(),
            session_file: PathBuf::from(".wardbook/session.json"),
            http_timeout: Duration::from_secs(10),
        }
    }
}
