use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "ServiceConfig::networker_default")]
    pub networker: ServiceConfig,
    #[serde(default = "ServiceConfig::snow_default")]
    pub snow: ServiceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            networker: ServiceConfig::networker_default(),
            snow: ServiceConfig::snow_default(),
        }
    }
}

/// Bind address for one mock service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl ServiceConfig {
    fn networker_default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8001, worker_threads: Some(4) }
    }

    fn snow_default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8002, worker_threads: Some(4) }
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.networker.normalize()?;
        self.snow.normalize()?;
        Ok(())
    }
}

impl ServiceConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}
