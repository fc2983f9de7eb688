use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::AppError;

/// Published export of the tickets sheet.
pub const DEFAULT_SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/1J3rxGubyBXMKfg2YPgNh-ajnhRNoBCft/export?format=csv";

const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOP_AGENTES: usize = 10;
const DEFAULT_TOP_MOTIVOS: usize = 5;
const DEFAULT_LINHAS_TABELA: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub sheet_url: String,
    pub refresh_interval_secs: u64,
    pub http_timeout_secs: u64,
    pub delimitador: char,
    pub top_agentes: usize,
    pub top_motivos: usize,
    pub linhas_tabela: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            delimitador: ',',
            top_agentes: DEFAULT_TOP_AGENTES,
            top_motivos: DEFAULT_TOP_MOTIVOS,
            linhas_tabela: DEFAULT_LINHAS_TABELA,
        }
    }
}

impl AppConfig {
    pub fn delimiter_byte(&self) -> u8 {
        // load_config only accepts ASCII delimiters
        u8::try_from(self.delimitador).unwrap_or(b',')
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// `<config_dir>/dash-chamados/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dash-chamados").join("config.toml"))
}

fn positive_u64(value: &toml::Value) -> Option<u64> {
    value
        .as_integer()
        .and_then(|v| u64::try_from(v).ok())
        .filter(|v| *v > 0)
}

fn positive_usize(value: &toml::Value) -> Option<usize> {
    positive_u64(value).and_then(|v| usize::try_from(v).ok())
}

fn ascii_char(value: &toml::Value) -> Option<char> {
    let s = value.as_str()?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' => Some(c),
        _ => None,
    }
}

/// Load the TOML config at `path`. A missing file yields the defaults;
/// malformed TOML is an error; an invalid value falls back to its default.
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::default();
    if !path.exists() {
        log::debug!("Sem arquivo de configuração em {}", path.display());
        return Ok(config);
    }

    let text = std::fs::read_to_string(path)?;
    let table: toml::Table = toml::from_str(&text)?;

    for (key, value) in &table {
        match key.as_str() {
            "sheet_url" => {
                if let Some(url) = value.as_str().map(str::trim).filter(|s| !s.is_empty()) {
                    config.sheet_url = url.to_string();
                }
            }
            "refresh_interval_secs" => {
                config.refresh_interval_secs = positive_u64(value).unwrap_or(DEFAULT_REFRESH_SECS)
            }
            "http_timeout_secs" => {
                config.http_timeout_secs = positive_u64(value).unwrap_or(DEFAULT_TIMEOUT_SECS)
            }
            "delimitador" => config.delimitador = ascii_char(value).unwrap_or(','),
            "top_agentes" => {
                config.top_agentes = positive_usize(value).unwrap_or(DEFAULT_TOP_AGENTES)
            }
            "top_motivos" => {
                config.top_motivos = positive_usize(value).unwrap_or(DEFAULT_TOP_MOTIVOS)
            }
            "linhas_tabela" => {
                config.linhas_tabela = positive_usize(value).unwrap_or(DEFAULT_LINHAS_TABELA)
            }
            other => log::warn!("Chave de configuração ignorada: {}", other),
        }
    }

    Ok(config)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(config)?;
    std::fs::write(path, text)?;
    Ok(())
}
