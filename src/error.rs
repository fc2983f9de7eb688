use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de entrada/saída: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Erro de rede: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Planilha respondeu com status HTTP {status} ({url})")]
    HttpStatus { status: u16, url: String },

    #[error("Erro de serialização: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error("Erro ao gerar planilha Excel: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Arquivo vazio ou sem cabeçalho")]
    EmptyFile,

    #[error("Dados ainda não carregados")]
    DatasetNotLoaded,

    #[error("{0}")]
    Custom(String),
}

impl AppError {
    /// Transport failure: the sheet could not be downloaded.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, AppError::Http(_) | AppError::HttpStatus { .. })
    }

    /// The downloaded text could not be decoded as a table.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AppError::Csv(_) | AppError::EmptyFile)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(e: toml::ser::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
