use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::error::AppError;
use crate::parser::{parse_csv_reader, ParseOutput};

/// Where the ticket table comes from.
pub enum Fonte {
    /// Published sheet export, downloaded with a single GET.
    Planilha { client: Client, url: String },
    /// Local copy of the export.
    Arquivo(PathBuf),
}

/// Result of one ingestion cycle.
#[derive(Debug)]
pub struct Carga {
    pub parsed: ParseOutput,
    pub fetch_duration_ms: u64,
}

impl Fonte {
    pub fn planilha(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dash-chamados/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Fonte::Planilha {
            client,
            url: url.into(),
        })
    }

    pub fn arquivo(path: impl Into<PathBuf>) -> Self {
        Fonte::Arquivo(path.into())
    }

    /// Human-readable origin, kept with the loaded dataset.
    pub fn descricao(&self) -> String {
        match self {
            Fonte::Planilha { url, .. } => url.clone(),
            Fonte::Arquivo(path) => path.display().to_string(),
        }
    }

    /// Download (or read) the whole body. No partial reads.
    ///
    /// Bytes are returned undecoded: invalid UTF-8 is left to the csv reader
    /// and surfaces as a parse error.
    pub async fn fetch_bytes(&self) -> Result<Vec<u8>, AppError> {
        match self {
            Fonte::Planilha { client, url } => {
                log::debug!("GET {}", url);
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AppError::HttpStatus {
                        status: status.as_u16(),
                        url: url.clone(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            Fonte::Arquivo(path) => Ok(tokio::fs::read(path).await?),
        }
    }

    /// Fetch and parse. Fails as a whole: transport errors and parse errors
    /// are distinct `AppError` variants and no tickets are returned with them.
    pub async fn carregar(&self, delimiter: u8) -> Result<Carga, AppError> {
        let start = Instant::now();
        let body = self.fetch_bytes().await?;
        let fetch_duration_ms = start.elapsed().as_millis() as u64;
        let parsed = parse_csv_reader(body.as_slice(), delimiter)?;
        log::info!(
            "{} chamados carregados de {} ({} ms)",
            parsed.tickets.len(),
            self.descricao(),
            fetch_duration_ms
        );
        Ok(Carga {
            parsed,
            fetch_duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `response` verbatim to the first connection.
    async fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/export?format=csv", addr)
    }

    fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/csv; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    #[tokio::test]
    async fn test_fetch_and_parse() {
        let body = "id,status,Agente Responsável\n1,Aberto,Ana\n2,Fechado,Bruno\n";
        let url = serve_once(http_response("200 OK", body.as_bytes())).await;
        let fonte = Fonte::planilha(url, Duration::from_secs(5)).unwrap();
        let carga = fonte.carregar(b',').await.unwrap();
        assert_eq!(carga.parsed.tickets.len(), 2);
        assert_eq!(carga.parsed.tickets[1].agente_responsavel, "Bruno");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let url = serve_once(http_response("404 Not Found", b"nope")).await;
        let fonte = Fonte::planilha(url, Duration::from_secs(5)).unwrap();
        let err = fonte.carregar(b',').await.unwrap_err();
        assert!(err.is_fetch_error());
        assert!(matches!(err, AppError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        // bind then drop to get a port with no listener
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fonte =
            Fonte::planilha(format!("http://{}/x.csv", addr), Duration::from_secs(5)).unwrap();
        let err = fonte.carregar(b',').await.unwrap_err();
        assert!(err.is_fetch_error(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_empty_body_is_parse_error() {
        let url = serve_once(http_response("200 OK", b"")).await;
        let fonte = Fonte::planilha(url, Duration::from_secs(5)).unwrap();
        let err = fonte.carregar(b',').await.unwrap_err();
        assert!(err.is_parse_error(), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_invalid_utf8_body_is_parse_error() {
        let url = serve_once(http_response("200 OK", b"id,status\n1,Ab\xffrto\n")).await;
        let fonte = Fonte::planilha(url, Duration::from_secs(5)).unwrap();
        let err = fonte.carregar(b',').await.unwrap_err();
        assert!(err.is_parse_error(), "got {:?}", err);
        assert!(matches!(err, AppError::Csv(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quebrado.csv");
        std::fs::write(&path, b"id,status\n1,Ab\xffrto\n").unwrap();
        let err = Fonte::arquivo(&path).carregar(b',').await.unwrap_err();
        assert!(err.is_parse_error(), "got {:?}", err);
        assert!(!err.is_fetch_error());
    }

    #[tokio::test]
    async fn test_arquivo_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chamados.csv");
        std::fs::write(&path, "id;status\n1;Aberto\n").unwrap();
        let fonte = Fonte::arquivo(&path);
        let carga = fonte.carregar(b';').await.unwrap();
        assert_eq!(carga.parsed.tickets.len(), 1);
        assert_eq!(fonte.descricao(), path.display().to_string());
    }
}
