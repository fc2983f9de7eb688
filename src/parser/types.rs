use serde::Serialize;

/// Status values compared case-insensitively.
pub const STATUS_ABERTO: &str = "aberto";
pub const STATUS_ENCERRADO: &[&str] = &["encerrado", "fechado"];

/// Row values as found in the sheet, before coercion.
#[derive(Debug, Clone, Default)]
pub struct TicketRaw {
    pub id: Option<String>,
    pub data_abertura: Option<String>,
    pub data_fechamento: Option<String>,
    pub status: Option<String>,
    pub prioridade: Option<String>,
    pub motivo: Option<String>,
    pub solucao: Option<String>,
    pub solicitante: Option<String>,
    pub agente_responsavel: Option<String>,
    pub departamento: Option<String>,
    pub tma: Option<String>,
    pub frt: Option<String>,
    pub satisfacao: Option<String>,
}

/// Normalized ticket. `tma` and `frt` are minutes, 0 meaning no data;
/// `satisfacao` is in 0..=5, 0 meaning not rated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub data_abertura: String,
    pub data_fechamento: String,
    pub status: String,
    pub prioridade: String,
    pub motivo: String,
    pub solucao: String,
    pub solicitante: String,
    pub agente_responsavel: String,
    pub departamento: String,
    pub tma: f64,
    pub frt: f64,
    pub satisfacao: u8,
}

impl Ticket {
    pub fn is_aberto(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ABERTO)
    }

    pub fn is_encerrado(&self) -> bool {
        STATUS_ENCERRADO
            .iter()
            .any(|s| self.status.eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(status: &str) -> Ticket {
        Ticket {
            id: "1".into(),
            data_abertura: String::new(),
            data_fechamento: String::new(),
            status: status.into(),
            prioridade: String::new(),
            motivo: String::new(),
            solucao: String::new(),
            solicitante: String::new(),
            agente_responsavel: String::new(),
            departamento: String::new(),
            tma: 0.0,
            frt: 0.0,
            satisfacao: 0,
        }
    }

    #[test]
    fn test_status_case_insensitive() {
        assert!(ticket("Aberto").is_aberto());
        assert!(ticket("ABERTO").is_aberto());
        assert!(ticket("Fechado").is_encerrado());
        assert!(ticket("encerrado").is_encerrado());
        assert!(!ticket("Em andamento").is_encerrado());
        assert!(!ticket("Em andamento").is_aberto());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ticket("Aberto")).unwrap();
        assert!(json.get("agenteResponsavel").is_some());
        assert!(json.get("dataAbertura").is_some());
    }
}
