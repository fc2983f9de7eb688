use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parser::types::Ticket;

/// Status selector of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FiltroStatus {
    #[default]
    Todos,
    Aberto,
    /// Matches both "Encerrado" and "Fechado".
    Encerrado,
}

impl FiltroStatus {
    pub fn aceita(self, ticket: &Ticket) -> bool {
        match self {
            FiltroStatus::Todos => true,
            FiltroStatus::Aberto => ticket.is_aberto(),
            FiltroStatus::Encerrado => ticket.is_encerrado(),
        }
    }
}

impl FromStr for FiltroStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todos" | "all" => Ok(FiltroStatus::Todos),
            "aberto" | "open" => Ok(FiltroStatus::Aberto),
            "encerrado" | "fechado" | "closed" => Ok(FiltroStatus::Encerrado),
            other => Err(format!(
                "status desconhecido: {other:?} (use todos, aberto ou encerrado)"
            )),
        }
    }
}

impl fmt::Display for FiltroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FiltroStatus::Todos => "todos",
            FiltroStatus::Aberto => "aberto",
            FiltroStatus::Encerrado => "encerrado",
        };
        f.write_str(s)
    }
}

/// Filter selection owned by the caller and passed in on every recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltroSelecao {
    /// Exact agent name; None means every agent.
    pub agente: Option<String>,
    pub status: FiltroStatus,
}

impl FiltroSelecao {
    pub fn new(agente: Option<String>, status: FiltroStatus) -> Self {
        // "all"/"todos" from a selector means no agent filter
        let agente = agente.filter(|a| {
            let a = a.trim();
            !a.is_empty() && !a.eq_ignore_ascii_case("all") && !a.eq_ignore_ascii_case("todos")
        });
        FiltroSelecao { agente, status }
    }

    pub fn aceita(&self, ticket: &Ticket) -> bool {
        let agente_ok = self
            .agente
            .as_deref()
            .map_or(true, |a| ticket.agente_responsavel == a);
        agente_ok && self.status.aceita(ticket)
    }
}

/// Subset of `tickets` matching the selection, in input order.
pub fn aplicar_filtro<'a>(tickets: &'a [Ticket], filtro: &FiltroSelecao) -> Vec<&'a Ticket> {
    tickets.iter().filter(|t| filtro.aceita(t)).collect()
}

/// Distinct non-empty agent names, in first-seen order.
pub fn listar_agentes(tickets: &[Ticket]) -> Vec<String> {
    let mut vistos: HashSet<&str> = HashSet::new();
    tickets
        .iter()
        .map(|t| t.agente_responsavel.as_str())
        .filter(|a| !a.is_empty() && vistos.insert(*a))
        .map(str::to_string)
        .collect()
}
