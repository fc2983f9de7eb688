/// Dashboard views derived from the normalized ticket collection.
///
/// Every function here is a pure projection of its input: no state is kept
/// between calls and the same collection always yields the same view.
use std::borrow::Borrow;
use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use super::filter::{aplicar_filtro, listar_agentes, FiltroSelecao};
use super::stats::{media, media_positiva, round1};
use crate::parser::types::Ticket;

pub const SEM_AGENTE: &str = "Não atribuído";
pub const SEM_MOTIVO: &str = "Não especificado";
pub const NAO_APLICAVEL: &str = "N/A";

/// Satisfaction buckets, in display order.
const FAIXAS_SATISFACAO: [(u8, &str); 5] = [
    (5, "Muito Satisfeito"),
    (4, "Satisfeito"),
    (3, "Neutro"),
    (2, "Insatisfeito"),
    (1, "Muito Insatisfeito"),
];

// ─── Data Structures ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResumo {
    pub total: usize,
    pub abertos: usize,
    pub encerrados: usize,
    /// Mean first-response time in minutes.
    pub tempo_medio: i64,
    /// Mean resolution time in minutes.
    pub tma_medio: i64,
    pub tecnico_mais_produtivo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContagemItem {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaixaSatisfacao {
    pub label: String,
    pub nota: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfacaoMetricas {
    pub media: f64,
    pub distribuicao: Vec<FaixaSatisfacao>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    pub total_carregado: usize,
    pub total_filtrado: usize,
    pub agentes_disponiveis: Vec<String>,
    pub filtro: FiltroSelecao,
    pub calculo_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub meta: DashboardMeta,
    pub kpis: KpiResumo,
    pub por_agente: Vec<ContagemItem>,
    pub por_motivo: Vec<ContagemItem>,
    pub satisfacao: SatisfacaoMetricas,
}

/// Ticket table rows: the first `exibidos` filtered tickets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPage {
    pub tickets: Vec<Ticket>,
    pub total: usize,
    pub restantes: usize,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn chamados<T: Borrow<Ticket>>(tickets: &[T]) -> impl Iterator<Item = &Ticket> + Clone + '_ {
    tickets.iter().map(Borrow::<Ticket>::borrow)
}

fn rotulo<'a>(valor: &'a str, vazio: &'static str) -> &'a str {
    if valor.is_empty() {
        vazio
    } else {
        valor
    }
}

/// Count occurrences per label, sorted by count descending.
/// The sort is stable: ties keep first-seen order.
fn contar_ordenado<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<ContagemItem> {
    let mut indices: HashMap<&'a str, usize> = HashMap::new();
    let mut itens: Vec<ContagemItem> = Vec::new();
    for label in labels {
        match indices.get(label) {
            Some(&i) => itens[i].count += 1,
            None => {
                indices.insert(label, itens.len());
                itens.push(ContagemItem {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }
    itens.sort_by(|a, b| b.count.cmp(&a.count));
    itens
}

fn minutos_medios(values: impl IntoIterator<Item = f64>) -> i64 {
    media_positiva(values).map_or(0, |m| m.round() as i64)
}

// ─── Derived views ───────────────────────────────────────────────────────────

/// Summary KPIs.
///
/// Most productive agent: most tickets in closed status, first encountered on
/// ties. Closed tickets without agent count under an empty name; when that
/// name wins, or no ticket is closed, the value is `N/A`.
pub fn calculate_kpis<T: Borrow<Ticket>>(tickets: &[T]) -> KpiResumo {
    let todos = chamados(tickets);
    let abertos = todos.clone().filter(|t| t.is_aberto()).count();
    let encerrados = todos.clone().filter(|t| t.is_encerrado()).count();

    let tecnico_mais_produtivo = contar_ordenado(
        todos
            .clone()
            .filter(|t| t.is_encerrado())
            .map(|t| t.agente_responsavel.as_str()),
    )
    .into_iter()
    .next()
    .map(|c| c.label)
    .filter(|label| !label.is_empty())
    .unwrap_or_else(|| NAO_APLICAVEL.to_string());

    KpiResumo {
        total: tickets.len(),
        abertos,
        encerrados,
        tempo_medio: minutos_medios(todos.clone().map(|t| t.frt)),
        tma_medio: minutos_medios(todos.map(|t| t.tma)),
        tecnico_mais_produtivo,
    }
}

/// Tickets per agent, all statuses, empty agent under `Não atribuído`.
pub fn agent_productivity<T: Borrow<Ticket>>(tickets: &[T]) -> Vec<ContagemItem> {
    contar_ordenado(chamados(tickets).map(|t| rotulo(t.agente_responsavel.as_str(), SEM_AGENTE)))
}

/// Tickets per reason, empty reason under `Não especificado`.
pub fn tickets_by_reason<T: Borrow<Ticket>>(tickets: &[T]) -> Vec<ContagemItem> {
    contar_ordenado(chamados(tickets).map(|t| rotulo(t.motivo.as_str(), SEM_MOTIVO)))
}

/// Satisfaction over rated tickets (score > 0).
pub fn satisfaction_metrics<T: Borrow<Ticket>>(tickets: &[T]) -> SatisfacaoMetricas {
    let notas: Vec<u8> = chamados(tickets)
        .map(|t| t.satisfacao)
        .filter(|&n| n > 0)
        .collect();

    if notas.is_empty() {
        return SatisfacaoMetricas {
            media: 0.0,
            distribuicao: Vec::new(),
            total: 0,
        };
    }

    let distribuicao = FAIXAS_SATISFACAO
        .iter()
        .map(|&(nota, nome)| FaixaSatisfacao {
            label: format!("{nome} ({nota})"),
            nota,
            count: notas.iter().filter(|&&n| n == nota).count(),
        })
        .filter(|f| f.count > 0)
        .collect();

    let valores: Vec<f64> = notas.iter().map(|&n| f64::from(n)).collect();

    SatisfacaoMetricas {
        media: round1(media(&valores)),
        distribuicao,
        total: notas.len(),
    }
}

/// Applies `filtro` to the loaded tickets and computes every view.
pub fn build_dashboard(tickets: &[Ticket], filtro: &FiltroSelecao) -> DashboardView {
    let start = Instant::now();

    let filtrados = aplicar_filtro(tickets, filtro);
    let kpis = calculate_kpis(&filtrados);
    let por_agente = agent_productivity(&filtrados);
    let por_motivo = tickets_by_reason(&filtrados);
    let satisfacao = satisfaction_metrics(&filtrados);

    DashboardView {
        meta: DashboardMeta {
            total_carregado: tickets.len(),
            total_filtrado: filtrados.len(),
            agentes_disponiveis: listar_agentes(tickets),
            filtro: filtro.clone(),
            calculo_duration_ms: start.elapsed().as_millis() as u64,
        },
        kpis,
        por_agente,
        por_motivo,
        satisfacao,
    }
}

/// First `limite` filtered tickets (all when None).
pub fn ticket_page(tickets: &[Ticket], filtro: &FiltroSelecao, limite: Option<usize>) -> TicketPage {
    let filtrados = aplicar_filtro(tickets, filtro);
    let total = filtrados.len();
    let exibidos = limite.map_or(total, |l| l.min(total));
    TicketPage {
        tickets: filtrados.into_iter().take(exibidos).cloned().collect(),
        total,
        restantes: total - exibidos,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
