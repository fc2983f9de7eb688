/// Plain-text rendering of the dashboard for the terminal.
use crate::analyzer::dashboard::{ContagemItem, TicketPage};
use crate::commands::dashboard::DashboardResponse;
use crate::config::AppConfig;

const LARGURA_ROTULO: usize = 32;

fn linha(rotulo: &str, valor: impl std::fmt::Display) -> String {
    format!("  {:<width$} {}", rotulo, valor, width = LARGURA_ROTULO)
}

fn ranking(titulo: &str, itens: &[ContagemItem], top: usize) -> Vec<String> {
    let mut out = vec![format!("{} (top {})", titulo, top)];
    if itens.is_empty() {
        out.push("  (sem dados)".to_string());
    }
    out.extend(itens.iter().take(top).map(|i| linha(&i.label, i.count)));
    out
}

pub fn render_dashboard(resp: &DashboardResponse, config: &AppConfig) -> String {
    let view = &resp.view;
    let k = &view.kpis;
    let filtro = &view.meta.filtro;

    let mut out = vec![
        format!(
            "Painel de chamados: {} (carregado em {})",
            resp.origem,
            resp.carregado_em.format("%d/%m/%Y %H:%M:%S UTC")
        ),
        format!(
            "Filtro: agente={} status={} ({} de {} chamados)",
            filtro.agente.as_deref().unwrap_or("todos"),
            filtro.status,
            view.meta.total_filtrado,
            view.meta.total_carregado
        ),
        String::new(),
        linha("Total de Chamados", k.total),
        linha("Chamados Abertos", k.abertos),
        linha("Chamados Encerrados", k.encerrados),
        linha("Tempo Médio de Resposta", format!("{} min", k.tempo_medio)),
        linha("TMA Médio", format!("{} min", k.tma_medio)),
        linha("Técnico Mais Produtivo", &k.tecnico_mais_produtivo),
        String::new(),
    ];

    out.extend(ranking("Chamados por Técnico", &view.por_agente, config.top_agentes));
    out.push(String::new());
    out.extend(ranking("Distribuição por Motivo", &view.por_motivo, config.top_motivos));
    out.push(String::new());

    let sat = &view.satisfacao;
    out.push(format!(
        "Satisfação: média {:.1} ({} avaliações)",
        sat.media, sat.total
    ));
    out.extend(sat.distribuicao.iter().map(|f| linha(&f.label, f.count)));

    out.join("\n")
}

fn emoji_satisfacao(nota: u8) -> &'static str {
    match nota {
        0 => "-",
        4.. => "😊",
        3 => "😐",
        _ => "😞",
    }
}

pub fn render_tickets(page: &TicketPage) -> String {
    if page.tickets.is_empty() {
        return "Nenhum chamado encontrado".to_string();
    }

    let mut out = vec![format!(
        "{:<10} {:<14} {:<10} {:<22} {:<18} {:<16} {:>9} {:>4}",
        "ID", "Status", "Prioridade", "Motivo", "Agente", "Departamento", "FRT (min)", "Sat."
    )];
    for t in &page.tickets {
        let frt = if t.frt > 0.0 {
            t.frt.to_string()
        } else {
            "-".to_string()
        };
        out.push(format!(
            "{:<10} {:<14} {:<10} {:<22} {:<18} {:<16} {:>9} {:>4}",
            truncar(&t.id, 10),
            truncar(&t.status, 14),
            truncar(&t.prioridade, 10),
            truncar(&t.motivo, 22),
            truncar(&t.agente_responsavel, 18),
            truncar(&t.departamento, 16),
            frt,
            emoji_satisfacao(t.satisfacao)
        ));
    }
    if page.restantes > 0 {
        out.push(format!(
            "... mais {} chamados (use --todos)",
            page.restantes
        ));
    }
    out.join("\n")
}

fn truncar(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
