use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::analyzer::dashboard::{ContagemItem, DashboardView, TicketPage};
use crate::analyzer::stats::fracao;
use crate::error::AppError;
use crate::export::{
    create_header_format, create_integer_format, create_number_format, create_percent_format,
};

/// Dashboard workbook, 5 sheets:
/// - "Indicadores": KPI summary and active filter
/// - "Agentes"    : tickets per agent
/// - "Motivos"    : tickets per reason
/// - "Satisfação" : rated-ticket distribution
/// - "Chamados"   : ticket table
///
/// Returns the XLSX bytes via workbook.save_to_buffer().
pub fn generate_dashboard_report(
    view: &DashboardView,
    page: &TicketPage,
) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    write_indicadores(&mut wb, view)?;
    write_contagens(&mut wb, "Agentes", "Agente", &view.por_agente, view.kpis.total)?;
    write_contagens(&mut wb, "Motivos", "Motivo", &view.por_motivo, view.kpis.total)?;
    write_satisfacao(&mut wb, view)?;
    write_chamados(&mut wb, page)?;
    Ok(wb.save_to_buffer()?)
}

// ── Aba 1: Indicadores ───────────────────────────────────────────────────

fn write_indicadores(wb: &mut Workbook, view: &DashboardView) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Indicadores")?;

    let hdr = create_header_format();
    let int = create_integer_format();

    ws.write_with_format(0, 0, "Indicador", &hdr)?;
    ws.write_with_format(0, 1, "Valor", &hdr)?;

    let k = &view.kpis;
    let numericos: &[(&str, f64)] = &[
        ("Total de Chamados", k.total as f64),
        ("Chamados Abertos", k.abertos as f64),
        ("Chamados Encerrados", k.encerrados as f64),
        ("Tempo Médio de Resposta (min)", k.tempo_medio as f64),
        ("TMA Médio (min)", k.tma_medio as f64),
    ];
    for (i, (label, val)) in numericos.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, *label)?;
        ws.write_with_format(row, 1, *val, &int)?;
    }

    let mut row = (numericos.len() + 1) as u32;
    ws.write(row, 0, "Técnico Mais Produtivo")?;
    ws.write(row, 1, k.tecnico_mais_produtivo.as_str())?;

    row += 2;
    let agente = view.meta.filtro.agente.as_deref().unwrap_or("todos");
    let status = view.meta.filtro.status.to_string();
    ws.write_with_format(row, 0, "Filtro", &hdr)?;
    ws.write_with_format(row, 1, "", &hdr)?;
    ws.write(row + 1, 0, "Agente")?;
    ws.write(row + 1, 1, agente)?;
    ws.write(row + 2, 0, "Status")?;
    ws.write(row + 2, 1, status.as_str())?;

    ws.set_column_width(0, 32)?;
    ws.set_column_width(1, 24)?;

    Ok(())
}

// ── Abas 2-3: Agentes / Motivos ──────────────────────────────────────────

fn write_contagens(
    wb: &mut Workbook,
    nome: &str,
    coluna: &str,
    itens: &[ContagemItem],
    total: usize,
) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name(nome)?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let pct = create_percent_format();

    for (col, h) in [coluna, "Chamados", "%"].iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }
    write_count_rows(ws, 1, itens, total, &int, &pct)?;

    ws.set_freeze_panes(1, 0)?;
    ws.set_column_width(0, 30)?;
    ws.set_column_width(1, 12)?;
    ws.set_column_width(2, 10)?;

    Ok(())
}

fn write_count_rows(
    ws: &mut Worksheet,
    start_row: u32,
    itens: &[ContagemItem],
    total: usize,
    int: &Format,
    pct: &Format,
) -> Result<(), XlsxError> {
    for (i, item) in itens.iter().enumerate() {
        let row = start_row + i as u32;
        ws.write(row, 0, item.label.as_str())?;
        ws.write_with_format(row, 1, item.count as f64, int)?;
        ws.write_with_format(row, 2, fracao(item.count, total), pct)?;
    }
    Ok(())
}

// ── Aba 4: Satisfação ────────────────────────────────────────────────────

fn write_satisfacao(wb: &mut Workbook, view: &DashboardView) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Satisfação")?;

    let hdr = create_header_format();
    let int = create_integer_format();
    let num = create_number_format();
    let pct = create_percent_format();
    let sat = &view.satisfacao;

    ws.write_with_format(0, 0, "Média", &hdr)?;
    ws.write_with_format(0, 1, sat.media, &num)?;
    ws.write_with_format(1, 0, "Avaliações", &hdr)?;
    ws.write_with_format(1, 1, sat.total as f64, &int)?;

    for (col, h) in ["Faixa", "Nota", "Chamados", "%"].iter().enumerate() {
        ws.write_with_format(3, col as u16, *h, &hdr)?;
    }
    for (i, f) in sat.distribuicao.iter().enumerate() {
        let row = 4 + i as u32;
        ws.write(row, 0, f.label.as_str())?;
        ws.write_with_format(row, 1, f64::from(f.nota), &int)?;
        ws.write_with_format(row, 2, f.count as f64, &int)?;
        ws.write_with_format(row, 3, fracao(f.count, sat.total), &pct)?;
    }

    ws.set_column_width(0, 26)?;
    ws.set_column_width(1, 10)?;
    ws.set_column_width(2, 12)?;
    ws.set_column_width(3, 10)?;

    Ok(())
}

// ── Aba 5: Chamados ──────────────────────────────────────────────────────

fn write_chamados(wb: &mut Workbook, page: &TicketPage) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Chamados")?;

    let hdr = create_header_format();
    let num = create_number_format();
    let int = create_integer_format();

    let headers = [
        "ID",
        "Abertura",
        "Fechamento",
        "Status",
        "Prioridade",
        "Motivo",
        "Solicitante",
        "Agente",
        "Departamento",
        "TMA (min)",
        "FRT (min)",
        "Satisfação",
    ];
    for (col, h) in headers.iter().enumerate() {
        ws.write_with_format(0, col as u16, *h, &hdr)?;
    }

    for (i, t) in page.tickets.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, t.id.as_str())?;
        ws.write(row, 1, t.data_abertura.as_str())?;
        ws.write(row, 2, t.data_fechamento.as_str())?;
        ws.write(row, 3, t.status.as_str())?;
        ws.write(row, 4, t.prioridade.as_str())?;
        ws.write(row, 5, t.motivo.as_str())?;
        ws.write(row, 6, t.solicitante.as_str())?;
        ws.write(row, 7, t.agente_responsavel.as_str())?;
        ws.write(row, 8, t.departamento.as_str())?;
        // 0 means no data: leave the cell empty
        if t.tma > 0.0 {
            ws.write_with_format(row, 9, t.tma, &num)?;
        }
        if t.frt > 0.0 {
            ws.write_with_format(row, 10, t.frt, &num)?;
        }
        if t.satisfacao > 0 {
            ws.write_with_format(row, 11, f64::from(t.satisfacao), &int)?;
        }
    }

    if !page.tickets.is_empty() {
        ws.autofilter(0, 0, page.tickets.len() as u32, (headers.len() - 1) as u16)?;
    }
    ws.set_freeze_panes(1, 0)?;
    ws.set_column_width(5, 28)?;
    ws.set_column_width(7, 20)?;

    Ok(())
}
