use std::collections::HashSet;
use std::io::Read;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::columns::{detect_columns, Campo, ColumnMap};
use crate::parser::deserializers::{is_satisfacao_desconhecida, parse_minutos, parse_satisfacao};
use crate::parser::types::{ParseWarning, Ticket, TicketRaw};

/// Output of `parse_csv_reader`: normalized tickets plus import metadata.
#[derive(Debug)]
pub struct ParseOutput {
    pub tickets: Vec<Ticket>,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub missing_fields: Vec<String>,
    pub unique_status: Vec<String>,
    pub parse_duration_ms: u64,
}

/// Parse a ticket export stored on disk.
pub fn parse_csv(path: &str, delimiter: u8) -> Result<ParseOutput, AppError> {
    let file = std::fs::File::open(path)?;
    parse_csv_reader(std::io::BufReader::new(file), delimiter)
}

/// Parse a ticket export already held in memory (the downloaded sheet body).
pub fn parse_csv_str(text: &str, delimiter: u8) -> Result<ParseOutput, AppError> {
    parse_csv_reader(text.as_bytes(), delimiter)
}

/// Core parsing logic, over any `Read` source.
///
/// All or nothing: a malformed record aborts the whole parse. Field-level
/// anomalies (missing columns, bad numbers, unknown satisfaction text) only
/// default the value and add a warning.
pub fn parse_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .double_quote(true)
        .quoting(true)
        .from_reader(reader);

    // Phase 1: detect columns
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let detection = detect_columns(&col_map);
    if detection.missing_fields.len() == Campo::TODOS.len() {
        log::warn!(
            "Nenhuma coluna reconhecida no cabeçalho: {:?}",
            detection.present
        );
    } else if !detection.missing_fields.is_empty() {
        log::debug!("Colunas ausentes: {:?}", detection.missing_fields);
    }

    // Phase 2: normalize records
    let mut tickets: Vec<Ticket> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;
    let mut unique_status: HashSet<String> = HashSet::new();

    for result in rdr.records() {
        row_idx += 1;
        let record = result?;

        if record.iter().all(|f| f.trim().is_empty()) {
            skipped += 1;
            continue;
        }

        let raw = record_to_raw(&col_map, &record);
        let line = row_idx + 1; // +1 for the header row
        let ticket = normalize_ticket(&raw, line, &mut warnings);
        if !ticket.status.is_empty() {
            unique_status.insert(ticket.status.clone());
        }
        tickets.push(ticket);
    }

    let mut unique_status: Vec<String> = unique_status.into_iter().collect();
    unique_status.sort();

    log::debug!(
        "{} chamados lidos ({} linhas em branco, {} avisos)",
        tickets.len(),
        skipped,
        warnings.len()
    );

    Ok(ParseOutput {
        tickets,
        warnings,
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        detected_columns: detection.present,
        missing_fields: detection.missing_fields,
        unique_status,
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> TicketRaw {
    let campo = |c: Campo| col_map.get_campo(record, c).map(str::to_string);
    TicketRaw {
        id: campo(Campo::Id),
        data_abertura: campo(Campo::DataAbertura),
        data_fechamento: campo(Campo::DataFechamento),
        status: campo(Campo::Status),
        prioridade: campo(Campo::Prioridade),
        motivo: campo(Campo::Motivo),
        solucao: campo(Campo::Solucao),
        solicitante: campo(Campo::Solicitante),
        agente_responsavel: campo(Campo::AgenteResponsavel),
        departamento: campo(Campo::Departamento),
        tma: campo(Campo::Tma),
        frt: campo(Campo::Frt),
        satisfacao: campo(Campo::Satisfacao),
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_string()
}

fn minutes(
    value: &Option<String>,
    campo: Campo,
    line: usize,
    warnings: &mut Vec<ParseWarning>,
) -> f64 {
    let Some(s) = value.as_deref() else {
        return 0.0;
    };
    match parse_minutos(s) {
        Some(v) => v,
        None => {
            warnings.push(ParseWarning {
                line,
                message: format!("{} inválido: {:?}", campo.nome(), s),
            });
            0.0
        }
    }
}

fn normalize_ticket(raw: &TicketRaw, line: usize, warnings: &mut Vec<ParseWarning>) -> Ticket {
    let satisfacao_str = raw.satisfacao.as_deref().unwrap_or("");
    if is_satisfacao_desconhecida(satisfacao_str) {
        warnings.push(ParseWarning {
            line,
            message: format!("Satisfação não reconhecida: {:?}", satisfacao_str.trim()),
        });
    }

    Ticket {
        id: text(&raw.id),
        data_abertura: text(&raw.data_abertura),
        data_fechamento: text(&raw.data_fechamento),
        status: text(&raw.status),
        prioridade: text(&raw.prioridade),
        motivo: text(&raw.motivo),
        solucao: raw.solucao.as_deref().unwrap_or("").to_string(),
        solicitante: text(&raw.solicitante),
        agente_responsavel: text(&raw.agente_responsavel),
        departamento: text(&raw.departamento),
        tma: minutes(&raw.tma, Campo::Tma, line, warnings),
        frt: minutes(&raw.frt, Campo::Frt, line, warnings),
        satisfacao: parse_satisfacao(satisfacao_str),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
