use std::collections::HashMap;

/// Ticket fields recognized in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Campo {
    Id,
    DataAbertura,
    DataFechamento,
    Status,
    Prioridade,
    Motivo,
    Solucao,
    Solicitante,
    AgenteResponsavel,
    Departamento,
    Tma,
    Frt,
    Satisfacao,
}

impl Campo {
    pub const TODOS: [Campo; 13] = [
        Campo::Id,
        Campo::DataAbertura,
        Campo::DataFechamento,
        Campo::Status,
        Campo::Prioridade,
        Campo::Motivo,
        Campo::Solucao,
        Campo::Solicitante,
        Campo::AgenteResponsavel,
        Campo::Departamento,
        Campo::Tma,
        Campo::Frt,
        Campo::Satisfacao,
    ];

    /// Header names accepted for the field, in priority order:
    /// the localized sheet header first, then the short internal key.
    pub fn candidatos(self) -> &'static [&'static str] {
        match self {
            Campo::Id => &["ID do Chamado", "id"],
            Campo::DataAbertura => &["Data de Abertura", "dataAbertura"],
            Campo::DataFechamento => &["Data de Fechamento", "dataFechamento"],
            Campo::Status => &["Status", "status"],
            Campo::Prioridade => &["Prioridade", "prioridade"],
            Campo::Motivo => &["Motivo", "motivo"],
            Campo::Solucao => &["Solução", "solucao"],
            Campo::Solicitante => &["Solicitante", "solicitante"],
            Campo::AgenteResponsavel => &["Agente Responsável", "agenteResponsavel"],
            Campo::Departamento => &["Departamento", "departamento"],
            Campo::Tma => &["TMA (minutos)", "tma"],
            Campo::Frt => &["FRT (minutos)", "frt"],
            Campo::Satisfacao => &["Satisfação do Cliente", "satisfacao"],
        }
    }

    /// Localized header, used in reports.
    pub fn nome(self) -> &'static str {
        self.candidatos()[0]
    }
}

/// Maps column names to their index in a CSV record.
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Build a ColumnMap from the CSV header record.
    /// Header fields are trimmed of surrounding whitespace.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim().to_string();
            // duplicated header: first occurrence wins
            indices.entry(name.clone()).or_insert(i);
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    /// Get the value of a named column from a record.
    pub fn get<'a>(&self, record: &'a csv::StringRecord, col: &str) -> Option<&'a str> {
        self.indices.get(col).and_then(|&i| record.get(i))
    }

    /// First non-blank value among the field's candidate columns.
    pub fn get_campo<'a>(&self, record: &'a csv::StringRecord, campo: Campo) -> Option<&'a str> {
        campo
            .candidatos()
            .iter()
            .filter_map(|col| self.get(record, col))
            .find(|v| !v.trim().is_empty())
    }

    /// Returns true if the column is present in the CSV headers.
    pub fn has(&self, col: &str) -> bool {
        self.indices.contains_key(col)
    }

    /// Returns true if any candidate column of the field is present.
    pub fn has_campo(&self, campo: Campo) -> bool {
        campo.candidatos().iter().any(|c| self.has(c))
    }

    /// All header names in order.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

/// Result of column detection.
#[derive(Debug)]
pub struct ColumnValidation {
    /// All column names present in the CSV.
    pub present: Vec<String>,
    /// Fields for which none of the candidate columns exists.
    pub missing_fields: Vec<String>,
}

/// Detect which fields can be resolved. Missing columns are not an error:
/// the affected fields fall back to their defaults.
pub fn detect_columns(col_map: &ColumnMap) -> ColumnValidation {
    let missing_fields = Campo::TODOS
        .iter()
        .filter(|&&c| !col_map.has_campo(c))
        .map(|c| c.nome().to_string())
        .collect();

    ColumnValidation {
        present: col_map.all_headers().to_vec(),
        missing_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_headers(cols: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cols.to_vec())
    }

    #[test]
    fn test_column_map_basic() {
        let headers = make_headers(&["ID do Chamado", "Status", "Motivo"]);
        let cm = ColumnMap::from_headers(&headers);
        assert!(cm.has("ID do Chamado"));
        assert!(cm.has("Status"));
        assert!(!cm.has("Missing"));
    }

    #[test]
    fn test_get_campo_prefers_localized_header() {
        let headers = make_headers(&["status", "Status"]);
        let cm = ColumnMap::from_headers(&headers);
        let record = csv::StringRecord::from(vec!["curto", "Aberto"]);
        assert_eq!(cm.get_campo(&record, Campo::Status), Some("Aberto"));
    }

    #[test]
    fn test_get_campo_falls_back_to_short_key() {
        let headers = make_headers(&["id", "agenteResponsavel"]);
        let cm = ColumnMap::from_headers(&headers);
        let record = csv::StringRecord::from(vec!["42", "Ana"]);
        assert_eq!(cm.get_campo(&record, Campo::Id), Some("42"));
        assert_eq!(cm.get_campo(&record, Campo::AgenteResponsavel), Some("Ana"));
        assert_eq!(cm.get_campo(&record, Campo::Motivo), None);
    }

    #[test]
    fn test_get_campo_skips_blank_localized_value() {
        let headers = make_headers(&["Motivo", "motivo"]);
        let cm = ColumnMap::from_headers(&headers);
        let record = csv::StringRecord::from(vec!["  ", "Senha"]);
        assert_eq!(cm.get_campo(&record, Campo::Motivo), Some("Senha"));
    }

    #[test]
    fn test_detect_columns_reports_missing_fields() {
        let headers = make_headers(&["ID do Chamado", "status", "FRT (minutos)"]);
        let cm = ColumnMap::from_headers(&headers);
        let val = detect_columns(&cm);
        assert_eq!(val.present.len(), 3);
        assert!(!val.missing_fields.contains(&"Status".to_string()));
        assert!(!val.missing_fields.contains(&"FRT (minutos)".to_string()));
        assert!(val.missing_fields.contains(&"Satisfação do Cliente".to_string()));
        assert_eq!(val.missing_fields.len(), Campo::TODOS.len() - 3);
    }

    #[test]
    fn test_column_map_trim_whitespace() {
        let headers = make_headers(&[" Status ", " Motivo"]);
        let cm = ColumnMap::from_headers(&headers);
        assert!(cm.has("Status"));
        assert!(cm.has("Motivo"));
    }
}
