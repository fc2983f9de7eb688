/// Qualitative satisfaction vocabulary, keyed on lower-cased trimmed text.
pub const ESCALA_SATISFACAO: &[(&str, u8)] = &[
    ("excelente", 5),
    ("muito bom", 5),
    ("ótimo", 5),
    ("otimo", 5),
    ("bom", 4),
    ("médio", 3),
    ("medio", 3),
    ("regular", 2),
    ("ruim", 1),
    ("péssimo", 1),
    ("pessimo", 1),
];

/// Parse the longest leading decimal number of `s` ("12.5 min" → 12.5).
/// A comma is read as the decimal separator when no dot is present ("7,5" → 7.5).
/// Returns None for empty strings, text without a leading number, or non-finite values.
pub fn parse_leading_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let owned;
    let text = if trimmed.contains(',') && !trimmed.contains('.') {
        owned = trimmed.replacen(',', ".", 1);
        owned.as_str()
    } else {
        trimmed
    };

    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut j = end + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > end + 1 || has_digits {
            has_digits |= j > end + 1;
            end = j;
        }
    }
    if !has_digits {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Minutes field ("" or garbage → None).
pub fn parse_minutos(s: &str) -> Option<f64> {
    parse_leading_f64(s)
}

/// Satisfaction score in 0..=5, 0 meaning not rated.
/// Vocabulary terms first, then a numeric reading rounded to the nearest
/// integer; anything outside 1..=5 is 0.
pub fn parse_satisfacao(s: &str) -> u8 {
    let normalized = s.trim().to_lowercase();
    if let Some(&(_, nota)) = ESCALA_SATISFACAO
        .iter()
        .find(|(termo, _)| *termo == normalized)
    {
        return nota;
    }
    parse_leading_f64(&normalized)
        .map(f64::round)
        .filter(|v| (1.0..=5.0).contains(v))
        .map(|v| v as u8)
        .unwrap_or(0)
}

/// True when `s` is neither blank, a vocabulary term nor a number.
pub fn is_satisfacao_desconhecida(s: &str) -> bool {
    let normalized = s.trim().to_lowercase();
    !normalized.is_empty()
        && !ESCALA_SATISFACAO.iter().any(|(termo, _)| *termo == normalized)
        && parse_leading_f64(&normalized).is_none()
}
