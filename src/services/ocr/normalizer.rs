use regex::Regex;
use std::sync::OnceLock;

/// Pattern for deposit-code candidates in recognized text:
/// - optional letter, optional dash, then 1-10 more digits allowing
///   embedded commas/periods (e.g. "E-3800", "12,500")
/// - or a bare 2-10 digit run
const CODE_PATTERN: &str = r"(?:[A-Za-z]?-?\d[\d,\.]{1,10}|\d{2,10})";

/// Splits a matched token into letter prefix, dash, and digit run
const SPLIT_PATTERN: &str = r"^([A-Za-z])?(-)?([\d,\.]+)";

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CODE_PATTERN).expect("hard-coded pattern"))
}

fn split_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SPLIT_PATTERN).expect("hard-coded pattern"))
}

/// Extract and normalize a deposit code from recognized text
///
/// Returns `(normalized_code, raw_matched_token)`. Only the first match in
/// the text is considered. The normalized code is the uppercased prefix
/// (single letter, or dash when there is no letter) followed by the digit
/// run with commas and periods stripped.
pub fn extract_code(raw_text: &str) -> (Option<String>, Option<String>) {
    if raw_text.is_empty() {
        return (None, None);
    }

    let Some(m) = code_regex().find(raw_text) else {
        // No candidate pattern: no code, raw text carried through for diagnostics
        return (None, Some(raw_text.to_string()));
    };
    let raw = m.as_str().to_uppercase();

    if !raw.chars().any(|c| c.is_ascii_digit()) {
        // Digit-free token passed through unchanged. Both pattern
        // alternatives require a digit, so this arm is unreachable with the
        // pattern above; kept for parity with the reference behavior.
        return (Some(raw.clone()), Some(raw));
    }

    let candidate = match split_regex().captures(&raw) {
        Some(caps) => {
            let digits: String = caps[3].chars().filter(|c| c.is_ascii_digit()).collect();
            // Single-character prefix normal form: the letter wins over the dash
            let prefix = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or("");
            format!("{}{}", prefix, digits)
        }
        None => raw.replace([',', '.'], ""),
    };

    (Some(candidate), Some(raw))
}
