const MAX_VISIBLE_CHARS: usize = 100;

const SECRET_MARKERS: [&str; 5] = ["Bearer ", "api_key=", "password=", "secret=", "token="];

/// Shortens prompt or model text for log lines and masks anything that looks
/// like a credential.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{head}... ({total_chars} chars total)")
    } else {
        trimmed.to_string()
    };

    SECRET_MARKERS
        .iter()
        .fold(visible, |text, marker| redact_after(&text, marker))
}

fn redact_after(text: &str, marker: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        result.push_str(&rest[..value_start]);
        result.push_str("[REDACTED]");

        let value = &rest[value_start..];
        let value_len = value
            .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\''))
            .unwrap_or(value.len());
        rest = &value[value_len..];
    }

    result.push_str(rest);
    result
}
