// src/core/sanitize.rs

/// Collapse whitespace runs (NBSP included) to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Counter cell: digits, optionally grouped in threes with `,`.
/// "1,234,567" → 1234567. "12,34", "1,,2" or anything else → None.
pub fn parse_count(s: &str) -> Option<u64> {
    let s = s.trim();
    let mut groups = s.split(',');

    let first = groups.next()?;
    if s.contains(',') && first.len() > 3 { return None; }
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) { return None; }

    let mut digits = s!(first);
    for g in groups {
        if g.len() != 3 || !g.bytes().all(|b| b.is_ascii_digit()) { return None; }
        digits.push_str(g);
    }
    digits.parse().ok()
}

/// Percent cell: "0.02%", "0.02 %" or plain "0.02".
pub fn parse_percent(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    if s.is_empty() { return None; }
    let v: f64 = s.parse().ok()?;
    v.is_finite().then_some(v)
}
