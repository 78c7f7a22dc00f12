/// Rewrite compact JSON into the object-literal form client-side scripts
/// embed.
///
/// Object keys made only of ASCII letters, digits and `_` lose their quotes.
/// String values without single quotes or commas switch to single quotes;
/// their escapes read the same under either quote.
/// Everything else is left as is.
#[must_use]
pub fn normalize(json: &str) -> String {
    let bytes = json.as_bytes();
    let mut out = String::with_capacity(json.len());
    let mut pos = 0;

    while let Some(offset) = json[pos..].find('"') {
        let start = pos + offset;
        out.push_str(&json[pos..start]);

        let Some(end) = closing_quote(bytes, start + 1) else {
            out.push_str(&json[start..]);
            return out;
        };
        let inner = &json[start + 1..end];
        let is_key = json[end + 1..].trim_start().starts_with(':');

        if is_key && is_bare_key(inner) {
            out.push_str(inner);
        } else if !is_key && !inner.contains(['\'', ',']) {
            out.push('\'');
            out.push_str(inner);
            out.push('\'');
        } else {
            out.push_str(&json[start..=end]);
        }
        pos = end + 1;
    }

    out.push_str(&json[pos..]);
    out
}

/// Index of the quote closing a string whose content starts at `from`.
fn closing_quote(bytes: &[u8], mut from: usize) -> Option<usize> {
    while from < bytes.len() {
        match bytes[from] {
            b'\\' => from += 2,
            b'"' => return Some(from),
            _ => from += 1,
        }
    }
    None
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
