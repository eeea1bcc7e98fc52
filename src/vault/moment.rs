//! Moment.js date templates to chrono strftime

/// Longest tokens first so `YYYY` wins over `YY`
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%A"),
    ("DDD", "%a"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("ZZ", "%z"),
    ("Z", "%z"),
    ("A", "%p"),
    ("a", "%P"),
];

/// Translates the Moment tokens Obsidian plugins use into a strftime layout.
///
/// `[literal]` sections and `\x` escapes are copied verbatim. Returns `None`
/// for an unterminated `[`.
pub fn to_strftime(format: &str) -> Option<String> {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        match c {
            '[' => {
                let end = rest.find(']')?;
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
            }
            '\\' => {
                let mut chars = rest[1..].chars();
                match chars.next() {
                    Some(escaped) => {
                        push_literal(&mut out, escaped.encode_utf8(&mut [0; 4]));
                        rest = chars.as_str();
                    }
                    None => {
                        out.push('\\');
                        rest = "";
                    }
                }
            }
            _ => match TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
                Some((token, layout)) => {
                    out.push_str(layout);
                    rest = &rest[token.len()..];
                }
                None => {
                    push_literal(&mut out, c.encode_utf8(&mut [0; 4]));
                    rest = &rest[c.len_utf8()..];
                }
            },
        }
    }

    Some(out)
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// True if `value` contains any Moment date/time token letter
pub fn looks_like_template(value: &str) -> bool {
    value.contains(['Y', 'M', 'D', 'H', 'h', 'm', 's'])
}
