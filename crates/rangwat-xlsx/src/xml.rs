//! XML text helpers shared by the writer and reader

/// Escape the five predefined XML entities
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

/// Escape cell text for a `<t>` element.
///
/// Besides the predefined entities, characters XML 1.0 cannot carry (and
/// `\r`, which readers normalize away) are written as Excel `_xHHHH_`
/// escapes. An underscore followed by `x` and four hex digits is written as
/// `_x005F_` so the text decodes back unchanged.
pub(crate) fn escape_cell_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (pos, c) in s.char_indices() {
        match c {
            '_' if starts_hex_run(&s[pos..]) => out.push_str("_x005F_"),
            '\t' | '\n' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                out.push_str(&format!("_x{:04X}_", c as u32));
            }
            c => push_escaped(&mut out, c),
        }
    }
    out
}

/// Whether a `<t>` element needs `xml:space="preserve"` to keep `s` intact
pub(crate) fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x005f_` = Underscore (escaped underscore)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if starts_excel_escape(rest) {
            let decoded = u32::from_str_radix(&rest[2..6], 16)
                .ok()
                .and_then(char::from_u32);
            if let Some(c) = decoded {
                result.push(c);
                rest = &rest[7..];
                continue;
            }
        }

        result.push('_');
        rest = &rest[1..];
    }

    result.push_str(rest);
    result
}

/// `_x` followed by four hex digits and a closing `_`
fn starts_excel_escape(s: &str) -> bool {
    starts_hex_run(s) && s.as_bytes().get(6) == Some(&b'_')
}

/// `_x` followed by four hex digits
fn starts_hex_run(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 6
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&apos;"),
        c => out.push(c),
    }
}
