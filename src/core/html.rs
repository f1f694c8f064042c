// src/core/html.rs
// Low-level HTML string helpers, deliberately naive but tailored to the
// Brutalball site structure. Case-insensitive on ASCII tag/attribute names.

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Find the section between an opening tag (with attributes) and its closing
/// tag. Returns the HTML *inside* the opening/closing tags.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lower(s);
    let open = to_lower(open_pat);
    let close = to_lower(close_pat);
    let o = lc.find(&open)?;
    let after = s[o..].find('>')? + o + 1;
    let cr = lc[after..].find(&close)?;
    Some(&s[after..after + cr])
}

/// Find the next complete tag block from `from` onwards.
/// A block is from the start of the opening tag to the end of the closing tag.
/// No nesting: the first closing tag wins, e.g. `<td ...> ... </td>`.
pub fn next_tag_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let start = lc.get(from..)?.find(&ol)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&cl)?;
    let end = open_end + end_rel + c.len();
    Some((start, end))
}

/// Like `next_tag_block_ci`, but tracks nesting depth so container tags
/// (`<div>`, `<dl>`) that hold children of the same name resolve to the
/// matching close, not the first one.
pub fn next_nested_block_ci(s: &str, o: &str, c: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let start = lc.get(from..)?.find(&ol)? + from;
    let mut depth = 1usize;
    let mut pos = s[start..].find('>')? + start + 1;
    loop {
        let next_open = lc[pos..].find(&ol);
        let next_close = lc[pos..].find(&cl)?;
        match next_open {
            Some(no) if no < next_close => {
                depth += 1;
                pos += no + ol.len();
            }
            _ => {
                pos += next_close + cl.len();
                depth -= 1;
                if depth == 0 {
                    return Some((start, pos));
                }
            }
        }
    }
}

/// Given a complete tag block like `<td ...>INNER</td>`,
/// return the INNER text without the wrapping tags (may contain nested tags).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// The opening tag of a block, `<td width="22">` say, including brackets.
pub fn open_tag(block: &str) -> &str {
    match block.find('>') {
        Some(i) => &block[..=i],
        None => block,
    }
}

/// Extract an attribute value from an opening tag. Handles `a="v"`, `a='v'`
/// and unquoted `a=v`. Attribute name match is ASCII case-insensitive.
pub fn attr_value(tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(tag);
    let needle = format!("{}=", to_lower(name));
    let mut search = 0usize;
    loop {
        let i = lc[search..].find(&needle)? + search;
        // Must be preceded by whitespace so "data-player=" never matches "player="
        let ok = i == 0 || lc.as_bytes()[i - 1].is_ascii_whitespace();
        if !ok {
            search = i + needle.len();
            continue;
        }
        let rest = &tag[i + needle.len()..];
        let mut chars = rest.chars();
        return Some(match chars.next() {
            Some(q @ ('"' | '\'')) => {
                let tail = &rest[1..];
                match tail.find(q) {
                    Some(e) => tail[..e].to_string(),
                    None => tail.trim_end_matches('>').to_string(),
                }
            }
            _ => rest
                .split(|c: char| c.is_ascii_whitespace() || c == '>')
                .next()
                .unwrap_or("")
                .to_string(),
        });
    }
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}
