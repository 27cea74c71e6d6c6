//! Field-name casing used on the wire.
//!
//! The API spells multi-word keys in `lowerCamelCase`, except that the word
//! `id` is written fully upper-case when it is not the first word:
//! `sovereign_id` travels as `sovereignID`, not `sovereignId`.
//!
//! Both directions go through the same word segmentation, so
//! [`to_wire_name`] and [`to_snake_name`] are idempotent and invert each other
//! for names made of lower-case alphabetic words.

/// Splits a name written in either convention into lower-case words.
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '_' {
            flush(&mut current, &mut words);
            i += 1;
            continue;
        }
        if c.is_ascii_uppercase() {
            flush(&mut current, &mut words);
            let id_token = c == 'I'
                && chars.get(i + 1) == Some(&'D')
                && chars.get(i + 2).map_or(true, |next| !next.is_ascii_lowercase());
            if id_token {
                words.push("id".to_string());
                i += 2;
                continue;
            }
            current.push(c.to_ascii_lowercase());
        } else {
            current.push(c);
        }
        i += 1;
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Converts a field name to the API's key spelling.
///
/// ```
/// use anacreon_wire::to_wire_name;
/// assert_eq!(to_wire_name("sovereign_id"), "sovereignID");
/// assert_eq!(to_wire_name("next_update_time"), "nextUpdateTime");
/// ```
pub fn to_wire_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (index, word) in words(name).iter().enumerate() {
        if index == 0 {
            out.push_str(word);
        } else if word == "id" {
            out.push_str("ID");
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.extend(chars);
            }
        }
    }
    out
}

/// Converts an API key back to its `snake_case` field name.
pub fn to_snake_name(name: &str) -> String {
    words(name).join("_")
}
