//! # Message Formatting
//!
//! Grammatical list joins used in verdict messages.
//!
//! Inputs are de-duplicated and sorted case-insensitively, then joined as
//! `"a, b and c"` (or `"a, b or c"`).

const SEPARATOR_AND: &str = " and ";
const SEPARATOR_OR: &str = " or ";

fn concat_with_comma_and_separator<I, S>(strings: I, separator: &str, lowercase: bool) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items: Vec<String> = Vec::new();
    for s in strings {
        let s = if lowercase {
            s.as_ref().to_lowercase()
        } else {
            s.as_ref().to_string()
        };
        if !items.contains(&s) {
            items.push(s);
        }
    }
    items.sort_by_key(|s| s.to_lowercase());

    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{}{}{}", rest.join(", "), separator, last),
    }
}

/// `"a, b and c"`
pub fn concat<I, S>(strings: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    concat_with_comma_and_separator(strings, SEPARATOR_AND, false)
}

/// Lower-cased `"a, b or c"`
pub fn concat_lowercase_with_comma_and_or<I, S>(strings: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    concat_with_comma_and_separator(strings, SEPARATOR_OR, true)
}
