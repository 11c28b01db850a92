//! Sample configuration templates.

use crate::schema::Schema;
use crate::value::Value;

/// Width templates and messages are wrapped to.
pub const WIDTH: usize = 70;

const HELP_PREFIX: &str = "# ";

/// Renders a sample configuration for `schema`.
///
/// Every setting appears once, as `key : example`, in schema order. Help
/// text is written above its setting as `#` comments, followed by the
/// allowed values of enumerated settings. The result reads back through
/// [`load_config`](crate::load_config) and validates against `schema`.
///
/// # Examples
///
/// ```
/// use confschema::{load_schema, sample_config};
///
/// let schema = load_schema(
///     "!!omap\n\
///      - pdb model : [str, my_model.pdb, null]\n\
///      - reset b-facs : [float, -1, New B factor (-1 for no reset), -1]\n",
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(
///     sample_config(&schema),
///     "%YAML 1.2\n---\n\npdb model : my_model.pdb\n\n\
///      ## New B factor (-1 for no reset)\nreset b-facs : -1"
/// );
/// ```
#[must_use]
pub fn sample_config(schema: &Schema) -> String {
    let mut lines = vec!["%YAML 1.2".to_string(), "---".to_string()];
    let mut was_help = true;

    for (i, (key, entry)) in schema.iter().enumerate() {
        if was_help {
            lines.push(String::new());
        }
        let setting = setting_line(key, entry.example());

        match entry.help() {
            Some(help) => {
                if !was_help && i > 0 {
                    lines.push(String::new());
                }
                lines.push(fill(help, WIDTH, HELP_PREFIX));
                if let Some(choices) = entry.converter().choices() {
                    let listed: Vec<String> = choices.iter().map(ToString::to_string).collect();
                    lines.push(fill(&format!("One of: {}", listed.join(", ")), WIDTH, HELP_PREFIX));
                }
                lines.push(setting);
                was_help = true;
            }
            None => {
                lines.push(setting);
                was_help = false;
            }
        }
    }

    log::debug!("rendered sample for {} settings", schema.len());
    lines.join("\n")
}

/// Longest key YAML reads as an implicit `key : value` key.
const MAX_IMPLICIT_KEY: usize = 1024;

fn setting_line(key: &str, example: &Value) -> String {
    let key = Value::from(key).literal();
    let example = example.literal();
    if key.len() + " :".len() >= MAX_IMPLICIT_KEY {
        format!("? {key}\n: {example}")
    } else {
        format!("{key} : {example}")
    }
}

/// Wraps `text` into lines of at most `width` characters, each starting with
/// `prefix`.
///
/// Tabs expand to eight-column stops and every whitespace character becomes
/// a space. Lines break between words or after the hyphen of a hyphenated
/// word (`well-known`); spaces at a line break are dropped, other runs of
/// spaces are kept. Words longer than a line are split, after a hyphen when
/// one fits. Empty text gives an empty string.
///
/// ```
/// use confschema::sample::fill;
///
/// assert_eq!(fill("one two three", 9, "# "), "# one two\n# three");
/// assert_eq!(fill("a well-known fact", 12, "# "), "# a well-\n# known fact");
/// ```
#[must_use]
pub fn fill(text: &str, width: usize, prefix: &str) -> String {
    let room = width.saturating_sub(prefix.chars().count()).max(1);
    let mut chunks = split_chunks(&expand_whitespace(text));
    chunks.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        let mut line: Vec<String> = Vec::new();
        let mut len = 0;
        while let Some(chunk) = chunks.last() {
            let chunk_len = chunk.chars().count();
            if len + chunk_len > room {
                break;
            }
            len += chunk_len;
            line.extend(chunks.pop());
        }

        if let Some(long) = chunks.last_mut() {
            if long.chars().count() > room {
                let head = split_long_word(long, room - len);
                if !head.is_empty() {
                    line.push(head);
                }
            }
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(format!("{prefix}{}", line.concat()));
        }
    }
    lines.join("\n")
}

fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(|c| c == ' ')
}

fn expand_whitespace(text: &str) -> String {
    const TAB: usize = 8;
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let spaces = TAB - column % TAB;
                out.extend(std::iter::repeat(' ').take(spaces));
                column += spaces;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            c if c.is_whitespace() => {
                out.push(' ');
                column += 1;
            }
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Splits text into runs of spaces and words, breaking words after inner
/// hyphens that join letters (`ab-cd`, `a-b-cd`).
fn split_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let letter_at = |i: usize| chars.get(i).copied().is_some_and(is_letter);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if current.chars().last().is_some_and(|prev| (prev == ' ') != (c == ' ')) {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);

        let joins_letters = c == '-'
            && i >= 2
            && letter_at(i - 1)
            && (letter_at(i - 2) || (i >= 3 && chars[i - 2] == '-' && letter_at(i - 3)))
            && letter_at(i + 1)
            && (letter_at(i + 2) || (chars.get(i + 2) == Some(&'-') && letter_at(i + 3)));
        if joins_letters {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Takes up to `space` characters off the front of `word`, cutting after
/// the last hyphen in that span when there is one.
fn split_long_word(word: &mut String, space: usize) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut end = space.min(chars.len());
    if let Some(hyphen) = chars[..end].iter().rposition(|&c| c == '-') {
        if hyphen > 0 && chars[..hyphen].iter().any(|&c| c != '-') {
            end = hyphen + 1;
        }
    }
    let head: String = chars[..end].iter().collect();
    *word = chars[end..].iter().collect();
    head
}
