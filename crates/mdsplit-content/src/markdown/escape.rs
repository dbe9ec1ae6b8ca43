//! Markdown escaping utilities.
//!
//! These functions escape text so that re-parsing it yields the same text,
//! and calculate fence/tick lengths for code blocks and inline code.

/// Where a piece of text lands in the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextContext {
    /// Nothing but container prefixes precede the text on its line.
    pub line_start: bool,
    /// The text is part of a heading.
    pub heading: bool,
}

/// Escape text so that Markdown syntax characters stay literal.
///
/// Always escaped: `\`, `*`, `` ` ``, `[`, `]`, `~`, `|`. Escaped when they
/// could start markup: `_` at a word boundary, `<` before a tag-like
/// character, `&` before an entity-like character, `#` at line start or
/// inside headings, and block markers (`>`, `-`, `+`, `=`, `1.`) at line
/// start.
pub(crate) fn escape_text(text: &str, context: TextContext) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    let chars: Vec<char> = text.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        let at_start = context.line_start && i == 0;
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();

        let escape = match c {
            '\\' | '*' | '`' | '[' | ']' | '~' | '|' => true,
            '_' => !(is_word(prev) && is_word(next)),
            '<' => next.is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?')),
            '&' => next.is_some_and(|n| n.is_ascii_alphanumeric() || n == '#'),
            '#' => at_start || context.heading,
            '>' | '-' | '+' | '=' => at_start,
            '.' | ')' => {
                context.line_start
                    && i > 0
                    && i <= 9
                    && chars[..i].iter().all(|d| d.is_ascii_digit())
            }
            _ => false,
        };

        if escape {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

fn is_word(c: Option<char>) -> bool {
    c.is_some_and(char::is_alphanumeric)
}

/// Escape a `!` that ends `output`, so a following `[` opens a link and
/// not an image.
pub(crate) fn escape_trailing_bang(output: &mut String) {
    let Some(before) = output.strip_suffix('!') else {
        return;
    };
    let at = before.len();
    let backslashes = at - before.trim_end_matches('\\').len();
    if backslashes % 2 == 0 {
        output.insert(at, '\\');
    }
}

/// Calculate the minimum fence length needed for a code block.
///
/// Returns the smallest number of fence characters (at least 3) that
/// doesn't appear as a run in the content.
pub(crate) fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    longest_run(content, fence_char).max(2) + 1
}

/// Calculate the minimum backtick count needed for inline code.
///
/// Returns the smallest number of backticks (at least 1) that doesn't
/// appear as a run in the content.
pub(crate) fn calculate_inline_code_ticks(content: &str) -> usize {
    let mut runs = Vec::new();
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
        } else if current_run > 0 {
            runs.push(current_run);
            current_run = 0;
        }
    }
    if current_run > 0 {
        runs.push(current_run);
    }

    (1..).find(|n| !runs.contains(n)).unwrap_or(1)
}

fn longest_run(content: &str, target: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == target {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}
