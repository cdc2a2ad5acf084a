//! Splitting a push message into try-syntax tokens

/// Extract the try-syntax tokens from a push message.
///
/// Only the line containing the first occurrence of `marker` is considered,
/// starting right after the marker. Returns `None` when the marker does not
/// appear at all.
pub fn split_try_message(message: &str, marker: &str) -> Option<Vec<String>> {
    let start = message.find(marker)? + marker.len();
    let line = message[start..].lines().next().unwrap_or("");
    Some(tokenize(line))
}

/// Split a line on whitespace.
///
/// Whitespace inside `[...]` does not split, so platform filters such as
/// `mochitest[Windows 7,linux64]` stay in one token. Single and double
/// quotes group words and are removed. An unterminated quote or bracket
/// runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                in_token = true;
            }
            '[' => {
                bracket_depth += 1;
                current.push(c);
                in_token = true;
            }
            ']' => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(c);
                in_token = true;
            }
            c if c.is_whitespace() && bracket_depth == 0 => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

/// Split a comma-separated list, ignoring commas inside `[...]`.
///
/// Empty items are dropped and surrounding whitespace is trimmed.
pub fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    for c in value.chars() {
        match c {
            '[' => {
                bracket_depth += 1;
                current.push(c);
            }
            ']' => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(c);
            }
            ',' if bracket_depth == 0 => {
                items.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
