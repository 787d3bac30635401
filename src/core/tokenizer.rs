// src/core/tokenizer.rs

/// Splits a raw input line into tokens.
///
/// # Logic:
/// - Runs of non-space characters outside quotes form one token each.
/// - `"` opens a quoted token that keeps spaces verbatim until the closing `"`.
///   The quoted token is emitted as soon as it closes, even when empty, and
///   anything glued to the closing quote starts a new token.
/// - Repeated spaces never produce empty tokens.
/// - There are no escape sequences. An unterminated quote closes at end of input.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' if in_quotes => {
                tokens.push(std::mem::take(&mut current));
                in_quotes = false;
            }
            '"' => {
                flush(&mut tokens, &mut current);
                in_quotes = true;
            }
            ' ' if !in_quotes => flush(&mut tokens, &mut current),
            _ => current.push(ch),
        }
    }

    if in_quotes {
        log::debug!("Unterminated quote in line '{}', closing it at end of input.", line);
    }
    flush(&mut tokens, &mut current);

    log::trace!("Tokenized {:?} into {:?}", line, tokens);
    tokens
}

/// Emits the pending token unless it is empty.
fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
