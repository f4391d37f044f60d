use std::mem;

/// Characters a backslash may escape inside double quotes.
const DOUBLE_QUOTE_ESCAPES: &[char] = &['\\', '$', '"'];

/// Argument separators: the ASCII set C's `isspace` accepts. Other Unicode
/// spaces such as U+00A0 are ordinary characters.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Tokenizes shell input into a vector of arguments.
///
/// Whitespace outside quotes separates arguments. Quoted and unquoted
/// fragments with nothing between them join into a single argument, so
/// `foo'bar'"baz"` is one argument. `''` and `""` produce an empty argument.
///
/// Quoting rules:
/// - inside single quotes every character is literal;
/// - inside double quotes a backslash only escapes `\`, `$` and `"`;
/// - outside quotes a backslash makes the next character literal, and a
///   trailing lone backslash is dropped.
///
/// An unterminated quote is closed at the end of the input.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Set once the current argument has started, even if it is still empty.
    let mut in_token = false;
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_single_quote {
            if c == '\'' {
                in_single_quote = false;
            } else {
                current.push(c);
            }
        } else if in_double_quote {
            match c {
                '"' => in_double_quote = false,
                '\\' => match chars.peek() {
                    Some(&next) if DOUBLE_QUOTE_ESCAPES.contains(&next) => {
                        chars.next();
                        current.push(next);
                    }
                    _ => current.push(c),
                },
                _ => current.push(c),
            }
        } else if c == '\\' {
            if let Some(next) = chars.next() {
                in_token = true;
                current.push(next);
            }
        } else if c == '\'' {
            in_token = true;
            in_single_quote = true;
        } else if c == '"' {
            in_token = true;
            in_double_quote = true;
        } else if is_separator(c) {
            if in_token {
                tokens.push(mem::take(&mut current));
                in_token = false;
            }
        } else {
            in_token = true;
            current.push(c);
        }
    }

    if in_token {
        tokens.push(current);
    }

    log::trace!("tokenized {:?} into {:?}", input, tokens);
    tokens
}
