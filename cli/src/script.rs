/// Split a SQL script into statements on `;`.
///
/// A `;` inside a string literal, a quoted identifier (`"x"`, `` `x` ``, `[x]`) or a comment
/// (`-- ...`, `/* ... */`) does not end a statement. Trigger bodies (`BEGIN ...; END`) are not
/// recognised and get split.
pub(crate) fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let close = match c {
            '\'' => Some('\''),
            '"' => Some('"'),
            '`' => Some('`'),
            '[' => Some(']'),
            '-' if chars.peek() == Some(&'-') => Some('\n'),
            '/' if chars.peek() == Some(&'*') => {
                if let Some(star) = chars.next() {
                    current.push(star);
                }
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    current.push(inner);
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
                None
            }
            ';' => {
                current.pop();
                push_statement(&mut statements, &current);
                current.clear();
                None
            }
            _ => None,
        };
        // A doubled quote ends the literal and reopens it, so `''` needs no special case.
        if let Some(close) = close {
            for inner in chars.by_ref() {
                current.push(inner);
                if inner == close {
                    break;
                }
            }
        }
    }
    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && !is_only_comments(trimmed) {
        statements.push(trimmed.to_owned());
    }
}

fn is_only_comments(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}
