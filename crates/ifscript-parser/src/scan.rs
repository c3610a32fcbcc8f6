//! Line classification, comment stripping, and `if`/`endif` token scanning
//! (spec.md §4.3 steps 4–5).

/// A line is an "option line" — and therefore exempt from `//`, `if`,
/// `endif` scanning — if it contains any `@` (spec.md §9 "Open question —
/// option classification heuristic": the misclassification this causes for
/// `@` inside `{ }` output text is preserved on purpose, not corrected).
pub fn is_option_line(line: &str) -> bool {
    line.contains('@')
}

fn line_bounds(text: &str, pos: usize) -> (usize, usize) {
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[pos..]
        .find('\n')
        .map(|i| pos + i)
        .unwrap_or(text.len());
    (start, end)
}

/// True if `pos` sits strictly inside a `{ … }` span on its own line (no
/// crossing of line boundaries, spec.md §4.3 step 4).
fn inside_braces_on_line(line: &str, pos_in_line: usize) -> bool {
    let open = line[..pos_in_line].matches('{').count();
    let close = line[..pos_in_line].matches('}').count();
    open > close
}

/// Strip `//` line comments per spec.md §4.3 step 4: a `//` is a comment
/// unless it is inside a `{ }` output literal on that line, or the line
/// contains `@`. Repeats until no remaining `//` qualifies (idempotent,
/// testable property 7 of spec.md §8).
pub fn strip_comments(mut text: String) -> String {
    loop {
        let Some(pos) = find_comment(&text) else {
            return text;
        };
        let (_line_start, line_end) = line_bounds(&text, pos);
        text.replace_range(pos..line_end, "");
    }
}

fn find_comment(text: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find("//") {
        let pos = search_from + rel;
        let (line_start, _line_end) = line_bounds(text, pos);
        let line_upto_pos = &text[line_start..pos];
        let line_full_end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
        let line = &text[line_start..line_full_end];
        if !is_option_line(line) && !inside_braces_on_line(line_upto_pos, line_upto_pos.len()) {
            return Some(pos);
        }
        search_from = pos + 2;
    }
    None
}

/// A located `if`/`endif` keyword token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    If,
    EndIf,
}

#[derive(Debug, Clone, Copy)]
pub struct IfToken {
    pub kind: TokenKind,
    pub pos: usize,
}

fn is_word_boundary(c: Option<char>) -> bool {
    !matches!(c, Some(c) if c.is_alphanumeric() || c == '_')
}

/// Find every standalone `if`/`endif` keyword, ignoring matches inside
/// `{ }` on their line or on option lines (spec.md §4.3 step 5).
pub fn scan_if_endif(text: &str) -> Vec<IfToken> {
    let mut tokens = Vec::new();
    for keyword in ["endif", "if"] {
        // `endif` is scanned first so its `if` substring inside the word
        // isn't also matched by the `if` pass below.
        let mut search_from = 0;
        while let Some(rel) = text[search_from..].find(keyword) {
            let pos = search_from + rel;
            let before = text[..pos].chars().next_back();
            let after = text[pos + keyword.len()..].chars().next();
            search_from = pos + keyword.len();

            if !is_word_boundary(before) || !is_word_boundary(after) {
                continue;
            }
            let (line_start, line_full_end) = {
                let (s, _) = line_bounds(text, pos);
                let e = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
                (s, e)
            };
            let line = &text[line_start..line_full_end];
            let pos_in_line = pos - line_start;
            if is_option_line(line) || inside_braces_on_line(line, pos_in_line) {
                continue;
            }
            tokens.push(IfToken {
                kind: if keyword == "if" {
                    TokenKind::If
                } else {
                    TokenKind::EndIf
                },
                pos,
            });
        }
    }
    tokens.sort_by_key(|t| t.pos);
    // Reject an `endif` token whose span overlaps the `if` keyword it
    // shares a position prefix with (shouldn't happen given the scans
    // above use disjoint keyword lengths, but guards against future typos).
    tokens
}

/// The rest of the line starting at `pos` (used to capture the raw
/// condition text of an `if` token), trailing-whitespace trimmed.
pub fn rest_of_line(text: &str, pos: usize) -> &str {
    let end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
    text[pos..end].trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_real_comment() {
        let out = strip_comments("{hi} // a comment\nnext".to_string());
        assert_eq!(out, "{hi} \nnext");
    }

    #[test]
    fn preserves_slash_slash_inside_braces() {
        let out = strip_comments("{http://example.com}".to_string());
        assert_eq!(out, "{http://example.com}");
    }

    #[test]
    fn preserves_slash_slash_on_option_line() {
        let out = strip_comments("http://example.com@fork".to_string());
        assert_eq!(out, "http://example.com@fork");
    }

    #[test]
    fn idempotent() {
        let once = strip_comments("{a} // c1\nstill // c2".to_string());
        let twice = strip_comments(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn finds_if_endif_pair() {
        let text = "if x > 1\n{big}\nendif\n";
        let tokens = scan_if_endif(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::If);
        assert_eq!(tokens[1].kind, TokenKind::EndIf);
    }

    #[test]
    fn ignores_if_inside_braces() {
        let text = "{the gift of life}\n";
        assert!(scan_if_endif(text).is_empty());
    }

    #[test]
    fn ignores_if_on_option_line() {
        let text = "if x@fork\n";
        assert!(scan_if_endif(text).is_empty());
    }
}
