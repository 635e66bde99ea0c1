//! Typographic replacements for text nodes: smart quotes, dashes, ellipsis
//! and the `(c)`, `(r)`, `(tm)`, `+-` symbols.

use std::iter::Peekable;
use std::str::Chars;

/// Applies replacements to one run of literal text.
///
/// `preceding` is the last character emitted before this run in the same
/// inline block, so quotes after an emphasis or link close correctly. Code is
/// never passed through here.
pub fn apply_typography(input: &str, preceding: Option<char>) -> String {
    if !input.contains(['"', '\'', '-', '.', '(', '+']) {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        let prev = out.chars().next_back().or(preceding);
        replace_punctuation(c, prev, &mut chars, &mut out);
    }
    out
}

fn is_opening(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || "([{\"'\u{201c}\u{2018}".contains(c),
    }
}

/// Replaces ASCII punctuation with typographic Unicode equivalents.
fn replace_punctuation(
    c: char,
    prev: Option<char>,
    chars: &mut Peekable<Chars<'_>>,
    out: &mut String,
) {
    match c {
        '-' => match chars.peek() {
            Some('-') => {
                chars.next();
                match chars.peek() {
                    Some('-') => {
                        chars.next();
                        out.push('\u{2014}');
                    }
                    _ => out.push('\u{2013}'),
                }
            }
            _ => out.push('-'),
        },
        '.' => match chars.peek() {
            Some('.') => {
                if let Some('.') = chars.clone().nth(1) {
                    chars.next();
                    chars.next();
                    out.push('\u{2026}');
                } else {
                    out.push('.');
                }
            }
            _ => out.push('.'),
        },
        '+' => match chars.peek() {
            Some('-') => {
                chars.next();
                out.push('\u{00b1}');
            }
            _ => out.push('+'),
        },
        '(' => match symbol_after_paren(chars) {
            Some((symbol, consumed)) => {
                for _ in 0..consumed {
                    chars.next();
                }
                out.push(symbol);
            }
            None => out.push('('),
        },
        '"' => out.push(if is_opening(prev) {
            '\u{201c}'
        } else {
            '\u{201d}'
        }),
        '\'' => out.push(if is_opening(prev) {
            '\u{2018}'
        } else {
            '\u{2019}'
        }),
        _ => out.push(c),
    }
}

/// Recognises `c)`, `r)` and `tm)` after an opening paren, case-insensitively.
fn symbol_after_paren(chars: &Peekable<Chars<'_>>) -> Option<(char, usize)> {
    let ahead: String = chars.clone().take(3).collect::<String>().to_ascii_lowercase();
    if ahead.starts_with("c)") {
        Some(('\u{00a9}', 2))
    } else if ahead.starts_with("r)") {
        Some(('\u{00ae}', 2))
    } else if ahead.starts_with("tm)") {
        Some(('\u{2122}', 3))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::apply_typography;

    #[test]
    fn transforms_basic_punctuation() {
        let input = "Hello -- \"world\" ... and 'quote' --- end";
        let out = apply_typography(input, None);
        assert_eq!(
            out,
            "Hello \u{2013} \u{201c}world\u{201d} \u{2026} and \u{2018}quote\u{2019} \u{2014} end"
        );
    }

    #[test]
    fn apostrophes_close() {
        assert_eq!(apply_typography("don't", None), "don\u{2019}t");
    }

    #[test]
    fn symbols() {
        assert_eq!(
            apply_typography("(c) (R) (tm) 5 +- 1", None),
            "\u{a9} \u{ae} \u{2122} 5 \u{b1} 1"
        );
        assert_eq!(apply_typography("(see above)", None), "(see above)");
    }

    #[test]
    fn preceding_character_decides_quote_direction() {
        assert_eq!(apply_typography("\" said", Some('d')), "\u{201d} said");
        assert_eq!(apply_typography("\"hi", Some(' ')), "\u{201c}hi");
    }

    #[test]
    fn untouched_without_candidates() {
        assert_eq!(apply_typography("plain words", None), "plain words");
    }
}
