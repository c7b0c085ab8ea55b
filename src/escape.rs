//! Human readable representation of characters that can't be printed as they are.
//! The functions are used for diagnostics, for the listing of tokens and for the labels of
//! rendered automata.

const ESCAPE_START: char = '\\';
const UNICODE_ESCAPE: char = 'u';

/// Maps the character after a backslash to the control character it stands for.
fn control_char(second: char) -> Option<char> {
    match second {
        '0' => Some('\0'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Maps a control character to the letter used in its escape sequence.
fn escape_letter(c: char) -> Option<char> {
    match c {
        '\0' => Some('0'),
        '\u{8}' => Some('b'),
        '\u{c}' => Some('f'),
        '\n' => Some('n'),
        '\r' => Some('r'),
        '\t' => Some('t'),
        _ => None,
    }
}

/// Returns a user readable representation of the character.
///
/// Printable characters are returned as they are, the common control characters as their
/// two character escape sequence (e.g. `\n`) and everything else as `\uXXXX`.
pub fn char_representation(c: char) -> String {
    if !c.is_control() {
        return c.to_string();
    }
    if let Some(letter) = escape_letter(c) {
        return format!("{}{}", ESCAPE_START, letter);
    }
    format!("{}{}{:04x}", ESCAPE_START, UNICODE_ESCAPE, c as u32)
}

/// Escapes all characters of the string as described in [`char_representation`].
pub fn escape(text: &str) -> String {
    text.chars().map(char_representation).collect()
}

/// Collapses the escape sequences produced by [`escape`] back into single characters.
/// Unknown escape sequences are kept verbatim.
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(first) = chars.next() {
        if first != ESCAPE_START {
            result.push(first);
            continue;
        }
        match chars.peek().copied() {
            Some(UNICODE_ESCAPE) => {
                let digits: String = chars.clone().skip(1).take(4).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(c) if digits.len() == 4 => {
                        // Skip the 'u' and the four hex digits
                        chars.nth(4);
                        result.push(c);
                    }
                    _ => result.push(first),
                }
            }
            Some(second) => match control_char(second) {
                Some(c) => {
                    chars.next();
                    result.push(c);
                }
                None => result.push(first),
            },
            None => result.push(first),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_representation() {
        assert_eq!(char_representation('a'), "a");
        assert_eq!(char_representation('\n'), "\\n");
        assert_eq!(char_representation('\t'), "\\t");
        assert_eq!(char_representation('\u{1}'), "\\u0001");
        assert_eq!(char_representation('ε'), "ε");
    }

    #[test]
    fn test_escape_unescape() {
        let text = "if (x)\r\n\treturn\u{7};";
        let escaped = escape(text);
        assert_eq!(escaped, "if (x)\\r\\n\\treturn\\u0007;");
        assert_eq!(unescape(&escaped), text);
    }

    #[test]
    fn test_unescape_keeps_unknown_sequences() {
        assert_eq!(unescape("a\\qb"), "a\\qb");
        assert_eq!(unescape("\\u12"), "\\u12");
        assert_eq!(unescape("end\\"), "end\\");
    }
}
