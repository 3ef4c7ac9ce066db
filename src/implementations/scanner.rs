//! Delimiter-aware scanning over Java, JML and KeY source text.
//!
//! Comments (`//`, `/* */`) and string/char literals are skipped so that
//! braces inside them never count.

/// Byte offset of the delimiter closing the one at `open`
pub fn matching_close(text: &str, open: usize) -> Result<usize, String> {
    let bytes = text.as_bytes();
    if !matches!(bytes.get(open), Some(b'(' | b'[' | b'{')) {
        return Err(format!("no opening delimiter at byte {}", open));
    }

    let mut stack: Vec<u8> = Vec::new();
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_trivia(bytes, i)? {
            i = next;
            continue;
        }
        match bytes[i] {
            b @ (b'(' | b'[' | b'{') => stack.push(closer_for(b)),
            b @ (b')' | b']' | b'}') => {
                match stack.pop() {
                    Some(expected) if expected == b => {
                        if stack.is_empty() {
                            return Ok(i);
                        }
                    }
                    Some(expected) => {
                        return Err(mismatch(expected, b, i));
                    }
                    None => {
                        return Err(format!("unexpected `{}` at byte {}", b as char, i));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(format!("delimiter opened at byte {} is never closed", open))
}

/// First position at or after `from` where `needle` occurs outside any
/// delimiter pair opened after `from` and `accept` agrees.
///
/// Scanning stops with `Ok(None)` at a closing delimiter that has no opener
/// in the scanned range (the end of the enclosing scope) or at end of text.
pub fn find_top_level(
    text: &str,
    from: usize,
    needle: &str,
    accept: impl Fn(usize) -> bool
) -> Result<Option<usize>, String> {
    let bytes = text.as_bytes();
    let mut stack: Vec<u8> = Vec::new();
    let mut i = from;
    while i < bytes.len() {
        if stack.is_empty() && text[i..].starts_with(needle) && accept(i) {
            return Ok(Some(i));
        }
        if let Some(next) = skip_trivia(bytes, i)? {
            i = next;
            continue;
        }
        match bytes[i] {
            b @ (b'(' | b'[' | b'{') => stack.push(closer_for(b)),
            b @ (b')' | b']' | b'}') => {
                match stack.pop() {
                    Some(expected) if expected == b => {}
                    Some(expected) => {
                        return Err(mismatch(expected, b, i));
                    }
                    None => {
                        return Ok(None);
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(expected) = stack.last() {
        return Err(format!("missing `{}` before end of text", *expected as char));
    }
    Ok(None)
}

/// Whether `text` ends inside a `//` comment with no line break after it
///
/// Anything appended to such text lands in the comment.
pub fn ends_in_line_comment(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match skip_trivia(bytes, i) {
            Ok(Some(next)) => {
                if next == bytes.len() && bytes[i..].starts_with(b"//") {
                    return bytes.last() != Some(&b'\n');
                }
                i = next;
            }
            Ok(None) => {
                i += 1;
            }
            Err(_) => {
                return false;
            }
        }
    }
    false
}

fn closer_for(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

fn mismatch(expected: u8, found: u8, at: usize) -> String {
    format!("expected `{}` but found `{}` at byte {}", expected as char, found as char, at)
}

/// If a comment or literal starts at `i`, the offset just past it
fn skip_trivia(bytes: &[u8], i: usize) -> Result<Option<usize>, String> {
    match (bytes[i], bytes.get(i + 1)) {
        (b'/', Some(b'/')) => {
            let end = bytes[i..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |p| i + p + 1);
            Ok(Some(end))
        }
        (b'/', Some(b'*')) => {
            let rest = &bytes[i + 2..];
            let end = rest
                .windows(2)
                .position(|w| w == b"*/")
                .ok_or_else(|| format!("comment opened at byte {} is never closed", i))?;
            Ok(Some(i + 2 + end + 2))
        }
        (quote @ (b'"' | b'\''), _) => {
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => {
                        j += 2;
                        continue;
                    }
                    b'\n' => break,
                    b if b == quote => {
                        return Ok(Some(j + 1));
                    }
                    _ => {}
                }
                j += 1;
            }
            Err(format!("literal opened at byte {} is never closed", i))
        }
        _ => Ok(None),
    }
}
