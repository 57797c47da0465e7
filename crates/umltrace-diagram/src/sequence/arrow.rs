//! Message-line scanner
//!
//! Hand-written because arrows are assembled from a small alphabet
//! (`-`, `<`, `>`, `\`, `/`, with `x`/`o` heads) and may carry `[#color]`
//! hints anywhere inside the token.

use crate::text::unquote;

const ACTIVATIONS: [&str; 4] = ["++", "--", "**", "!!"];

/// One recognized `Sender ARROW Receiver [: text]` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArrowLine<'a> {
    pub(crate) sender: &'a str,
    /// Arrow with style hints removed
    pub(crate) arrow: String,
    pub(crate) receiver: &'a str,
    pub(crate) text: &'a str,
}

impl ArrowLine<'_> {
    /// Arrow points right-to-left, so the written receiver is the sender
    pub(crate) fn is_reversed(&self) -> bool {
        let body = self.arrow.trim_start_matches(['x', 'o']);
        body.starts_with('<') && !self.arrow.contains('>')
    }
}

fn is_body(c: char) -> bool {
    matches!(c, '-' | '<' | '>' | '\\' | '/')
}

fn is_head(c: char) -> bool {
    matches!(c, 'x' | 'o')
}

/// Quoted name or a run of characters up to a stop character
fn take_token(s: &str, stop: impl Fn(char) -> bool) -> Option<(&str, &str)> {
    if let Some(inner) = s.strip_prefix('"') {
        let close = inner.find('"')?;
        return Some((&s[..close + 2], &inner[close + 1..]));
    }
    let end = s.find(|c: char| stop(c)).unwrap_or(s.len());
    (end > 0).then(|| (&s[..end], &s[end..]))
}

/// Arrow token at the start of `s`, hints removed, and the remainder
fn take_arrow(s: &str) -> Option<(String, &str)> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);
    let mut arrow = String::new();
    let mut i = 0;

    if let (Some(head), Some(next)) = (at(0), at(1)) {
        if is_head(head) && is_body(next) {
            arrow.push(head);
            i = 1;
        }
    }
    while let Some(c) = at(i) {
        if is_body(c) {
            arrow.push(c);
            i += 1;
        } else if c == '[' && !arrow.is_empty() {
            // style hint such as [#red] or [bold]
            let close = chars[i..].iter().position(|&(_, c)| c == ']')?;
            i += close + 1;
        } else {
            break;
        }
    }
    if let Some(c) = at(i).filter(|&c| is_head(c)) {
        let next = at(i + 1);
        if next.map_or(true, |n| n.is_whitespace() || is_body(n) || n == ':') {
            arrow.push(c);
            i += 1;
        }
    }

    let valid = arrow.contains('-') && arrow.contains(['<', '>', '\\', '/']);
    let offset = chars.get(i).map_or(s.len(), |&(o, _)| o);
    valid.then(|| (arrow, &s[offset..]))
}

fn strip_activations(mut s: &str) -> &str {
    while let Some(rest) = ACTIVATIONS.iter().find_map(|a| s.strip_suffix(a)) {
        s = rest.trim_end();
    }
    s
}

/// Scan a trimmed line as a message
pub(crate) fn scan_message(line: &str) -> Option<ArrowLine<'_>> {
    let (sender, rest) = take_token(line, |c| c.is_whitespace() || is_body(c) || c == ':')?;
    let (arrow, rest) = take_arrow(rest.trim_start())?;
    let (receiver, rest) = take_token(rest.trim_start(), |c| c.is_whitespace() || c == ':')?;

    let receiver = strip_activations(receiver);
    let mut rest = rest.trim_start();
    while let Some(tail) = ACTIVATIONS.iter().find_map(|a| rest.strip_prefix(a)) {
        rest = tail.trim_start();
    }

    let text = if rest.is_empty() {
        ""
    } else {
        rest.strip_prefix(':')?.trim()
    };
    let (sender, receiver) = (unquote(sender), unquote(receiver));
    if sender.is_empty() || receiver.is_empty() {
        return None;
    }

    Some(ArrowLine {
        sender,
        arrow,
        receiver,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn async_call() {
        let line = scan_message("Alice ->> Bob : hello()").unwrap();
        assert_eq!(line.sender, "Alice");
        assert_eq!(line.arrow, "->>");
        assert_eq!(line.receiver, "Bob");
        assert_eq!(line.text, "hello()");
    }

    #[test]
    fn compact_and_hinted_arrows() {
        let line = scan_message("A-[#red]->B:ok").unwrap();
        assert_eq!((line.sender, line.arrow.as_str(), line.receiver), ("A", "-->", "B"));
        assert_eq!(line.text, "ok");

        let line = scan_message("A ->x B").unwrap();
        assert_eq!(line.arrow, "->x");

        let line = scan_message("A -> oscar : hi").unwrap();
        assert_eq!(line.arrow, "->");
        assert_eq!(line.receiver, "oscar");
    }

    #[test]
    fn quoted_names_and_activations() {
        let line = scan_message("\"Web Client\" -> Server ++ : start").unwrap();
        assert_eq!(line.sender, "Web Client");
        assert_eq!(line.receiver, "Server");
        assert_eq!(line.text, "start");

        let line = scan_message("A -> B--").unwrap();
        assert_eq!(line.receiver, "B");
        assert_eq!(line.text, "");
    }

    #[test]
    fn reversed_arrows() {
        assert!(scan_message("Bob <- Alice : hi").unwrap().is_reversed());
        assert!(scan_message("Bob x<-- Alice").unwrap().is_reversed());
        assert!(!scan_message("Bob <-> Alice").unwrap().is_reversed());
    }

    #[test]
    fn rejects_non_messages() {
        assert!(scan_message("title Checkout").is_none());
        assert!(scan_message("A - B").is_none());
        assert!(scan_message("== Phase ==").is_none());
        assert!(scan_message("A -> B trailing words").is_none());
        assert!(scan_message("-> B").is_none());
    }
}
