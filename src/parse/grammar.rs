use super::types::{CallPart, ParseNode, QuoteKind, QuotedPart, QuotedSpan, RedirectNode, RedirectOp};
use crate::error::ShellError;

/// Characters that end a literal run.
const SPECIAL: &[char] = &['\'', '"', '`', ';', '|', '<', '>'];

/// Parse a raw command line into a generic parse tree.
///
/// Grammar, lowest precedence first:
///
/// ```text
/// line     := pipeline (';' pipeline)*
/// pipeline := call ('|' call)*
/// call     := (literal | quoted | redirect)*
/// quoted   := '…' | "…" | `…`        (may hold spans of the other two kinds)
/// redirect := ('<' | '>' | '>>' | '<<') ws? filename
/// ```
///
/// Literal runs and operators are matched greedily, so `>>` is always an
/// append and never two outputs. No semantic checks happen here.
pub fn parse(text: &str) -> Result<ParseNode, ShellError> {
    if text.trim().is_empty() {
        return Err(ShellError::syntax("empty command line"));
    }
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    parser.line()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn line(&mut self) -> Result<ParseNode, ShellError> {
        let mut members = vec![self.pipeline()?];
        while self.peek() == Some(';') {
            self.pos += 1;
            members.push(self.pipeline()?);
        }
        Ok(collapse(members, ParseNode::Seq))
    }

    fn pipeline(&mut self) -> Result<ParseNode, ShellError> {
        let mut stages = vec![self.call()?];
        while self.peek() == Some('|') {
            self.pos += 1;
            stages.push(self.call()?);
        }
        if stages.len() > 1 && stages.iter().any(is_blank_call) {
            return Err(ShellError::syntax("empty pipeline stage"));
        }
        Ok(collapse(stages, ParseNode::Pipe))
    }

    fn call(&mut self) -> Result<ParseNode, ShellError> {
        let mut parts = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                ';' | '|' => break,
                '<' | '>' => parts.push(CallPart::Redirect(self.redirect(c)?)),
                _ => match QuoteKind::from_delimiter(c) {
                    Some(kind) => parts.push(CallPart::Quoted(self.quoted(kind)?)),
                    None => parts.push(CallPart::Literal(self.literal())),
                },
            }
        }
        Ok(ParseNode::Call(parts))
    }

    /// Longest run of non-special characters. Line breaks count as blanks.
    fn literal(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| !SPECIAL.contains(&c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos]
            .iter()
            .map(|&c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }

    fn quoted(&mut self, kind: QuoteKind) -> Result<QuotedSpan, ShellError> {
        let opened_at = self.pos;
        self.pos += 1;

        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(ShellError::syntax(format!(
                    "unterminated {} quote opened at column {}",
                    kind.name(),
                    opened_at + 1
                )));
            };
            if c == kind.delimiter() {
                self.pos += 1;
                break;
            }
            match QuoteKind::from_delimiter(c) {
                Some(inner) => {
                    if !text.is_empty() {
                        parts.push(QuotedPart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(QuotedPart::Nested(self.quoted(inner)?));
                }
                None => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
        if !text.is_empty() {
            parts.push(QuotedPart::Text(text));
        }
        Ok(QuotedSpan { kind, parts })
    }

    fn redirect(&mut self, first: char) -> Result<RedirectNode, ShellError> {
        self.pos += 1;
        let doubled = self.peek() == Some(first);
        if doubled {
            self.pos += 1;
        }
        let op = match (first, doubled) {
            ('<', false) => RedirectOp::Input,
            ('<', true) => RedirectOp::Heredoc,
            (_, false) => RedirectOp::Output,
            (_, true) => RedirectOp::Append,
        };

        while self.peek().is_some_and(|c| c == ' ' || c == '\t') {
            self.pos += 1;
        }
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !SPECIAL.contains(&c))
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(ShellError::syntax(format!(
                "expected a filename after '{}' at column {}",
                op.as_str(),
                start + 1
            )));
        }
        Ok(RedirectNode {
            op,
            target: self.chars[start..self.pos].iter().collect(),
        })
    }
}

fn collapse(mut nodes: Vec<ParseNode>, wrap: fn(Vec<ParseNode>) -> ParseNode) -> ParseNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        wrap(nodes)
    }
}

fn is_blank_call(node: &ParseNode) -> bool {
    match node {
        ParseNode::Call(parts) => parts.iter().all(|part| match part {
            CallPart::Literal(text) => text.trim().is_empty(),
            _ => false,
        }),
        _ => false,
    }
}
