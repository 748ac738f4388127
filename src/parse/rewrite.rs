//! Rewrites the generic parse tree into an executable [`CommandTree`].
//!
//! Three passes happen in one walk:
//!
//! - quote reconstruction: quoted spans are unwrapped into literal text,
//!   nested spans keep their own delimiters, and a backquoted span becomes
//!   the call's command substitution;
//! - redirection extraction, rejecting output redirection on any pipeline
//!   stage but the last;
//! - tree assembly into `Sequence` / `Pipeline` / `Call` nodes, with every
//!   executable substitution parsed eagerly.
//!
//! Each call is rewritten from its own parse node alone; nothing is kept
//! between calls, so the rewriter is re-entrant.

use log::debug;

use super::grammar;
use super::types::{
    CallNode, CallPart, CommandTree, Direction, ParseNode, QuoteKind, QuotedPart, QuotedSpan,
    Redirection, Substitution, SubstitutionPayload,
};
use crate::error::ShellError;

/// Parse and rewrite a command line.
pub fn parse_line(text: &str) -> Result<CommandTree, ShellError> {
    let node = grammar::parse(text)?;
    rewrite(&node)
}

/// Rewrite a parse tree into a command tree.
pub fn rewrite(node: &ParseNode) -> Result<CommandTree, ShellError> {
    match node {
        ParseNode::Seq(members) => {
            let mut children = Vec::with_capacity(members.len());
            for member in members {
                let child = rewrite(member)?;
                if !is_empty_call(&child) {
                    children.push(child);
                }
            }
            match children.len() {
                0 => Err(ShellError::syntax("empty command line")),
                1 => Ok(children.remove(0)),
                _ => Ok(CommandTree::Sequence(children)),
            }
        }
        ParseNode::Pipe(stages) => {
            let last = stages.len().saturating_sub(1);
            let calls = stages
                .iter()
                .enumerate()
                .map(|(i, stage)| rewrite_stage(stage, i < last))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CommandTree::Pipeline(calls))
        }
        ParseNode::Call(parts) => Ok(CommandTree::Call(rewrite_call(parts, false)?)),
    }
}

fn rewrite_stage(node: &ParseNode, mid_pipeline: bool) -> Result<CommandTree, ShellError> {
    match node {
        ParseNode::Call(parts) => Ok(CommandTree::Call(rewrite_call(parts, mid_pipeline)?)),
        other => rewrite(other),
    }
}

fn is_empty_call(tree: &CommandTree) -> bool {
    matches!(
        tree,
        CommandTree::Call(call)
            if call.literal_text.is_empty()
                && call.redirections.is_empty()
                && call.substitution.is_none()
    )
}

fn rewrite_call(parts: &[CallPart], mid_pipeline: bool) -> Result<CallNode, ShellError> {
    let mut acc = Reconstruction::default();
    let mut redirections = Vec::new();

    for part in parts {
        match part {
            CallPart::Literal(text) => acc.text.push_str(&collapse_whitespace(text)),
            CallPart::Quoted(span) => {
                let inner = reconstruct(span, span.kind)?;
                // The outermost delimiters are dropped, except for a
                // backquoted span which must stay findable for splicing.
                acc.append(span.kind, inner, span.kind == QuoteKind::Back);
            }
            CallPart::Redirect(node) => {
                let redirection = Redirection::from(node);
                if mid_pipeline && redirection.direction == Direction::Output {
                    return Err(ShellError::syntax(
                        "output redirection in the middle of a pipeline",
                    ));
                }
                redirections.push(redirection);
            }
        }
    }

    if acc.substitutions > 1 && !acc.disqualified {
        return Err(ShellError::syntax("multiple command substitutions in one call"));
    }

    let literal_text = acc.text.trim().to_string();
    let substitution = match acc.pending {
        Some(inner) => {
            let marker = format!("`{inner}`");
            let (before, after) = acc.text.split_once(&marker).unwrap_or((acc.text.as_str(), ""));
            if acc.disqualified {
                Some(Substitution {
                    payload: SubstitutionPayload::Raw(inner),
                    before: before.trim_start().to_string(),
                    after: after.trim_end().to_string(),
                })
            } else if inner.trim().is_empty() {
                // An empty pair runs nothing and stays in the text as written.
                None
            } else {
                let tree = parse_line(&inner)?;
                Some(Substitution {
                    payload: SubstitutionPayload::Parsed(Box::new(tree)),
                    before: before.trim_start().to_string(),
                    after: after.trim_end().to_string(),
                })
            }
        }
        None => None,
    };

    debug!(
        "rewrote call {literal_text:?} (redirections: {}, substitution: {}, disqualified: {})",
        redirections.len(),
        substitution.is_some(),
        acc.disqualified
    );

    Ok(CallNode {
        literal_text,
        redirections,
        substitution,
        disqualified: acc.disqualified,
    })
}

/// Text rebuilt from a quoted span, plus what was learned about backquotes.
#[derive(Debug, Default)]
struct Reconstruction {
    text: String,
    /// Inner text of the last backquoted span seen.
    pending: Option<String>,
    substitutions: usize,
    disqualified: bool,
}

impl Reconstruction {
    fn append(&mut self, kind: QuoteKind, inner: Reconstruction, keep_delimiters: bool) {
        if keep_delimiters {
            self.text.push(kind.delimiter());
            self.text.push_str(&inner.text);
            self.text.push(kind.delimiter());
        } else {
            self.text.push_str(&inner.text);
        }
        self.disqualified |= inner.disqualified;
        self.substitutions += inner.substitutions;
        if kind == QuoteKind::Back {
            self.substitutions += 1;
            self.pending = Some(inner.text);
        } else if inner.pending.is_some() {
            self.pending = inner.pending;
        }
    }
}

/// Rebuild the contents of `span` without its own delimiters.
///
/// `outermost` is the kind of the top-level span this one sits in, as seen
/// from the call. A backquote anywhere under a backquote is rejected; a
/// backquote under an outermost single quote disqualifies the call.
fn reconstruct(span: &QuotedSpan, outermost: QuoteKind) -> Result<Reconstruction, ShellError> {
    let mut acc = Reconstruction::default();
    for part in &span.parts {
        match part {
            QuotedPart::Text(text) => acc.text.push_str(text),
            QuotedPart::Nested(inner) => {
                if inner.kind == QuoteKind::Back {
                    if span.kind == QuoteKind::Back || outermost == QuoteKind::Back {
                        return Err(ShellError::syntax("nested command substitution"));
                    }
                    if outermost == QuoteKind::Single {
                        acc.disqualified = true;
                    }
                }
                let rebuilt = reconstruct(inner, outermost)?;
                acc.append(inner.kind, rebuilt, true);
            }
        }
    }
    Ok(acc)
}

/// Collapse every whitespace run to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_blank = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_blank {
                out.push(' ');
            }
            in_blank = true;
        } else {
            out.push(c);
            in_blank = false;
        }
    }
    out
}
