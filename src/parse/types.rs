//! Types produced by the grammar parser and the tree rewriter.

// ── Generic parse tree ──

/// Generic tree produced by the grammar, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNode {
    /// `a ; b ; c`
    Seq(Vec<ParseNode>),
    /// `a | b | c`
    Pipe(Vec<ParseNode>),
    /// One call: literal runs, quoted spans and redirections in source order.
    Call(Vec<CallPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallPart {
    /// Unquoted text, whitespace included.
    Literal(String),
    Quoted(QuotedSpan),
    Redirect(RedirectNode),
}

/// Quote family of a quoted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Single,
    Double,
    Back,
}

impl QuoteKind {
    pub fn delimiter(self) -> char {
        match self {
            QuoteKind::Single => '\'',
            QuoteKind::Double => '"',
            QuoteKind::Back => '`',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QuoteKind::Single => "single",
            QuoteKind::Double => "double",
            QuoteKind::Back => "back",
        }
    }

    pub fn from_delimiter(c: char) -> Option<Self> {
        match c {
            '\'' => Some(QuoteKind::Single),
            '"' => Some(QuoteKind::Double),
            '`' => Some(QuoteKind::Back),
            _ => None,
        }
    }
}

/// A quoted span. Its parts may contain spans of the two other kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedSpan {
    pub kind: QuoteKind,
    pub parts: Vec<QuotedPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotedPart {
    Text(String),
    Nested(QuotedSpan),
}

/// Redirection operator as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    /// `<`
    Input,
    /// `>`
    Output,
    /// `>>`
    Append,
    /// `<<`
    Heredoc,
}

impl RedirectOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectOp::Input => "<",
            RedirectOp::Output => ">",
            RedirectOp::Append => ">>",
            RedirectOp::Heredoc => "<<",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectNode {
    pub op: RedirectOp,
    pub target: String,
}

// ── Normalized command tree ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Plain,
    /// `>>`
    Append,
    /// `<<`
    Heredoc,
}

/// A classified I/O redirection attached to a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub direction: Direction,
    pub filename: String,
    pub mode: RedirectMode,
}

impl From<&RedirectNode> for Redirection {
    fn from(node: &RedirectNode) -> Self {
        let (direction, mode) = match node.op {
            RedirectOp::Input => (Direction::Input, RedirectMode::Plain),
            RedirectOp::Heredoc => (Direction::Input, RedirectMode::Heredoc),
            RedirectOp::Output => (Direction::Output, RedirectMode::Plain),
            RedirectOp::Append => (Direction::Output, RedirectMode::Append),
        };
        Redirection {
            direction,
            filename: node.target.clone(),
            mode,
        }
    }
}

/// Command to run in place of a backquoted span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionPayload {
    /// Unparsed text; parsed and executed when the call runs.
    Raw(String),
    /// Parsed eagerly by the rewriter.
    Parsed(Box<CommandTree>),
}

/// A backquoted span and the call's literal text on either side of it.
///
/// `before` is only left-trimmed and `after` only right-trimmed, so the
/// spacing around the splice point survives until the output is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub payload: SubstitutionPayload,
    pub before: String,
    pub after: String,
}

/// One application invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNode {
    /// Reconstructed command text with quotes unwrapped, trimmed.
    pub literal_text: String,
    pub redirections: Vec<Redirection>,
    pub substitution: Option<Substitution>,
    /// The backquoted span sits inside single quotes: keep it literal.
    pub disqualified: bool,
}

impl CallNode {
    /// A plain call with no redirections or substitution.
    pub fn plain(text: impl Into<String>) -> Self {
        CallNode {
            literal_text: text.into(),
            redirections: Vec::new(),
            substitution: None,
            disqualified: false,
        }
    }
}

/// Executable tree. Every leaf is a call; inner nodes have two or more children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTree {
    Sequence(Vec<CommandTree>),
    Pipeline(Vec<CommandTree>),
    Call(CallNode),
}
