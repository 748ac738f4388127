pub mod grammar;
pub mod rewrite;
pub mod types;

pub use grammar::parse;
pub use rewrite::{parse_line, rewrite};
pub use types::{
    CallNode, CallPart, CommandTree, Direction, ParseNode, QuoteKind, QuotedPart, QuotedSpan,
    RedirectMode, RedirectNode, RedirectOp, Redirection, Substitution, SubstitutionPayload,
};
