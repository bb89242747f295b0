//! Query and schema language parser and utilities
#![expect(clippy::module_inception, reason = "`parser::parser` mirrors the other modules")]

mod document;
mod excerpt;
mod lexer;
mod parser;
mod utils;
mod value;


pub use self::{
    document::parse_document_source,
    excerpt::excerpt,
    lexer::{Keyword, Lexer, LexerError, LexerResult, ScalarToken, Token},
    parser::{OptionParseResult, ParseError, ParseResult, Parser, UnlocatedParseResult},
    utils::{SourcePosition, Span, Spanning},
};
