use std::{collections::VecDeque, error::Error, fmt};

use fnv::FnvHashMap;
use itertools::Itertools as _;

use crate::parser::{Lexer, LexerError, Spanning, Token};

/// Error while parsing a GraphQL document
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An unexpected token occurred in the source
    UnexpectedToken(String),

    /// A token other than any of the `expected` ones occurred in the source
    ExpectedToken {
        /// Token kinds which would have been accepted at this position.
        expected: Vec<String>,

        /// The token actually found.
        found: String,
    },

    /// The input source abruptly ended
    UnexpectedEndOfFile,

    /// An error during tokenization occurred
    LexerError(LexerError),

    /// A scalar literal could not be represented
    ExpectedScalarError(&'static str),

    /// A definition, argument or field name occurred more than once where it
    /// must be unique
    DuplicateDefinition {
        /// What kind of name was repeated, e.g. `type` or `argument`.
        kind: &'static str,

        /// The repeated name.
        name: String,
    },

    /// A fragment definition was named `on`
    FragmentNamedOn,

    /// An enum value was declared as `true`, `false` or `null`
    InvalidEnumValue(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken(token) => write!(f, "Unexpected \"{token}\""),
            Self::ExpectedToken { expected, found } => {
                if let [single] = expected.as_slice() {
                    write!(f, "Expected \"{single}\", found \"{found}\"")
                } else {
                    write!(
                        f,
                        "Expected one of {}, found \"{found}\"",
                        expected.iter().format_with(", ", |e, f| f(&format_args!("\"{e}\""))),
                    )
                }
            }
            Self::UnexpectedEndOfFile => write!(f, "Unexpected end of input"),
            Self::LexerError(e) => e.fmt(f),
            Self::ExpectedScalarError(e) => e.fmt(f),
            Self::DuplicateDefinition { kind, name } => {
                write!(f, "There can be only one {kind} named \"{name}\"")
            }
            Self::FragmentNamedOn => write!(f, "Fragment cannot be named \"on\""),
            Self::InvalidEnumValue(name) => write!(f, "Enum value cannot be \"{name}\""),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LexerError(e) => Some(e),
            Self::ExpectedScalarError(_)
            | Self::UnexpectedToken(_)
            | Self::ExpectedToken { .. }
            | Self::UnexpectedEndOfFile
            | Self::DuplicateDefinition { .. }
            | Self::FragmentNamedOn
            | Self::InvalidEnumValue(_) => None,
        }
    }
}

impl ParseError {
    /// Creates a [`ParseError::UnexpectedToken`] out of the provided [`Token`].
    #[must_use]
    pub fn unexpected_token(token: Token<'_>) -> Self {
        Self::UnexpectedToken(token.to_string())
    }

    /// Creates a [`ParseError::ExpectedToken`] listing what would have been
    /// accepted instead of the provided [`Token`].
    #[must_use]
    pub fn expected_token<I>(expected: I, found: Token<'_>) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        Self::ExpectedToken {
            expected: expected.into_iter().map(|e| e.to_string()).collect(),
            found: found.to_string(),
        }
    }
}

#[doc(hidden)]
pub type ParseResult<T> = Result<Spanning<T>, Spanning<ParseError>>;

#[doc(hidden)]
pub type UnlocatedParseResult<T> = Result<T, Spanning<ParseError>>;

#[doc(hidden)]
pub type OptionParseResult<T> = Result<Option<Spanning<T>>, Spanning<ParseError>>;

#[doc(hidden)]
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: VecDeque<Spanning<Token<'a>>>,
    /// `##` comment lines, keyed by the source index of the token following
    /// them.
    descriptions: FnvHashMap<usize, String>,
}

impl<'a> Parser<'a> {
    #[doc(hidden)]
    pub fn new(lexer: &mut Lexer<'a>) -> Result<Parser<'a>, Spanning<LexerError>> {
        let mut tokens = VecDeque::new();
        let mut descriptions = FnvHashMap::default();
        let mut pending = Vec::new();

        for res in lexer {
            let token = res?;
            if let Token::Description(line) = token.item {
                pending.push(line.trim());
                continue;
            }
            if !pending.is_empty() {
                descriptions.insert(token.span.start.index(), pending.drain(..).join(" "));
            }
            tokens.push_back(token);
        }

        Ok(Parser {
            tokens,
            descriptions,
        })
    }

    #[doc(hidden)]
    pub fn peek(&self) -> &Spanning<Token<'a>> {
        &self.tokens[0]
    }

    /// Takes the description written right above the next token, if any.
    #[doc(hidden)]
    pub fn take_description(&mut self) -> Option<String> {
        let index = self.peek().span.start.index();
        self.descriptions.remove(&index)
    }

    #[doc(hidden)]
    pub fn next_token(&mut self) -> ParseResult<Token<'a>> {
        if self.tokens.len() == 1 {
            Err(Spanning::new(
                self.peek().span,
                ParseError::UnexpectedEndOfFile,
            ))
        } else {
            self.tokens.pop_front().ok_or_else(|| {
                Spanning::unlocated(ParseError::UnexpectedEndOfFile)
            })
        }
    }

    #[doc(hidden)]
    pub fn expect(&mut self, expected: &Token) -> ParseResult<Token<'a>> {
        if &self.peek().item != expected {
            Err(self
                .next_token()?
                .map(|found| ParseError::expected_token([expected], found)))
        } else {
            self.next_token()
        }
    }

    #[doc(hidden)]
    pub fn skip(
        &mut self,
        expected: &Token,
    ) -> Result<Option<Spanning<Token<'a>>>, Spanning<ParseError>> {
        if &self.peek().item == expected {
            Ok(Some(self.next_token()?))
        } else if self.peek().item == Token::EndOfFile {
            Err(Spanning::zero_width(
                &self.peek().span.start,
                ParseError::UnexpectedEndOfFile,
            ))
        } else {
            Ok(None)
        }
    }

    #[doc(hidden)]
    pub fn delimited_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<Spanning<T>>>
    where
        T: fmt::Debug,
        F: Fn(&mut Parser<'a>) -> ParseResult<T>,
    {
        let start_pos = &self.expect(opening)?.span.start;
        let mut items = Vec::new();

        loop {
            if let Some(Spanning { span, .. }) = self.skip(closing)? {
                return Ok(Spanning::start_end(start_pos, &span.end, items));
            }

            items.push(parser(self)?);
        }
    }

    #[doc(hidden)]
    pub fn delimited_nonempty_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<Spanning<T>>>
    where
        T: fmt::Debug,
        F: Fn(&mut Parser<'a>) -> ParseResult<T>,
    {
        let start_pos = &self.expect(opening)?.span.start;
        let mut items = Vec::new();

        loop {
            items.push(parser(self)?);

            if let Some(end_spanning) = self.skip(closing)? {
                return Ok(Spanning::start_end(start_pos, &end_spanning.end(), items));
            }
        }
    }

    #[doc(hidden)]
    pub fn unlocated_delimited_nonempty_list<T, F>(
        &mut self,
        opening: &Token,
        parser: F,
        closing: &Token,
    ) -> ParseResult<Vec<T>>
    where
        T: fmt::Debug,
        F: Fn(&mut Parser<'a>) -> UnlocatedParseResult<T>,
    {
        let start_pos = &self.expect(opening)?.span.start;
        let mut items = Vec::new();

        loop {
            items.push(parser(self)?);

            if let Some(end_spanning) = self.skip(closing)? {
                return Ok(Spanning::start_end(start_pos, &end_spanning.end(), items));
            }
        }
    }

    /// Consumes a name, accepting keywords and the `true`, `false` and `null`
    /// literals as well.
    #[doc(hidden)]
    pub fn expect_name(&mut self) -> ParseResult<&'a str> {
        match self.peek().item {
            Token::EndOfFile => Err(Spanning::new(
                self.peek().span,
                ParseError::UnexpectedEndOfFile,
            )),
            token => match token.as_name() {
                Some(name) => Ok(self.next_token()?.map(|_| name)),
                None => Err(self
                    .next_token()?
                    .map(|found| ParseError::expected_token(["Name"], found))),
            },
        }
    }
}
