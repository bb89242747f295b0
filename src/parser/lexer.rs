use std::{char, iter::Peekable, str::CharIndices};

use derive_more::with_trait::{Display, Error};

use crate::parser::{SourcePosition, Spanning};

#[doc(hidden)]
#[derive(Debug)]
pub struct Lexer<'a> {
    iterator: Peekable<CharIndices<'a>>,
    source: &'a str,
    length: usize,
    position: SourcePosition,
    has_reached_eof: bool,
}

/// Representation of a raw unparsed scalar value literal.
///
/// This is only used for tagging how the lexer has interpreted a value literal.
/// String literals keep their surrounding quotes and escape sequences.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ScalarToken<'a> {
    String(&'a str),
    Float(&'a str),
    Int(&'a str),
}

/// Reserved words of the GraphQL language.
///
/// They are still valid wherever a name is expected, e.g. a field may be
/// called `type`.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Keyword {
    #[display("query")]
    Query,
    #[display("mutation")]
    Mutation,
    #[display("fragment")]
    Fragment,
    #[display("type")]
    Type,
    #[display("interface")]
    Interface,
    #[display("union")]
    Union,
    #[display("scalar")]
    Scalar,
    #[display("enum")]
    Enum,
    #[display("input")]
    Input,
    #[display("extend")]
    Extend,
    #[display("implements")]
    Implements,
    #[display("on")]
    On,
}

impl Keyword {
    /// Looks up the [`Keyword`] spelled exactly as `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "query" => Self::Query,
            "mutation" => Self::Mutation,
            "fragment" => Self::Fragment,
            "type" => Self::Type,
            "interface" => Self::Interface,
            "union" => Self::Union,
            "scalar" => Self::Scalar,
            "enum" => Self::Enum,
            "input" => Self::Input,
            "extend" => Self::Extend,
            "implements" => Self::Implements,
            "on" => Self::On,
            _ => return None,
        })
    }

    /// Returns the source spelling of this [`Keyword`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Fragment => "fragment",
            Self::Type => "type",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Input => "input",
            Self::Extend => "extend",
            Self::Implements => "implements",
            Self::On => "on",
        }
    }
}

/// A single token in the input source
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Token<'a> {
    Name(&'a str),
    Keyword(Keyword),
    Scalar(ScalarToken<'a>),
    Boolean(bool),
    #[display("null")]
    Null,
    /// Text of a `##` comment line, without the leading `##`.
    #[display("##{_0}")]
    Description(&'a str),
    #[display("!")]
    ExclamationMark,
    #[display("$")]
    Dollar,
    #[display("(")]
    ParenOpen,
    #[display(")")]
    ParenClose,
    #[display("[")]
    BracketOpen,
    #[display("]")]
    BracketClose,
    #[display("{{")]
    CurlyOpen,
    #[display("}}")]
    CurlyClose,
    #[display("...")]
    Ellipsis,
    #[display(":")]
    Colon,
    #[display("=")]
    Equals,
    #[display("@")]
    At,
    #[display("|")]
    Pipe,
    #[display("End of file")]
    EndOfFile,
}

impl<'a> Token<'a> {
    /// Returns the text of this token if it may stand where a name is
    /// expected.
    pub fn as_name(&self) -> Option<&'a str> {
        match *self {
            Self::Name(name) => Some(name),
            Self::Keyword(kw) => Some(kw.as_str()),
            Self::Boolean(true) => Some("true"),
            Self::Boolean(false) => Some("false"),
            Self::Null => Some("null"),
            _ => None,
        }
    }
}

/// Error when tokenizing the input source
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum LexerError {
    /// An unknown character was found
    ///
    /// Unknown characters are characters that do not occur anywhere in the
    /// GraphQL language, such as `?` or `%`.
    #[display("Unknown character \"{_0}\"")]
    UnknownCharacter(#[error(not(source))] char),

    /// An unexpected character was found
    ///
    /// Unexpected characters are characters that _do_ exist in the GraphQL
    /// language, but is not expected at the current position in the document.
    #[display("Unexpected character \"{_0}\"")]
    UnexpectedCharacter(#[error(not(source))] char),

    /// An unterminated string literal was found
    ///
    /// Apart from forgetting the ending `"`, terminating a string within a
    /// Unicode escape sequence or having a line break in the string also
    /// causes this error.
    #[display("Unterminated string literal")]
    UnterminatedString,

    /// An unknown character in a string literal was found
    ///
    /// This occurs when an invalid source character is found in a string
    /// literal, such as ASCII control characters.
    #[display("Unknown character \"{_0}\" in string literal")]
    UnknownCharacterInString(#[error(not(source))] char),

    /// An unknown escape sequence in a string literal was found
    ///
    /// Only a limited set of escape sequences are supported, this is emitted
    /// when e.g. `"\l"` is parsed.
    #[display("Unknown escape sequence \"{_0}\" in string")]
    UnknownEscapeSequence(#[error(not(source))] String),

    /// The input source was unexpectedly terminated
    ///
    /// Emitted when the current token requires a succeeding character, but
    /// the source has reached EOF. Emitted when scanning e.g. `"1."`.
    #[display("Unexpected end of input")]
    UnexpectedEndOfFile,

    /// A number literal started with `0` followed by another digit.
    #[display("Invalid number, unexpected digit after 0")]
    LeadingZero,

    /// A number literal was immediately followed by a name, as in `123abc`.
    #[display("Bad number syntax")]
    BadNumberSyntax,
}

/// A token, or the error that ends the token stream.
pub type LexerResult<'a> = Result<Spanning<Token<'a>>, Spanning<LexerError>>;

impl<'a> Lexer<'a> {
    #[doc(hidden)]
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            iterator: source.char_indices().peekable(),
            source,
            length: source.len(),
            position: SourcePosition::new_origin(),
            has_reached_eof: false,
        }
    }

    fn peek_char(&mut self) -> Option<(usize, char)> {
        assert!(self.position.index() <= self.length);
        assert!(!self.has_reached_eof);

        self.iterator.peek().map(|&(idx, ch)| (idx, ch))
    }

    fn next_char(&mut self) -> Option<(usize, char)> {
        assert!(self.position.index() <= self.length);
        assert!(!self.has_reached_eof);

        let next = self.iterator.next();

        match next {
            Some((_, '\n')) => self.position.advance_line(1),
            Some((_, '\r')) => {
                // `\r\n` is a single line terminator.
                if let Some(&(_, '\n')) = self.iterator.peek() {
                    self.iterator.next();
                    self.position.advance_line(2);
                } else {
                    self.position.advance_line(1);
                }
            }
            Some((_, ch)) => self.position.advance_char(ch),
            None => {}
        }

        next
    }

    fn emit_single_char(&mut self, t: Token<'a>) -> Spanning<Token<'a>> {
        assert!(self.position.index() <= self.length);

        let start_pos = self.position;

        self.next_char()
            .expect("Internal error in GraphQL lexer: emit_single_char reached EOF");

        Spanning::single_width(&start_pos, t)
    }

    fn is_at_description(&mut self) -> bool {
        self.peek_char()
            .is_some_and(|(idx, _)| self.source[idx..].starts_with("##"))
    }

    fn scan_over_whitespace(&mut self) {
        while let Some((_, ch)) = self.peek_char() {
            if ch == '\t' || ch == ' ' || ch == '\n' || ch == '\r' || ch == ',' || ch == '\u{feff}'
            {
                self.next_char();
            } else if ch == '#' {
                if self.is_at_description() {
                    break;
                }

                self.next_char();

                while let Some((_, ch)) = self.peek_char() {
                    if ch == '\n' || ch == '\r' {
                        self.next_char();
                        break;
                    } else {
                        self.next_char();
                    }
                }
            } else {
                break;
            }
        }
    }

    fn scan_description(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, _) = self
            .next_char()
            .ok_or_else(|| Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile))?;
        self.next_char();

        let text_idx = start_idx + 2;
        let mut end_idx = text_idx;

        while let Some((idx, ch)) = self.peek_char() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.next_char();
            end_idx = idx + ch.len_utf8();
        }

        Ok(Spanning::start_end(
            &start_pos,
            &self.position,
            Token::Description(&self.source[text_idx..end_idx]),
        ))
    }

    fn scan_ellipsis(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;

        for _ in 0..3 {
            let (_, ch) = self.next_char().ok_or_else(|| {
                Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile)
            })?;
            if ch != '.' {
                return Err(Spanning::zero_width(
                    &start_pos,
                    LexerError::UnexpectedCharacter('.'),
                ));
            }
        }

        Ok(Spanning::start_end(
            &start_pos,
            &self.position,
            Token::Ellipsis,
        ))
    }

    fn scan_name(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, start_ch) = self
            .next_char()
            .ok_or_else(|| Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile))?;
        assert!(is_name_start(start_ch));

        let mut end_idx = start_idx;

        while let Some((idx, ch)) = self.peek_char() {
            if is_name_cont(ch) {
                self.next_char();
                end_idx = idx;
            } else {
                break;
            }
        }

        let name = &self.source[start_idx..=end_idx];
        let token = match name {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            name => Keyword::from_name(name).map_or(Token::Name(name), Token::Keyword),
        };

        Ok(Spanning::start_end(&start_pos, &self.position, token))
    }

    fn scan_string(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, start_ch) = self
            .next_char()
            .ok_or_else(|| Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile))?;
        if start_ch != '"' {
            return Err(Spanning::zero_width(
                &self.position,
                LexerError::UnterminatedString,
            ));
        }

        let mut escaped = false;
        let mut old_pos = self.position;
        while let Some((idx, ch)) = self.next_char() {
            match ch {
                'b' | 'f' | 'n' | 'r' | 't' | '\\' | '/' | '"' if escaped => {
                    escaped = false;
                }
                'u' if escaped => {
                    self.scan_escaped_unicode(&old_pos)?;
                    escaped = false;
                }
                '\n' | '\r' => {
                    return Err(Spanning::zero_width(
                        &old_pos,
                        LexerError::UnterminatedString,
                    ));
                }
                c if escaped => {
                    return Err(Spanning::zero_width(
                        &old_pos,
                        LexerError::UnknownEscapeSequence(format!("\\{c}")),
                    ));
                }
                '\\' => escaped = true,
                '"' => {
                    return Ok(Spanning::start_end(
                        &start_pos,
                        &self.position,
                        Token::Scalar(ScalarToken::String(&self.source[start_idx..=idx])),
                    ));
                }
                c if !is_source_char(c) => {
                    return Err(Spanning::zero_width(
                        &old_pos,
                        LexerError::UnknownCharacterInString(ch),
                    ));
                }
                _ => {}
            }
            old_pos = self.position;
        }

        Err(Spanning::zero_width(
            &self.position,
            LexerError::UnterminatedString,
        ))
    }

    fn scan_escaped_unicode(
        &mut self,
        start_pos: &SourcePosition,
    ) -> Result<(), Spanning<LexerError>> {
        let (start_idx, _) = self
            .peek_char()
            .ok_or_else(|| Spanning::zero_width(&self.position, LexerError::UnterminatedString))?;
        let mut end_idx = start_idx;

        for _ in 0..4 {
            match self.peek_char() {
                Some((idx, ch)) if ch.is_ascii_hexdigit() => {
                    self.next_char();
                    end_idx = idx + 1;
                }
                Some(_) => break,
                None => {
                    return Err(Spanning::zero_width(
                        &self.position,
                        LexerError::UnterminatedString,
                    ));
                }
            }
        }

        let escape = &self.source[start_idx..end_idx];

        if escape.len() != 4 {
            return Err(Spanning::zero_width(
                start_pos,
                LexerError::UnknownEscapeSequence(format!("\\u{escape}")),
            ));
        }

        Ok(())
    }

    /// Consumes a run of characters matching `pred`, returning its length.
    fn scan_digits(&mut self, pred: fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some((_, ch)) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.next_char();
            count += 1;
        }
        count
    }

    fn expect_digits(&mut self, pred: fn(char) -> bool) -> Result<(), Spanning<LexerError>> {
        if self.scan_digits(pred) > 0 {
            return Ok(());
        }
        Err(match self.peek_char() {
            Some((_, ch)) => {
                Spanning::zero_width(&self.position, LexerError::UnexpectedCharacter(ch))
            }
            None => Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile),
        })
    }

    fn scan_number(&mut self) -> LexerResult<'a> {
        let start_pos = self.position;
        let (start_idx, _) = self
            .peek_char()
            .ok_or_else(|| Spanning::zero_width(&self.position, LexerError::UnexpectedEndOfFile))?;

        if let Some((_, '-')) = self.peek_char() {
            self.next_char();
        }

        let mut is_float = false;
        let mut is_hex = false;

        match self.next_char() {
            Some((_, '0')) => match self.peek_char() {
                Some((_, 'x' | 'X')) => {
                    self.next_char();
                    self.expect_digits(|c| c.is_ascii_hexdigit())?;
                    is_hex = true;
                }
                Some((_, ch)) if ch.is_ascii_digit() => {
                    return Err(Spanning::zero_width(
                        &self.position,
                        LexerError::LeadingZero,
                    ));
                }
                _ => {}
            },
            Some((_, ch)) if ch.is_ascii_digit() => {
                self.scan_digits(|c| c.is_ascii_digit());
            }
            Some((_, ch)) => {
                return Err(Spanning::zero_width(
                    &start_pos,
                    LexerError::UnexpectedCharacter(ch),
                ));
            }
            None => {
                return Err(Spanning::zero_width(
                    &self.position,
                    LexerError::UnexpectedEndOfFile,
                ));
            }
        }

        if let (false, Some((_, '.'))) = (is_hex, self.peek_char()) {
            self.next_char();
            self.expect_digits(|c| c.is_ascii_digit())?;
            is_float = true;
        }

        if let (false, Some((_, 'e' | 'E'))) = (is_hex, self.peek_char()) {
            self.next_char();
            if let Some((_, '+' | '-')) = self.peek_char() {
                self.next_char();
            }
            self.expect_digits(|c| c.is_ascii_digit())?;
            is_float = true;
        }

        if let Some((_, ch)) = self.peek_char() {
            if is_name_start(ch) {
                return Err(Spanning::zero_width(
                    &self.position,
                    LexerError::BadNumberSyntax,
                ));
            }
        }

        let end_idx = self.peek_char().map_or(self.length, |(idx, _)| idx);
        let number = &self.source[start_idx..end_idx];

        let token = if is_float {
            Token::Scalar(ScalarToken::Float(number))
        } else {
            Token::Scalar(ScalarToken::Int(number))
        };

        Ok(Spanning::start_end(&start_pos, &self.position, token))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexerResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_reached_eof {
            return None;
        }

        self.scan_over_whitespace();

        let ch = self.iterator.peek().map(|&(_, ch)| ch);

        let result = match ch {
            Some('!') => Ok(self.emit_single_char(Token::ExclamationMark)),
            Some('$') => Ok(self.emit_single_char(Token::Dollar)),
            Some('(') => Ok(self.emit_single_char(Token::ParenOpen)),
            Some(')') => Ok(self.emit_single_char(Token::ParenClose)),
            Some('[') => Ok(self.emit_single_char(Token::BracketOpen)),
            Some(']') => Ok(self.emit_single_char(Token::BracketClose)),
            Some('{') => Ok(self.emit_single_char(Token::CurlyOpen)),
            Some('}') => Ok(self.emit_single_char(Token::CurlyClose)),
            Some(':') => Ok(self.emit_single_char(Token::Colon)),
            Some('=') => Ok(self.emit_single_char(Token::Equals)),
            Some('@') => Ok(self.emit_single_char(Token::At)),
            Some('|') => Ok(self.emit_single_char(Token::Pipe)),
            Some('#') => self.scan_description(),
            Some('.') => self.scan_ellipsis(),
            Some('"') => self.scan_string(),
            Some(ch) => {
                if is_number_start(ch) {
                    self.scan_number()
                } else if is_name_start(ch) {
                    self.scan_name()
                } else {
                    Err(Spanning::zero_width(
                        &self.position,
                        LexerError::UnknownCharacter(ch),
                    ))
                }
            }
            None => {
                self.has_reached_eof = true;
                return Some(Ok(Spanning::zero_width(&self.position, Token::EndOfFile)));
            }
        };

        // An illegal token terminates the stream.
        if result.is_err() {
            self.has_reached_eof = true;
        }

        Some(result)
    }
}

fn is_source_char(c: char) -> bool {
    c == '\t' || c == '\n' || c == '\r' || c >= ' '
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_name_cont(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

fn is_number_start(c: char) -> bool {
    c == '-' || c.is_ascii_digit()
}
