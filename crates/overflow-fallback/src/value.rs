//! Value Tokenizer
//!
//! Splits a declaration value into keyword, whitespace, function and other
//! tokens using cssparser. Every token keeps its exact source text, so the
//! token list reassembles into the original value.

use std::fmt;

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::properties::OverflowKeyword;

/// Longest keyword accepted in the two-keyword syntax
const MAX_KEYWORD_LEN: usize = 20;

/// A single value token with its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueToken {
    /// Bare identifier
    Word(String),
    /// Whitespace run
    Space(String),
    /// Function call, arguments and closing parenthesis included
    Function(String),
    /// Numbers, strings, commas, blocks, comments
    Other(String),
}

impl ValueToken {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Word(s) | Self::Space(s) | Self::Function(s) | Self::Other(s) => s,
        }
    }
}

/// Ordered, lossless token list for one value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueTokens {
    tokens: Vec<ValueToken>,
}

impl ValueTokens {
    pub fn parse(value: &str) -> Self {
        let mut input = ParserInput::new(value);
        let mut parser = Parser::new(&mut input);
        let mut tokens = Vec::new();

        loop {
            let start = parser.position();
            let token = match parser.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            if matches!(
                token,
                Token::Function(_)
                    | Token::ParenthesisBlock
                    | Token::SquareBracketBlock
                    | Token::CurlyBracketBlock
            ) {
                skip_block(&mut parser);
            }

            let text = parser.slice_from(start).to_owned();
            tokens.push(match token {
                Token::Ident(_) => ValueToken::Word(text),
                Token::WhiteSpace(_) => ValueToken::Space(text),
                Token::Function(_) => ValueToken::Function(text),
                _ => ValueToken::Other(text),
            });
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[ValueToken] {
        &self.tokens
    }

    /// The two keywords of a `keyword keyword` value.
    ///
    /// Matches only a word, one space character and a word, each word being
    /// 2 to 20 ASCII letters.
    pub fn keyword_pair(&self) -> Option<(&str, &str)> {
        match self.tokens.as_slice() {
            [ValueToken::Word(first), ValueToken::Space(space), ValueToken::Word(second)]
                if space == " " && is_plain_keyword(first) && is_plain_keyword(second) =>
            {
                Some((first, second))
            }
            _ => None,
        }
    }

    /// Rewrite every `from` word to `to`. Returns true if anything changed.
    pub fn replace_keyword(&mut self, from: OverflowKeyword, to: OverflowKeyword) -> bool {
        let mut changed = false;
        for token in &mut self.tokens {
            if let ValueToken::Word(word) = token {
                if word == from.as_str() {
                    *word = to.as_str().to_owned();
                    changed = true;
                }
            }
        }
        changed
    }
}

impl fmt::Display for ValueTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}

fn is_plain_keyword(word: &str) -> bool {
    (2..=MAX_KEYWORD_LEN).contains(&word.len()) && word.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Consume the contents of the block that was just opened
pub(crate) fn skip_block<'i>(parser: &mut Parser<'i, '_>) {
    let _ = parser.parse_nested_block(|nested| {
        while nested.next_including_whitespace_and_comments().is_ok() {}
        Ok::<(), ParseError<'i, ()>>(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keyword_pair() {
        let tokens = ValueTokens::parse("hidden clip");
        assert_eq!(
            tokens.tokens(),
            &[
                ValueToken::Word("hidden".into()),
                ValueToken::Space(" ".into()),
                ValueToken::Word("clip".into()),
            ]
        );
        assert_eq!(tokens.keyword_pair(), Some(("hidden", "clip")));
    }

    #[test]
    fn test_function_is_one_token() {
        let tokens = ValueTokens::parse("var(--something-something, clip)");
        assert!(matches!(tokens.tokens(), [ValueToken::Function(_)]));
        assert_eq!(tokens.to_string(), "var(--something-something, clip)");
    }

    #[test]
    fn test_lossless_reassembly() {
        for value in [
            "clip",
            "hidden  clip",
            "auto /* note */ overlay",
            "calc(1px + 2px) 'clip' , scroll",
            "",
        ] {
            assert_eq!(ValueTokens::parse(value).to_string(), value);
        }
    }

    #[test]
    fn test_keyword_pair_rejections() {
        assert_eq!(ValueTokens::parse("clip").keyword_pair(), None);
        assert_eq!(ValueTokens::parse("clip  clip").keyword_pair(), None);
        assert_eq!(ValueTokens::parse("clip\tclip").keyword_pair(), None);
        assert_eq!(ValueTokens::parse("clip clip clip").keyword_pair(), None);
        assert_eq!(ValueTokens::parse("hidden var(--x)").keyword_pair(), None);
        assert_eq!(ValueTokens::parse("x clip").keyword_pair(), None);
        assert_eq!(ValueTokens::parse("-webkit-clip clip").keyword_pair(), None);
        assert_eq!(
            ValueTokens::parse("abcdefghijklmnopqrstu clip").keyword_pair(),
            None
        );
    }

    #[test]
    fn test_replace_keyword_only_touches_words() {
        let mut tokens = ValueTokens::parse("clip var(--a, clip)");
        assert!(tokens.replace_keyword(OverflowKeyword::Clip, OverflowKeyword::Hidden));
        assert_eq!(tokens.to_string(), "hidden var(--a, clip)");

        let mut tokens = ValueTokens::parse("auto scroll");
        assert!(!tokens.replace_keyword(OverflowKeyword::Overlay, OverflowKeyword::Auto));
        assert_eq!(tokens.to_string(), "auto scroll");
    }
}
