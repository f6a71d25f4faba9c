//! CSS Parser using cssparser
//!
//! Parses stylesheets into ordered declaration lists while remembering
//! where every declaration sits in the source, so the stylesheet can be
//! written back unchanged apart from inserted declarations.

use cssparser::{ParseError, Parser, ParserInput, SourcePosition, Token};

use crate::declaration::Declaration;
use crate::value::skip_block;
use crate::{CssError, Rule, Stylesheet};

/// At-rules whose block holds rules rather than declarations
const GROUPING_AT_RULES: [&str; 7] = [
    "media",
    "supports",
    "layer",
    "container",
    "document",
    "scope",
    "starting-style",
];

/// CSS Parser
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rules = Vec::new();

        parse_rule_list(&mut parser, &mut rules, true)?;

        tracing::debug!("Parsed {} rules", rules.len());
        Ok(Stylesheet::from_parts(css.to_owned(), rules))
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rule_list<'i>(
    parser: &mut Parser<'i, '_>,
    rules: &mut Vec<Rule>,
    top_level: bool,
) -> Result<(), CssError> {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(()),
        };

        match token {
            Token::WhiteSpace(_)
            | Token::Comment(_)
            | Token::CDO
            | Token::CDC
            | Token::Semicolon => continue,
            Token::CloseCurlyBracket if top_level => {
                return Err(CssError::ParseError {
                    line: parser.current_source_location().line + 1,
                    message: "unexpected `}`".to_string(),
                });
            }
            Token::AtKeyword(name) => {
                let grouping = GROUPING_AT_RULES.iter().any(|g| name.eq_ignore_ascii_case(g));
                let Some(block_start) = find_block(parser) else {
                    // Statement at-rule such as @import
                    continue;
                };
                let prelude = parser.slice(start..block_start).trim().to_string();
                if grouping {
                    parse_nested(parser, |nested| parse_rule_list(nested, rules, false))?;
                } else {
                    parse_nested(parser, |nested| parse_declaration_block(nested, prelude, rules))?;
                }
            }
            Token::CurlyBracketBlock => {
                parse_nested(parser, |nested| parse_declaration_block(nested, String::new(), rules))?;
            }
            _ => {
                let Some(block_start) = find_block(parser) else {
                    continue;
                };
                let selector = parser.slice(start..block_start).trim().to_string();
                parse_nested(parser, |nested| parse_declaration_block(nested, selector, rules))?;
            }
        }
    }
}

/// Consume a prelude up to its `{}` block, returning where the block starts.
/// `None` if a `;` or the end of input came first.
fn find_block(parser: &mut Parser<'_, '_>) -> Option<SourcePosition> {
    loop {
        let position = parser.position();
        match parser.next_including_whitespace_and_comments() {
            Ok(Token::CurlyBracketBlock) => return Some(position),
            Ok(Token::Semicolon) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// Run `parse` over the contents of the block that was just opened
fn parse_nested<'i, F>(parser: &mut Parser<'i, '_>, parse: F) -> Result<(), CssError>
where
    F: for<'tt> FnOnce(&mut Parser<'i, 'tt>) -> Result<(), CssError>,
{
    match parser.parse_nested_block(|nested| Ok::<_, ParseError<'i, ()>>(parse(nested))) {
        Ok(result) => result,
        Err(_) => Ok(()),
    }
}

/// Where a declaration-block item has got to while scanning its tokens
#[derive(Clone, Copy)]
enum ItemShape {
    /// Starts with an identifier; holds the end of the name
    Name(SourcePosition),
    /// Name and colon seen
    Value {
        name_end: SourcePosition,
        value_start: Option<SourcePosition>,
        value_end: Option<SourcePosition>,
    },
    /// Not a declaration
    Other,
}

fn parse_declaration_block<'i>(
    parser: &mut Parser<'i, '_>,
    selector: String,
    rules: &mut Vec<Rule>,
) -> Result<(), CssError> {
    let slot = rules.len();
    rules.push(Rule::new(selector));
    let mut gap_start = parser.position();

    loop {
        let item_start = parser.position();
        let first = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        let mut shape = match first {
            Token::WhiteSpace(_) | Token::Comment(_) => continue,
            Token::Semicolon => {
                gap_start = parser.position();
                continue;
            }
            Token::Ident(_) => ItemShape::Name(parser.position()),
            _ => ItemShape::Other,
        };

        let mut block_start = match first {
            Token::CurlyBracketBlock => Some(item_start),
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                skip_block(parser);
                None
            }
            _ => None,
        };
        let mut item_end = parser.position();

        while block_start.is_none() {
            let position = parser.position();
            let token = match parser.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => {
                    item_end = parser.position();
                    break;
                }
            };
            item_end = position;

            match token {
                Token::Semicolon => break,
                Token::WhiteSpace(_) | Token::Comment(_) => continue,
                _ => {}
            }
            let opens_block = matches!(
                token,
                Token::Function(_)
                    | Token::ParenthesisBlock
                    | Token::SquareBracketBlock
                    | Token::CurlyBracketBlock
            );

            match shape {
                ItemShape::Name(name_end) if matches!(token, Token::Colon) => {
                    shape = ItemShape::Value {
                        name_end,
                        value_start: None,
                        value_end: None,
                    };
                }
                ItemShape::Value { name_end, value_start, .. } => {
                    let custom = parser.slice(item_start..name_end).starts_with("--");
                    if matches!(token, Token::CurlyBracketBlock) && !custom {
                        block_start = Some(position);
                        break;
                    }
                    if opens_block {
                        skip_block(parser);
                    }
                    shape = ItemShape::Value {
                        name_end,
                        value_start: value_start.or(Some(position)),
                        value_end: Some(parser.position()),
                    };
                }
                _ if matches!(token, Token::CurlyBracketBlock) => {
                    block_start = Some(position);
                    break;
                }
                _ => {
                    if opens_block {
                        skip_block(parser);
                    }
                    shape = ItemShape::Other;
                }
            }
        }

        if let Some(block_start) = block_start {
            // Nested rule or nested at-rule
            let prelude = parser.slice(item_start..block_start).trim().to_string();
            parse_nested(parser, |nested| parse_declaration_block(nested, prelude, rules))?;
            gap_start = parser.position();
            continue;
        }

        if let ItemShape::Value { name_end, value_start, value_end } = shape {
            let value_start = value_start.unwrap_or(item_end);
            let value_end = value_end.unwrap_or(item_end);
            let (value, important) = split_important(parser.slice(value_start..value_end));
            let gap = parser.slice(gap_start..item_start);

            rules[slot].declarations.push(Declaration {
                property: parser.slice(item_start..name_end).to_string(),
                value: value.to_string(),
                important,
                before: gap[gap.trim_end().len()..].to_string(),
                between: parser.slice(name_end..value_start).to_string(),
                offset: Some(item_start.byte_index()),
            });
        }
        gap_start = parser.position();
    }

    rules[slot].block_end = parser.position().byte_index();
    Ok(())
}

/// Split a trailing `!important` off a raw value
fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim();
    if let Some(bang) = trimmed.rfind('!') {
        if trimmed[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (trimmed[..bang].trim_end(), true);
        }
    }
    (trimmed, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let css = r#"
            .foo { overflow: clip; }
            #bar { color: red; overflow-x: overlay !important }
        "#;

        let result = CssParser::new().parse(css);
        assert!(result.is_ok(), "Parse error: {:?}", result.err());

        let stylesheet = result.unwrap();
        assert_eq!(stylesheet.len(), 2);
        assert_eq!(stylesheet.rules()[0].selector, ".foo");
        assert_eq!(stylesheet.rules()[1].declarations.to_css(), "color: red; overflow-x: overlay !important;");
    }

    #[test]
    fn test_declaration_raws() {
        let css = "a{\n  overflow :clip;color:red}";
        let stylesheet = CssParser::new().parse(css).unwrap();
        let decls = &stylesheet.rules()[0].declarations;

        assert_eq!(decls[0].property, "overflow");
        assert_eq!(decls[0].value, "clip");
        assert_eq!(decls[0].before, "\n  ");
        assert_eq!(decls[0].between, " :");
        assert_eq!(decls[0].offset, Some(5));
        assert_eq!(decls[1].before, "");
    }

    #[test]
    fn test_function_values_keep_source_text() {
        let css = "a { overflow: var(--x, clip) ; }";
        let stylesheet = CssParser::new().parse(css).unwrap();
        assert_eq!(stylesheet.rules()[0].declarations[0].value, "var(--x, clip)");
    }

    #[test]
    fn test_nested_rules_are_separate() {
        let css = "a { overflow: clip; &:hover { overflow: overlay } b:focus { overflow: clip } }";
        let stylesheet = CssParser::new().parse(css).unwrap();

        assert_eq!(stylesheet.len(), 3);
        assert_eq!(stylesheet.rules()[0].declarations.len(), 1);
        assert_eq!(stylesheet.rules()[1].selector, "&:hover");
        assert_eq!(stylesheet.rules()[2].selector, "b:focus");
        assert_eq!(stylesheet.rules()[2].declarations[0].value, "clip");
    }

    #[test]
    fn test_at_rules() {
        let css = r#"
            @import url("x.css");
            @media (min-width: 10px) { a { overflow: clip } }
            @font-face { font-family: x }
        "#;
        let stylesheet = CssParser::new().parse(css).unwrap();

        assert_eq!(stylesheet.len(), 2);
        assert_eq!(stylesheet.rules()[0].selector, "a");
        assert_eq!(stylesheet.rules()[1].selector, "@font-face");
    }

    #[test]
    fn test_unmatched_close_brace() {
        let err = CssParser::new().parse("a { }\n}").unwrap_err();
        assert!(matches!(err, CssError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_split_important() {
        assert_eq!(split_important("clip !important"), ("clip", true));
        assert_eq!(split_important("clip!IMPORTANT "), ("clip", true));
        assert_eq!(split_important("clip ! important"), ("clip", true));
        assert_eq!(split_important("clip"), ("clip", false));
        assert_eq!(split_important("\"a!b\""), ("\"a!b\"", false));
    }
}
