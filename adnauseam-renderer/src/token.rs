//! Tokenizer: splits raw template text into literals and key references.
//!
//! `{` opens a placeholder and the first `}` after it closes it; the interior,
//! trimmed, is the key path. A `}` outside a placeholder is literal text.
//! There is no escape for a literal `{`.

use thiserror::Error;

/// One piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text emitted verbatim.
    Literal(String),
    /// A placeholder substituted with the value stored under this key path.
    KeyRef(String),
}

/// The input ended inside a placeholder opened at byte `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unterminated placeholder opened at byte {offset}")]
pub struct UnterminatedPlaceholder {
    pub offset: usize,
}

/// Split `text` into an ordered token sequence.
///
/// Never emits an empty [`Token::Literal`].
pub fn tokenize(text: &str) -> Result<Vec<Token>, UnterminatedPlaceholder> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let mut offset = 0;

    while !rest.is_empty() {
        let Some(open) = rest.find('{') else {
            tokens.push(Token::Literal(rest.to_string()));
            break;
        };
        if open > 0 {
            tokens.push(Token::Literal(rest[..open].to_string()));
        }

        let interior = &rest[open + 1..];
        let close = interior.find('}').ok_or(UnterminatedPlaceholder {
            offset: offset + open,
        })?;
        tokens.push(Token::KeyRef(interior[..close].trim().to_string()));

        // '{' + interior + '}'
        let consumed = open + 1 + close + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }

    Ok(tokens)
}

/// Every key path referenced by `tokens`, in order, duplicates included.
pub fn keys(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::KeyRef(path) => Some(path.clone()),
            Token::Literal(_) => None,
        })
        .collect()
}
