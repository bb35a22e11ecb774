//! Template specs and their compiled renderers.

use std::path::Path;

use crate::context::Context;
use crate::error::RenderError;
use crate::token::{keys, tokenize, Token};

/// A tokenized template plus the key paths it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    tokens: Vec<Token>,
    keys: Vec<String>,
}

impl TemplateSpec {
    /// Tokenize `text`. `path` only labels parse errors.
    pub fn parse(path: &Path, text: &str) -> Result<Self, RenderError> {
        let tokens = tokenize(text).map_err(|err| RenderError::UnterminatedPlaceholder {
            path: path.to_path_buf(),
            line: text[..err.offset].matches('\n').count() + 1,
            offset: err.offset,
        })?;
        Ok(Self::from_tokens(tokens))
    }

    /// Read and tokenize the template file at `path`.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let text = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let keys = keys(&tokens);
        Self { tokens, keys }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Referenced key paths in order of appearance, duplicates preserved.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn compile(&self) -> CompiledTemplate {
        CompiledTemplate {
            tokens: self.tokens.clone(),
        }
    }
}

/// A renderer: context in, text out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    tokens: Vec<Token>,
}

impl CompiledTemplate {
    /// Concatenate literals verbatim and substitute every key reference.
    ///
    /// Fails with [`RenderError::MissingKey`] on the first absent key.
    pub fn render(&self, values: &Context) -> Result<String, RenderError> {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::KeyRef(path) => {
                    let value = values
                        .get(path)
                        .ok_or_else(|| RenderError::MissingKey { key: path.clone() })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_substitutes_keys_and_keeps_literals() {
        let spec = TemplateSpec::from_tokens(vec![
            Token::Literal("Hi ".to_string()),
            Token::KeyRef("name".to_string()),
            Token::Literal("!\nHow are you?".to_string()),
        ]);
        let ctx = Context::from_iter([("name", "Bob")]);
        assert_eq!(spec.compile().render(&ctx).unwrap(), "Hi Bob!\nHow are you?");
    }

    #[test]
    fn render_without_key_is_missing_key_error() {
        let spec = TemplateSpec::parse(Path::new("t"), "This is {missing}").unwrap();
        let err = spec.compile().render(&Context::new()).unwrap_err();
        assert!(matches!(&err, RenderError::MissingKey { key } if key == "missing"), "got: {err}");
    }

    #[test]
    fn parse_error_names_template_and_line() {
        let err = TemplateSpec::parse(Path::new("conf/app.template"), "a = {a}\nb = {b\n")
            .unwrap_err();
        match &err {
            RenderError::UnterminatedPlaceholder { path, line, offset } => {
                assert_eq!(path, Path::new("conf/app.template"));
                assert_eq!(*line, 2);
                assert_eq!(*offset, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("conf/app.template"));
    }
}
