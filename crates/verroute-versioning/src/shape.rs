//! Tokenized route paths and their structural shape
//!
//! A declared path such as `/users/:id/posts/{post_id}` is tokenized into a
//! [`PathShape`]: literal segments and named variables. For comparison the
//! names are irrelevant, so every shape normalizes to a [`ShapeKey`] where
//! each variable becomes the same wildcard:
//!
//! ```
//! use verroute_versioning::PathShape;
//!
//! let a = PathShape::parse("/:id/foo").unwrap();
//! let b = PathShape::parse("/{other_name}/foo").unwrap();
//! assert_eq!(a.normalize(), b.normalize());
//! assert_eq!(a.normalize().to_string(), "/:_/foo");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One segment of a declared path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PathToken {
    /// Matches exactly this text
    Literal(String),
    /// Matches any single non-empty segment, captured under this name
    Variable(String),
}

impl PathToken {
    /// Create a literal token
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Create a variable token
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }
}

/// A tokenized route path, variable names included
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathShape {
    tokens: Vec<PathToken>,
}

impl PathShape {
    /// Create a shape from already tokenized segments
    pub fn new(tokens: Vec<PathToken>) -> Self {
        Self { tokens }
    }

    /// The root path `/`
    pub fn root() -> Self {
        Self::default()
    }

    /// Tokenize a path string
    ///
    /// Variables are written as `:name` or `{name}` and must take a whole
    /// segment. A single trailing slash is ignored.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let Some(body) = path.strip_prefix('/') else {
            return Err(PathError::MustStartWithSlash {
                path: path.to_string(),
            });
        };

        let body = body.strip_suffix('/').unwrap_or(body);
        if body.is_empty() {
            return Ok(Self::root());
        }

        let mut tokens = Vec::new();
        let mut offset = 1;
        for segment in body.split('/') {
            let token = parse_segment(path, segment, offset)?;
            if let PathToken::Variable(name) = &token {
                let duplicate = tokens
                    .iter()
                    .any(|t| matches!(t, PathToken::Variable(existing) if existing == name));
                if duplicate {
                    return Err(PathError::DuplicateParameter {
                        path: path.to_string(),
                        param_name: name.clone(),
                    });
                }
            }
            tokens.push(token);
            offset += segment.len() + 1;
        }

        Ok(Self { tokens })
    }

    /// The tokens in declaration order
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    /// Collapse every variable to the wildcard marker
    pub fn normalize(&self) -> ShapeKey {
        ShapeKey(
            self.tokens
                .iter()
                .map(|token| match token {
                    PathToken::Literal(text) => ShapeSegment::Literal(text.clone()),
                    PathToken::Variable(_) => ShapeSegment::Wildcard,
                })
                .collect(),
        )
    }

    /// Variable names paired with their segment positions
    pub fn variables(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| match token {
                PathToken::Variable(name) => Some((i, name.as_str())),
                PathToken::Literal(_) => None,
            })
    }
}

impl fmt::Display for PathShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return f.write_str("/");
        }
        for token in &self.tokens {
            match token {
                PathToken::Literal(text) => write!(f, "/{}", text)?,
                PathToken::Variable(name) => write!(f, "/:{}", name)?,
            }
        }
        Ok(())
    }
}

/// One segment of a normalized shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeSegment {
    /// Literal text
    Literal(String),
    /// Any variable, whatever its declared name
    Wildcard,
}

/// Name-independent form of a [`PathShape`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShapeKey(Vec<ShapeSegment>);

impl ShapeKey {
    /// The normalized segments
    pub fn segments(&self) -> &[ShapeSegment] {
        &self.0
    }

    /// Render as a radix tree pattern
    ///
    /// Wildcards get names derived from their position, so equal keys always
    /// produce the same pattern.
    pub(crate) fn matcher_path(&self) -> String {
        if self.0.is_empty() {
            return "/".to_string();
        }
        let mut result = String::new();
        for (i, segment) in self.0.iter().enumerate() {
            result.push('/');
            match segment {
                ShapeSegment::Literal(text) => result.push_str(text),
                ShapeSegment::Wildcard => {
                    result.push(':');
                    result.push_str(&matcher_param(i));
                }
            }
        }
        result
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            match segment {
                ShapeSegment::Literal(text) => write!(f, "/{}", text)?,
                ShapeSegment::Wildcard => f.write_str("/:_")?,
            }
        }
        Ok(())
    }
}

/// Placeholder name used in the radix tree for the segment at `position`
pub(crate) fn matcher_param(position: usize) -> String {
    format!("p{}", position)
}

fn parse_segment(path: &str, segment: &str, offset: usize) -> Result<PathToken, PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment {
            path: path.to_string(),
        });
    }

    if let Some(name) = segment.strip_prefix(':') {
        validate_param_name(path, name, offset)?;
        return Ok(PathToken::Variable(name.to_string()));
    }

    if let Some(inner) = segment.strip_prefix('{') {
        let Some(name) = inner.strip_suffix('}') else {
            return Err(PathError::UnclosedBrace {
                path: path.to_string(),
            });
        };
        if let Some(pos) = name.find(['{', '}']) {
            return Err(PathError::NestedBraces {
                path: path.to_string(),
                position: offset + 1 + pos,
            });
        }
        validate_param_name(path, name, offset)?;
        return Ok(PathToken::Variable(name.to_string()));
    }

    for (i, ch) in segment.char_indices() {
        match ch {
            '}' => {
                return Err(PathError::UnmatchedClosingBrace {
                    path: path.to_string(),
                    position: offset + i,
                })
            }
            '{' | ':' => {
                return Err(PathError::PartialParameter {
                    path: path.to_string(),
                    position: offset + i,
                })
            }
            _ if ch.is_alphanumeric() || "-_.~".contains(ch) => {}
            _ => {
                return Err(PathError::InvalidCharacter {
                    path: path.to_string(),
                    character: ch,
                    position: offset + i,
                })
            }
        }
    }

    Ok(PathToken::Literal(segment.to_string()))
}

fn validate_param_name(path: &str, name: &str, position: usize) -> Result<(), PathError> {
    if name.is_empty() {
        return Err(PathError::EmptyParameterName {
            path: path.to_string(),
            position,
        });
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(PathError::InvalidParameterName {
            path: path.to_string(),
            param_name: name.to_string(),
            position,
        });
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(PathError::ParameterStartsWithDigit {
            path: path.to_string(),
            param_name: name.to_string(),
            position,
        });
    }
    Ok(())
}

/// Error produced when tokenizing a route path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path must start with '/'
    #[error("route path must start with '/', got: \"{path}\"")]
    MustStartWithSlash { path: String },
    /// Path contains empty segment (double slash)
    #[error("route path contains empty segment (double slash): \"{path}\"")]
    EmptySegment { path: String },
    /// Nested braces are not allowed
    #[error("nested braces are not allowed in route path at position {position}: \"{path}\"")]
    NestedBraces { path: String, position: usize },
    /// Unmatched closing brace
    #[error("unmatched closing brace '}}' at position {position} in route path: \"{path}\"")]
    UnmatchedClosingBrace { path: String, position: usize },
    /// Empty parameter name
    #[error("empty parameter name at position {position} in route path: \"{path}\"")]
    EmptyParameterName { path: String, position: usize },
    /// Invalid parameter name (contains invalid characters)
    #[error("invalid parameter name '{param_name}' at position {position} - parameter names must contain only alphanumeric characters and underscores: \"{path}\"")]
    InvalidParameterName {
        path: String,
        param_name: String,
        position: usize,
    },
    /// Parameter name starts with digit
    #[error("parameter name '{param_name}' cannot start with a digit at position {position}: \"{path}\"")]
    ParameterStartsWithDigit {
        path: String,
        param_name: String,
        position: usize,
    },
    /// The same parameter name appears twice
    #[error("parameter name '{param_name}' is used more than once in route path: \"{path}\"")]
    DuplicateParameter { path: String, param_name: String },
    /// A parameter shares its segment with literal text
    #[error("parameters must take a whole segment, found one at position {position}: \"{path}\"")]
    PartialParameter { path: String, position: usize },
    /// Unclosed brace
    #[error("unclosed brace '{{' in route path (missing closing '}}'): \"{path}\"")]
    UnclosedBrace { path: String },
    /// Invalid character in path
    #[error("invalid character '{character}' at position {position} in route path: \"{path}\"")]
    InvalidCharacter {
        path: String,
        character: char,
        position: usize,
    },
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn segment_strategy() -> impl Strategy<Value = (bool, String)> {
        (any::<bool>(), "[a-z][a-z0-9_]{0,7}")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Renaming variables never changes the normalized key
        #[test]
        fn prop_variable_names_do_not_affect_key(
            segments in prop::collection::vec(segment_strategy(), 0..6),
            suffix in "[a-z]{1,4}",
        ) {
            let original: Vec<PathToken> = segments
                .iter()
                .map(|(is_var, text)| if *is_var {
                    PathToken::variable(text.clone())
                } else {
                    PathToken::literal(text.clone())
                })
                .collect();
            let renamed: Vec<PathToken> = original
                .iter()
                .map(|token| match token {
                    PathToken::Variable(name) => PathToken::variable(format!("{}_{}", name, suffix)),
                    other => other.clone(),
                })
                .collect();

            prop_assert_eq!(
                PathShape::new(original).normalize(),
                PathShape::new(renamed).normalize()
            );
        }

        /// Display output parses back to the same shape
        #[test]
        fn prop_display_parses_back(
            segments in prop::collection::vec(segment_strategy(), 0..6),
        ) {
            let tokens: Vec<PathToken> = segments
                .iter()
                .enumerate()
                .map(|(i, (is_var, text))| if *is_var {
                    PathToken::variable(format!("{}{}", text, i))
                } else {
                    PathToken::literal(text.clone())
                })
                .collect();
            let shape = PathShape::new(tokens);
            let reparsed = PathShape::parse(&shape.to_string()).unwrap();
            prop_assert_eq!(reparsed, shape);
        }
    }
}
