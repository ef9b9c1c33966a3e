//! CQP query compiler
//!
//! Parses query strings like `[word="ev.*" & pos="NOUN"] [pos="VERB"]` into a
//! [`QueryPattern`] using the pest grammar in `cqp.pest`.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::pattern::{QueryPattern, TokenConstraint, TokenField};

#[derive(Parser)]
#[grammar = "cqp.pest"]
struct CqpParser;

/// Error type for query compilation failures
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Empty query")]
    Empty,

    #[error("No valid token patterns found. Use format: [attribute=\"value\"]")]
    NoTokenPatterns,

    #[error("No valid attributes found in [{0}]")]
    NoAttributes(String),

    #[error("Query error: {0}")]
    Grammar(#[from] pest::error::Error<Rule>),
}

/// How attribute values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Values are regexes (else literal equality); see [`TokenConstraint::set`]
    pub regex: bool,
    pub case_sensitive: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            regex: true,
            case_sensitive: false,
        }
    }
}

/// Compile a query with default options (regex, case-insensitive)
pub fn compile_query(input: &str) -> Result<QueryPattern, QueryError> {
    compile_query_with(input, CompileOptions::default())
}

pub fn compile_query_with(
    input: &str,
    options: CompileOptions,
) -> Result<QueryPattern, QueryError> {
    if input.trim().is_empty() {
        return Err(QueryError::Empty);
    }

    let mut pairs = CqpParser::parse(Rule::query, input)?;
    let Some(query) = pairs.next() else {
        return Err(QueryError::NoTokenPatterns);
    };

    let constraints = query
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::group)
        .map(|group| compile_group(group, options))
        .collect::<Result<Vec<_>, _>>()?;

    if constraints.is_empty() {
        return Err(QueryError::NoTokenPatterns);
    }

    Ok(QueryPattern::new(constraints))
}

/// Compile one bracket group into a constraint
fn compile_group(group: Pair<Rule>, options: CompileOptions) -> Result<TokenConstraint, QueryError> {
    let Some(body) = group.into_inner().next() else {
        return Err(QueryError::NoAttributes(String::new()));
    };
    let text = body.as_str();

    let mut constraint = TokenConstraint::new(options.regex, options.case_sensitive);
    let mut found = false;

    for attr in body.into_inner().filter(|p| p.as_rule() == Rule::attr_pair) {
        let mut inner = attr.into_inner();
        let (Some(name), Some(value)) = (inner.next(), inner.next()) else {
            continue;
        };
        if let Some(field) = TokenField::from_name(name.as_str()) {
            // A repeated attribute keeps its last value
            constraint.set(field, value.as_str());
            found = true;
        }
    }

    if found {
        Ok(constraint)
    } else {
        Err(QueryError::NoAttributes(text.to_string()))
    }
}

/// Check a query without keeping the compiled pattern
pub fn validate_query(input: &str) -> (bool, Option<String>) {
    match compile_query(input) {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    }
}

/// Summary of a query for interactive feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryInfo {
    pub valid: bool,
    pub error: Option<String>,
    pub token_count: usize,
    /// Attribute names in lexical order
    pub attributes_used: Vec<String>,
    pub is_sequence: bool,
}

pub fn query_info(input: &str) -> QueryInfo {
    match compile_query(input) {
        Ok(pattern) => {
            let attributes: BTreeSet<&str> = pattern
                .constraints
                .iter()
                .flat_map(|c| c.fields())
                .map(TokenField::name)
                .collect();
            QueryInfo {
                valid: true,
                error: None,
                token_count: pattern.len(),
                attributes_used: attributes.into_iter().map(str::to_string).collect(),
                is_sequence: pattern.is_sequence(),
            }
        }
        Err(e) => QueryInfo {
            valid: false,
            error: Some(e.to_string()),
            token_count: 0,
            attributes_used: Vec::new(),
            is_sequence: false,
        },
    }
}
