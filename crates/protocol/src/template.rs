// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQL query template compilation.
//!
//! Compiles `{name}`-style placeholders into `:name` named parameters for a
//! parameterized query, with `{{`/`}}` as escapes for literal braces.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::value::VarMap;

/// Errors raised while compiling a query template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unmatched '{{' in query template")]
    UnmatchedOpenBrace,
    #[error("single '}}' in query template")]
    UnmatchedCloseBrace,
    #[error("empty placeholder '{{}}' in query template")]
    EmptyPlaceholder,
    #[error("invalid placeholder name '{0}' in query template")]
    InvalidPlaceholderName(String),
    #[error("missing variables for query template: {0}")]
    MissingVariables(String),
}

/// A compiled query template: SQL with `:name` parameters, plus the set of
/// parameter names it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQueryTemplate {
    pub sql: String,
    pub param_names: BTreeSet<String>,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Compile a template with `{name}` placeholders into SQL with `:name`
/// parameters. `{{` and `}}` are escapes for literal braces.
pub fn compile_query_template(template: &str) -> Result<CompiledQueryTemplate, TemplateError> {
    let chars: Vec<char> = template.chars().collect();
    let n = chars.len();
    let mut out = String::new();
    let mut param_names = BTreeSet::new();
    let mut i = 0;

    while i < n {
        let ch = chars[i];

        if ch == '{' {
            if i + 1 < n && chars[i + 1] == '{' {
                out.push('{');
                i += 2;
                continue;
            }

            let mut j = i + 1;
            while j < n && chars[j] != '}' {
                j += 1;
            }
            if j >= n {
                return Err(TemplateError::UnmatchedOpenBrace);
            }

            let name: String = chars[i + 1..j].iter().collect::<String>().trim().to_string();
            if name.is_empty() {
                return Err(TemplateError::EmptyPlaceholder);
            }
            if !is_identifier(&name) {
                return Err(TemplateError::InvalidPlaceholderName(name));
            }

            out.push(':');
            out.push_str(&name);
            param_names.insert(name);
            i = j + 1;
            continue;
        }

        if ch == '}' {
            if i + 1 < n && chars[i + 1] == '}' {
                out.push('}');
                i += 2;
                continue;
            }
            return Err(TemplateError::UnmatchedCloseBrace);
        }

        out.push(ch);
        i += 1;
    }

    Ok(CompiledQueryTemplate {
        sql: out,
        param_names,
    })
}

/// Build the final SQL and parameter map from a template and the available
/// variables. Missing placeholders are reported sorted; extra variables are
/// ignored.
pub fn build_query(
    template: &str,
    variables: &VarMap,
) -> Result<(String, VarMap), TemplateError> {
    let compiled = compile_query_template(template)?;

    let mut params = VarMap::new();
    let mut missing = Vec::new();

    for name in &compiled.param_names {
        match variables.get(name) {
            Some(value) => {
                params.insert(name.clone(), value.clone());
            }
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        missing.sort();
        return Err(TemplateError::MissingVariables(missing.join(", ")));
    }

    Ok((compiled.sql, params))
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
