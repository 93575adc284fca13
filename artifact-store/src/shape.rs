//! Structural checks that turn untyped JSON into domain values.
//!
//! Every failure names the offending element.

use serde_json::Value;
use std::path::Path;
use trendscope_core::{
    ArtifactError, Category, KeywordCount, KeywordRanking, RawDocument, Stage,
};

fn structure(path: &Path, stage: Stage, details: String) -> ArtifactError {
    ArtifactError::Structure {
        path: path.to_path_buf(),
        stage,
        details,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn expect_array<'v>(
    value: &'v Value,
    path: &Path,
    stage: Stage,
) -> Result<&'v Vec<Value>, ArtifactError> {
    value.as_array().ok_or_else(|| {
        structure(
            path,
            stage,
            format!("expected a top-level array, found {}", kind(value)),
        )
    })
}

pub(crate) fn documents(
    value: &Value,
    path: &Path,
    stage: Stage,
) -> Result<Vec<RawDocument>, ArtifactError> {
    expect_array(value, path, stage)?
        .iter()
        .enumerate()
        .map(|(index, element)| {
            element
                .as_str()
                .map(RawDocument::from)
                .ok_or_else(|| {
                    structure(
                        path,
                        stage,
                        format!("element {index} is {}, expected a string", kind(element)),
                    )
                })
        })
        .collect()
}

pub(crate) fn ranking(
    value: &Value,
    path: &Path,
    stage: Stage,
) -> Result<KeywordRanking, ArtifactError> {
    let entries = expect_array(value, path, stage)?
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let invalid = |what: String| structure(path, stage, format!("element {index} {what}"));

            let pair = match element.as_array() {
                Some(pair) if pair.len() == 2 => pair,
                Some(items) => {
                    return Err(invalid(format!(
                        "has {} items, expected a [word, count] pair",
                        items.len()
                    )))
                }
                None => {
                    return Err(invalid(format!(
                        "is {}, expected a [word, count] pair",
                        kind(element)
                    )))
                }
            };

            let word = pair[0].as_str().ok_or_else(|| {
                invalid(format!(
                    "has {} as its word, expected a string",
                    kind(&pair[0])
                ))
            })?;
            let count = pair[1].as_u64().ok_or_else(|| {
                invalid(format!(
                    "has count {}, expected a non-negative integer",
                    pair[1]
                ))
            })?;

            Ok(KeywordCount::new(word, count))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KeywordRanking::new(entries))
}

/// Category name to account list, in file order.
pub(crate) fn categories(
    value: &Value,
    path: &Path,
    stage: Stage,
) -> Result<Vec<Category>, ArtifactError> {
    let map = value.as_object().ok_or_else(|| {
        structure(
            path,
            stage,
            format!("expected an object of category lists, found {}", kind(value)),
        )
    })?;

    map.iter()
        .map(|(name, accounts)| {
            let list = accounts.as_array().ok_or_else(|| {
                structure(
                    path,
                    stage,
                    format!("category {name:?} is {}, expected a list of URLs", kind(accounts)),
                )
            })?;
            let accounts = list
                .iter()
                .enumerate()
                .map(|(index, url)| {
                    url.as_str().map(str::to_string).ok_or_else(|| {
                        structure(
                            path,
                            stage,
                            format!(
                                "category {name:?} entry {index} is {}, expected a string",
                                kind(url)
                            ),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Category {
                name: name.clone(),
                accounts,
            })
        })
        .collect()
}
