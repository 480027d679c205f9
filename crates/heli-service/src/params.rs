//! Request parameter validation
//!
//! Parameters arrive as free-form JSON. Type errors are fatal for the
//! request; unknown language codes only produce a warning.

use heli_classifier::{langcodes, AssemblyOptions};
use heli_core::{Error, Result, StatusMessage};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Validated parameters plus any warnings to return with the response
#[derive(Debug, Clone, Default)]
pub struct ParsedParams {
    pub options: AssemblyOptions,
    pub warnings: Vec<StatusMessage>,
}

/// Validate and normalize request parameters
pub fn parse_params(params: Option<&Map<String, Value>>) -> Result<ParsedParams> {
    let mut parsed = ParsedParams::default();
    let Some(params) = params else {
        return Ok(parsed);
    };

    parsed.options.include_orig = match present(params, "includeOrig") {
        None => false,
        Some(Value::Bool(include)) => *include,
        Some(other) => {
            return Err(Error::invalid_parameter(format!(
                "includeOrig must be a boolean, got {}",
                other
            )))
        }
    };

    if let Some(value) = present(params, "languageSet") {
        let Value::Array(entries) = value else {
            return Err(Error::invalid_parameter(format!(
                "languageSet must be a list, got {}",
                value
            )));
        };
        let (languages, invalid) = normalize_language_set(entries);

        if !invalid.is_empty() {
            warn!(invalid = ?invalid, "Ignoring invalid languageSet entries");
            parsed.warnings.push(StatusMessage::invalid_languages(&invalid));
        }
        parsed.options.language_set = (!languages.is_empty()).then_some(languages);
    }

    if let Some(value) = present(params, "languageMap") {
        let Value::Object(map) = value else {
            return Err(Error::invalid_parameter(format!(
                "languageMap must be an object, got {}",
                value
            )));
        };
        parsed.options.language_map = map
            .iter()
            .filter_map(|(from, to)| to.as_str().map(|to| (from.clone(), to.to_string())))
            .collect::<HashMap<_, _>>();
    }

    if let Some(value) = present(params, "bestLangs") {
        let best = value
            .as_u64()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                Error::invalid_parameter(format!(
                    "bestLangs must be a positive integer, got {}",
                    value
                ))
            })?;
        parsed.options.best_langs = Some(usize::try_from(best).unwrap_or(usize::MAX));
    }

    Ok(parsed)
}

/// A parameter that is set to something other than null
fn present<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    params.get(key).filter(|value| !value.is_null())
}

/// Split `languageSet` entries into normalized alpha-3 codes and rejects.
///
/// Valid entries keep their order; duplicates after normalization are dropped.
fn normalize_language_set(entries: &[Value]) -> (Vec<String>, Vec<String>) {
    let mut languages: Vec<String> = Vec::new();
    let mut invalid = Vec::new();

    for entry in entries {
        match entry.as_str().and_then(langcodes::to_alpha3) {
            Some(code) => {
                if !languages.iter().any(|l| l == code) {
                    languages.push(code.to_string());
                }
            }
            None => invalid.push(match entry {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }

    (languages, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heli_core::envelope::CODE_INVALID_LANGUAGES;
    use serde_json::json;

    fn parse(value: Value) -> Result<ParsedParams> {
        parse_params(value.as_object())
    }

    #[test]
    fn test_no_params() {
        let parsed = parse_params(None).unwrap();
        assert!(!parsed.options.include_orig);
        assert!(parsed.options.language_set.is_none());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_include_orig_must_be_boolean() {
        assert!(parse(json!({"includeOrig": true})).unwrap().options.include_orig);
        assert!(!parse(json!({"includeOrig": null})).unwrap().options.include_orig);

        let err = parse(json!({"includeOrig": "True"})).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(err.to_string().contains("includeOrig"));
    }

    #[test]
    fn test_language_set_must_be_list() {
        let err = parse(json!({"languageSet": "fin"})).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(err.to_string().contains("languageSet"));
    }

    #[test]
    fn test_valid_language_set() {
        let parsed = parse(json!({"languageSet": ["fin", "sv", "eng"]})).unwrap();
        assert_eq!(
            parsed.options.language_set,
            Some(vec!["fin".to_string(), "swe".to_string(), "eng".to_string()])
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_partially_invalid_language_set() {
        let parsed =
            parse(json!({"languageSet": ["fin", "invalid1", "swe", "invalid2", 7]})).unwrap();

        assert_eq!(
            parsed.options.language_set,
            Some(vec!["fin".to_string(), "swe".to_string()])
        );
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].code, CODE_INVALID_LANGUAGES);
        let listed = &parsed.warnings[0].params[0];
        assert!(listed.contains("invalid1"));
        assert!(listed.contains("invalid2"));
        assert!(listed.contains('7'));
    }

    #[test]
    fn test_fully_invalid_language_set() {
        let parsed = parse(json!({"languageSet": ["invalid1", "invalid2"]})).unwrap();
        assert!(parsed.options.language_set.is_none());
        assert_eq!(parsed.warnings[0].params, vec!["invalid1, invalid2"]);
    }

    #[test]
    fn test_empty_language_set_is_unrestricted() {
        let parsed = parse(json!({"languageSet": []})).unwrap();
        assert!(parsed.options.language_set.is_none());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_language_map() {
        let parsed = parse(json!({"languageMap": {"nb": "no", "nn": 3}})).unwrap();
        assert_eq!(parsed.options.language_map.len(), 1);
        assert_eq!(parsed.options.language_map["nb"], "no");

        assert!(parse(json!({"languageMap": ["nb"]})).is_err());
    }

    #[test]
    fn test_best_langs() {
        let parsed = parse(json!({"bestLangs": 3})).unwrap();
        assert_eq!(parsed.options.best_langs, Some(3));

        assert!(parse(json!({"bestLangs": 0})).is_err());
        assert!(parse(json!({"bestLangs": "3"})).is_err());
    }
}
