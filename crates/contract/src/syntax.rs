//! Parses the contract document's "stringly" `mapping_type` syntax
//! (`add_score(id)`, `enum(state_code)`, `char_to_bit`, ...) into
//! [`model::contract::MappingStep`]. A single mapping may carry one token or
//! an ordered array of tokens; both forms are accepted here.

use crate::error::{ContractError, Result};
use model::contract::MappingStep;
use serde_json::Value as Json;

pub fn parse_chain(raw: &Json) -> Result<Vec<MappingStep>> {
    match raw {
        Json::Null => Ok(Vec::new()),
        Json::String(s) => Ok(vec![parse_step(s)?]),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| malformed(&item.to_string()))
                    .and_then(parse_step)
            })
            .collect(),
        other => Err(malformed(&other.to_string())),
    }
}

fn malformed(raw: &str) -> ContractError {
    ContractError::Parse(serde::de::Error::custom(format!(
        "mapping_type entry is not a string or array of strings: {raw}"
    )))
}

/// Splits `name(arg1, arg2)` into its callee and raw argument list; a bare
/// `name` has no parens and no arguments.
fn split_call(token: &str) -> (&str, Vec<&str>) {
    let token = token.trim();
    match token.find('(') {
        Some(open) if token.ends_with(')') => {
            let name = &token[..open];
            let inner = &token[open + 1..token.len() - 1];
            let args = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner.split(',').map(str::trim).collect()
            };
            (name, args)
        }
        _ => (token, Vec::new()),
    }
}

pub fn parse_step(token: &str) -> Result<MappingStep> {
    let (name, args) = split_call(token);
    let name = name.trim().to_ascii_lowercase();

    let arity_error = || ContractError::Parse(serde::de::Error::custom(format!(
        "mapping step '{name}' called with wrong argument count: {token}"
    )));

    let step = match name.as_str() {
        "enum" => MappingStep::Enum {
            enum_name: args.first().ok_or_else(arity_error)?.to_string(),
        },
        "char_to_bit" => MappingStep::CharToBit,
        "numbers_only" => MappingStep::NumbersOnly,
        "extract_numeric" => MappingStep::ExtractNumeric,
        "calculated_field" => MappingStep::CalculatedField,
        "last_valid_primary_contact" => MappingStep::LastValidPrimaryContact,
        "last_valid_secondary_contact" => MappingStep::LastValidSecondaryContact,
        "curr_address_only" => MappingStep::CurrAddressOnly,
        "default_get_utc_date_if_null" => MappingStep::DefaultGetUtcDateIfNull,
        "add_score" => MappingStep::AddScore {
            id: args.first().ok_or_else(arity_error)?.to_string(),
        },
        "add_indicator" => MappingStep::AddIndicator {
            name: args.first().ok_or_else(arity_error)?.to_string(),
        },
        "add_history" => MappingStep::AddHistory,
        "add_report_lookup" => MappingStep::AddReportLookup {
            src: args.first().map(|s| s.to_string()),
        },
        "policy_exceptions" => MappingStep::PolicyExceptions {
            enum_name: args.first().map(|s| s.to_string()),
        },
        "warranty_field" => MappingStep::WarrantyField {
            enum_name: args.first().ok_or_else(arity_error)?.to_string(),
        },
        "add_collateral" => {
            let slot = args
                .first()
                .ok_or_else(arity_error)?
                .parse::<u8>()
                .map_err(|_| arity_error())?;
            MappingStep::AddCollateral { slot }
        }
        "identity_insert" => MappingStep::IdentityInsert,
        "extract_date" => MappingStep::ExtractDate,
        other => {
            return Err(ContractError::Parse(serde::de::Error::custom(format!(
                "unknown mapping step '{other}'"
            ))));
        }
    };
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_token() {
        assert_eq!(parse_step("char_to_bit").unwrap(), MappingStep::CharToBit);
    }

    #[test]
    fn parses_call_with_one_arg() {
        assert_eq!(
            parse_step("add_score(composite)").unwrap(),
            MappingStep::AddScore {
                id: "composite".to_string()
            }
        );
    }

    #[test]
    fn parses_call_with_optional_arg_absent() {
        assert_eq!(
            parse_step("add_report_lookup").unwrap(),
            MappingStep::AddReportLookup { src: None }
        );
    }

    #[test]
    fn parses_chain_array() {
        let raw: Json = serde_json::from_str(r#"["calculated_field", "enum(risk_tier)"]"#).unwrap();
        let chain = parse_chain(&raw).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0], MappingStep::CalculatedField);
        assert_eq!(
            chain[1],
            MappingStep::Enum {
                enum_name: "risk_tier".to_string()
            }
        );
    }

    #[test]
    fn unknown_step_is_an_error() {
        assert!(parse_step("frobnicate").is_err());
    }
}
