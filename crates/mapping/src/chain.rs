use expr::{functions::string, EvalContext, Evaluator};
use model::{
    contract::{Contract, MappingStep},
    core::{data_type::DataType, value::Value},
};
use std::str::FromStr;
use tracing::warn;

/// Runs one Field Mapping's `mapping_type` chain against a raw extracted
/// value. Each step consumes the previous step's output; the chain
/// terminates as soon as a step yields "no value," except when that step
/// was `calculated_field` and the next step is `enum` — there, the
/// pre-chain original is restored and handed to the enum lookup (the
/// "conditional enum fallback" idiom).
pub fn apply_chain(
    raw: Option<String>,
    chain: &[MappingStep],
    expression: Option<&str>,
    ctx: &EvalContext,
    contract: &Contract,
) -> Option<Value> {
    let original = raw.map(Value::String);
    if chain.is_empty() {
        return original;
    }

    let mut current = original.clone();
    let mut i = 0;
    while i < chain.len() {
        let step = &chain[i];
        current = apply_step(step, current, expression, ctx, contract);

        if current.is_none() {
            let restore_for_enum = matches!(step, MappingStep::CalculatedField)
                && matches!(chain.get(i + 1), Some(MappingStep::Enum { .. }));
            if restore_for_enum {
                current = original.clone();
            } else {
                break;
            }
        }
        i += 1;
    }
    current
}

fn apply_step(
    step: &MappingStep,
    current: Option<Value>,
    expression: Option<&str>,
    ctx: &EvalContext,
    contract: &Contract,
) -> Option<Value> {
    match step {
        MappingStep::Enum { enum_name } => {
            let key = current?.as_string()?;
            contract
                .enum_mapping(enum_name)
                .and_then(|mapping| mapping.lookup(&key))
                .map(Value::Int)
        }
        MappingStep::CharToBit => {
            let raw = current?.as_string()?;
            Some(Value::Boolean(string::char_to_bit(&raw)))
        }
        MappingStep::NumbersOnly | MappingStep::ExtractNumeric => {
            let raw = current?.as_string()?;
            string::extract_digits(&raw).map(Value::String)
        }
        MappingStep::CalculatedField => {
            let source = expression?;
            expr::evaluate(source, ctx).ok().filter(|v| !matches!(v, Value::Null))
        }
        MappingStep::ExtractDate => {
            let raw = current?.as_string()?;
            chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .map(Value::Date)
        }
        MappingStep::DefaultGetUtcDateIfNull => {
            Some(current.unwrap_or_else(|| Value::Timestamp(chrono::Utc::now())))
        }
        // These steps describe row-selection metadata (which contact, which
        // address) resolved before the value chain runs, not a value
        // transform — they pass the current value through unchanged.
        MappingStep::LastValidPrimaryContact
        | MappingStep::LastValidSecondaryContact
        | MappingStep::CurrAddressOnly
        | MappingStep::IdentityInsert => current,
        // Row-creating steps are handled by the auxiliary-row builder, not
        // the scalar value chain; reaching one here just passes through.
        MappingStep::AddScore { .. }
        | MappingStep::AddIndicator { .. }
        | MappingStep::AddHistory
        | MappingStep::AddReportLookup { .. }
        | MappingStep::PolicyExceptions { .. }
        | MappingStep::WarrantyField { .. }
        | MappingStep::AddCollateral { .. } => current,
    }
}

/// Converts the chain's output to the target column's declared data type.
/// Integer columns automatically digit-extract raw non-numeric input.
pub fn coerce(value: Value, data_type: &DataType) -> Value {
    match data_type {
        DataType::SmallInt | DataType::Int | DataType::BigInt => match value {
            Value::String(raw) => match raw.trim().parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => string::extract_digits(&raw)
                    .and_then(|digits| digits.parse::<i64>().ok())
                    .map(Value::Int)
                    .unwrap_or(Value::Null),
            },
            other => other,
        },
        DataType::Decimal => match value {
            Value::String(raw) => bigdecimal::BigDecimal::from_str(raw.trim())
                .map(Value::Decimal)
                .unwrap_or(Value::Null),
            other => other,
        },
        DataType::Float => match value {
            Value::String(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or(Value::Null),
            other => other,
        },
        DataType::Boolean | DataType::Bit => match value {
            Value::String(raw) => Value::Boolean(string::char_to_bit(&raw)),
            other => other,
        },
        DataType::VarChar | DataType::Text => match value {
            Value::String(s) => Value::String(s),
            Value::Null => Value::Null,
            other => Value::String(other.as_string().unwrap_or_default()),
        },
        DataType::Date | DataType::Timestamp | DataType::Json => value,
    }
}

/// Truncates an over-length string column, logging at warning as the
/// mapping engine's `data_length` enforcement requires.
pub fn truncate(value: Value, max_length: Option<usize>, table: &str, column: &str) -> Value {
    let Value::String(s) = &value else {
        return value;
    };
    let Some(max) = max_length else {
        return value;
    };
    if s.chars().count() <= max {
        return value;
    }
    warn!(table, column, max_length = max, "value truncated");
    Value::String(s.chars().take(max).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::contract::EnumMapping;
    use std::collections::HashMap;

    fn contract_with_enum() -> Contract {
        let mut enum_mappings = HashMap::new();
        enum_mappings.insert(
            "risk_tier".to_string(),
            EnumMapping::new(HashMap::from([("low".to_string(), 1i64)]), Some(0)),
        );
        Contract {
            target_schema: "ins".to_string(),
            table_insertion_order: Vec::new(),
            tables: HashMap::new(),
            enum_mappings,
            element_filtering: HashMap::new(),
            key_identifiers: model::contract::KeyIdentifiers {
                app_id_xpath: "/App".to_string(),
                app_id_attribute: "id".to_string(),
            },
        }
    }

    #[test]
    fn conditional_enum_fallback_restores_original_on_calculated_field_miss() {
        let contract = contract_with_enum();
        let ctx = EvalContext::new();
        let chain = vec![MappingStep::CalculatedField, MappingStep::Enum {
            enum_name: "risk_tier".to_string(),
        }];
        let result = apply_chain(
            Some("low".to_string()),
            &chain,
            Some("missing_field"),
            &ctx,
            &contract,
        );
        assert_eq!(result, Some(Value::Int(1)));
    }

    #[test]
    fn chain_terminates_early_without_fallback() {
        let contract = contract_with_enum();
        let ctx = EvalContext::new();
        let chain = vec![MappingStep::NumbersOnly, MappingStep::Enum {
            enum_name: "risk_tier".to_string(),
        }];
        let result = apply_chain(None, &chain, None, &ctx, &contract);
        assert_eq!(result, None);
    }

    #[test]
    fn integer_coercion_extracts_digits() {
        assert_eq!(
            coerce(Value::String("ABC-123".to_string()), &DataType::Int),
            Value::Int(123)
        );
    }

    #[test]
    fn truncation_respects_max_length() {
        let value = Value::String("abcdef".to_string());
        assert_eq!(
            truncate(value, Some(3), "t", "c"),
            Value::String("abc".to_string())
        );
    }
}
