use pooled_sql::SqlValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ParamError {
    #[error("`{input}` is not a valid {kind}")]
    Malformed { kind: &'static str, input: String },
}

/// Parse `int:5`, `float:1.5`, `bool:true`, `null` or `text:abc`; anything else is text.
pub(crate) fn parse_param(raw: &str) -> Result<SqlValue, ParamError> {
    if raw == "null" {
        return Ok(SqlValue::Null);
    }
    let Some((tag, rest)) = raw.split_once(':') else {
        return Ok(SqlValue::Text(raw.to_owned()));
    };
    let malformed = |kind| ParamError::Malformed {
        kind,
        input: rest.to_owned(),
    };
    match tag {
        "int" => rest.trim().parse().map(SqlValue::Int).map_err(|_| malformed("integer")),
        "float" => rest.trim().parse().map(SqlValue::Float).map_err(|_| malformed("float")),
        "bool" => match rest.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(SqlValue::Bool(true)),
            "false" | "0" => Ok(SqlValue::Bool(false)),
            _ => Err(malformed("boolean")),
        },
        "text" => Ok(SqlValue::Text(rest.to_owned())),
        _ => Ok(SqlValue::Text(raw.to_owned())),
    }
}

/// Split one import line into its parameter set.
pub(crate) fn parse_line(line: &str, delimiter: char) -> Result<Vec<SqlValue>, ParamError> {
    line.split(delimiter).map(parse_param).collect()
}
