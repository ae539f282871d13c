//! Wire shapes of the index and detail endpoints, and the validation that
//! turns raw JSON bodies into domain values.

use serde_json::{Map, Value};

use crate::{
    domain::{CollectionKind, Identifier, Record},
    error::ParseError,
};

/// Outcome of validating an index response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPayload {
    Valid(Vec<Identifier>),
    /// The body was unusable; callers fall back to an empty index.
    Defaulted(ParseError),
}

impl IndexPayload {
    pub fn into_identifiers(self) -> Vec<Identifier> {
        match self {
            IndexPayload::Valid(ids) => ids,
            IndexPayload::Defaulted(_) => Vec::new(),
        }
    }
}

pub fn validate_index(body: &Value, ids_field: &str) -> IndexPayload {
    let Some(object) = body.as_object() else {
        return IndexPayload::Defaulted(ParseError::NotAnObject);
    };
    let Some(raw) = object.get(ids_field) else {
        return IndexPayload::Defaulted(ParseError::missing(ids_field));
    };
    let Some(items) = raw.as_array() else {
        return IndexPayload::Defaulted(ParseError::wrong_type(ids_field, "an array"));
    };

    let mut ids = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        match identifier_from_value(item) {
            Some(id) => ids.push(id),
            None => {
                return IndexPayload::Defaulted(ParseError::wrong_type(
                    format!("{ids_field}[{position}]"),
                    "an integer or string identifier",
                ))
            }
        }
    }
    IndexPayload::Valid(ids)
}

fn identifier_from_value(value: &Value) -> Option<Identifier> {
    match value {
        Value::Number(n) => n.as_i64().map(Identifier::Int),
        Value::String(s) => Some(Identifier::Str(s.clone())),
        _ => None,
    }
}

/// Where the record lives inside a detail response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailShape {
    pub wrapper_field: String,
    pub id_field: String,
}

impl DetailShape {
    pub fn for_kind(kind: CollectionKind) -> Self {
        Self {
            wrapper_field: kind.wrapper_field().to_string(),
            id_field: kind.id_field().to_string(),
        }
    }
}

/// Projects a detail response onto `{id, name, description}`; every other
/// field is dropped. A missing id falls back to `requested`.
pub fn project_record(
    body: &Value,
    shape: &DetailShape,
    requested: &Identifier,
) -> Result<Record, ParseError> {
    let object = body.as_object().ok_or(ParseError::NotAnObject)?;
    let wrapper = object
        .get(&shape.wrapper_field)
        .ok_or_else(|| ParseError::missing(&shape.wrapper_field))?
        .as_object()
        .ok_or_else(|| ParseError::wrong_type(&shape.wrapper_field, "an object"))?;

    let id = match wrapper.get(&shape.id_field) {
        None | Some(Value::Null) => requested.clone(),
        Some(value) => identifier_from_value(value).ok_or_else(|| {
            ParseError::wrong_type(
                format!("{}.{}", shape.wrapper_field, shape.id_field),
                "an integer or string identifier",
            )
        })?,
    };

    Ok(Record {
        id,
        name: text_field(wrapper, &shape.wrapper_field, "name")?,
        description: text_field(wrapper, &shape.wrapper_field, "description")?,
    })
}

fn text_field(
    wrapper: &Map<String, Value>,
    wrapper_field: &str,
    key: &str,
) -> Result<String, ParseError> {
    match wrapper.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::wrong_type(
            format!("{wrapper_field}.{key}"),
            "a string",
        )),
    }
}
