use crate::model::connection::ConnectionId;
use serde_json::{Map, Value};

const ID_FIELDS: [&str; 3] = ["uid", "userId", "id"];
const NAME_FIELDS: [&str; 3] = ["name", "displayName", "userName"];

/// What a peer claims to be when it announces itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A bare string, used as both user id and display name.
    Raw(String),
    Structured {
        id: Option<String>,
        name: Option<String>,
    },
}

/// The identity after resolution: the user id is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: String,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn structured(id: Option<&str>, name: Option<&str>) -> Self {
        Self::Structured {
            id: id.map(str::to_owned),
            name: name.map(str::to_owned),
        }
    }

    /// Interprets an untyped announcement payload.
    ///
    /// Falsy JSON values (`null`, `false`, `0`, `""`) carry no identity and
    /// yield `None`. Objects and arrays are read field by field; anything
    /// else is taken as its text form.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) => Some(Self::Raw(s.clone())),
            Value::Number(n) => Some(Self::Raw(n.to_string())),
            Value::Bool(true) => Some(Self::Raw("true".to_owned())),
            Value::Object(fields) => Some(Self::Structured {
                id: first_text(fields, &ID_FIELDS),
                name: first_text(fields, &NAME_FIELDS),
            }),
            Value::Array(_) => Some(Self::Structured {
                id: None,
                name: None,
            }),
        }
    }

    /// An empty raw string announces nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Raw(s) if s.is_empty())
    }

    /// Resolves the user id as explicit id, then name, then the connection
    /// handle itself.
    pub fn resolve(&self, connection_id: &ConnectionId) -> ResolvedIdentity {
        match self {
            Self::Raw(raw) if raw.is_empty() => ResolvedIdentity {
                user_id: connection_id.to_string(),
                display_name: None,
            },
            Self::Raw(raw) => ResolvedIdentity {
                user_id: raw.clone(),
                display_name: Some(raw.clone()),
            },
            Self::Structured { id, name } => {
                let name = non_empty(name.as_deref());
                let user_id = non_empty(id.as_deref())
                    .or_else(|| name.clone())
                    .unwrap_or_else(|| connection_id.to_string());

                ResolvedIdentity {
                    user_id,
                    display_name: name,
                }
            }
        }
    }
}

impl From<&str> for Identity {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_owned())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| scalar_text(fields.get(*key)?))
}

/// Text form of a non-empty string, a number or a bool.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
