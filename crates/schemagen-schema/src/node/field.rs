use crate::prelude::*;

///
/// Field
///
/// One replicated property inside a field group. `ty` is the schema type
/// the reflector mapped the property to (`int32`, `string`, `EntityId`...).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Field {
    pub path: String,
    pub name: String,
    pub ty: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
}

impl Field {
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            ty: ty.into(),
            repeated: false,
        }
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Sanitized schema identifier for this field.
    #[must_use]
    pub fn schema_name(&self) -> String {
        sanitize(&self.name, NameScope::Field)
    }
}
