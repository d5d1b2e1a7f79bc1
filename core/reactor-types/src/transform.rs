use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction for extracting one settings field into a standalone file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRule {
    /// Dotted path into the decoded settings object, e.g. `source.code`.
    pub property_path: String,
    #[serde(rename = "type")]
    pub kind: TransformKind,
    /// Parameter names of the generated function signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl TransformRule {
    pub fn new(property_path: impl Into<String>, kind: TransformKind) -> Self {
        Self {
            property_path: property_path.into(),
            kind,
            parameters: None,
        }
    }

    #[must_use]
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = Some(parameters.into_iter().map(Into::into).collect());
        self
    }

    /// The name of the file this rule extracts into.
    pub fn file_name(&self) -> String {
        format!("settings.{}.js", self.property_path)
    }
}

/// How a transform renders its value.
///
/// Unrecognised kinds deserialize into [`TransformKind::Unknown`] with the
/// original tag preserved, so newer packages do not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransformKind {
    /// Code wrapped in a function signature between marker comments.
    Function,
    /// Raw file contents.
    File,
    /// Raw custom code.
    CustomCode,
    Unknown(String),
}

impl TransformKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Function => "function",
            Self::File => "file",
            Self::CustomCode => "customCode",
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<String> for TransformKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "function" => Self::Function,
            "file" => Self::File,
            "customCode" => Self::CustomCode,
            _ => Self::Unknown(tag),
        }
    }
}

impl From<TransformKind> for String {
    fn from(kind: TransformKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
