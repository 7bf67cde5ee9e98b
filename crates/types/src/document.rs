//! Opaque JSON document container.
//!
//! Chain, contract, and environment metadata payloads are open JSON
//! documents with no static schema. [`Document`] keeps them opaque in the
//! data model and pushes typed access to the call site via
//! [`Document::decode`].

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use snafu::{ResultExt, Snafu};

/// Errors converting between documents and typed values or JSON text.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DocumentError {
    /// A value could not be encoded as a JSON document.
    #[snafu(display("failed to encode value as document: {source}"))]
    Encode {
        /// Underlying serializer error.
        source: serde_json::Error,
    },

    /// A document could not be decoded into the requested type.
    #[snafu(display("failed to decode document: {source}"))]
    Decode {
        /// Underlying deserializer error.
        source: serde_json::Error,
    },
}

/// An arbitrary JSON document.
///
/// The default document is JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(serde_json::Value);

impl Document {
    /// Encodes any serializable value as a document.
    pub fn new<T: Serialize>(value: &T) -> Result<Self, DocumentError> {
        let value = serde_json::to_value(value).context(EncodeSnafu)?;
        Ok(Self(value))
    }

    /// Wraps a raw JSON value.
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Decodes the document into a concrete type.
    ///
    /// This is the typed access point for open metadata payloads: store the
    /// document opaquely, decode where the schema is actually known.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        serde_json::from_value(self.0.clone()).context(DecodeSnafu)
    }

    /// Parses a document from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, DocumentError> {
        let value = serde_json::from_str(raw).context(DecodeSnafu)?;
        Ok(Self(value))
    }

    /// Serializes the document to JSON text.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(&self.0).context(EncodeSnafu)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the document, returning the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Returns true for the JSON `null` document.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ContractInfo {
        name: String,
        version: String,
    }

    #[test]
    fn document_round_trips_typed_value() {
        let info = ContractInfo { name: "Router".to_owned(), version: "1.2.0".to_owned() };
        let doc = Document::new(&info).unwrap();
        let decoded: ContractInfo = doc.decode().unwrap();
        assert_eq!(decoded, info);
    }

    #[test]
    fn document_round_trips_json_text() {
        let doc = Document::from_json(r#"{"name":"Router","version":"1.2.0"}"#).unwrap();
        let text = doc.to_json().unwrap();
        let reparsed = Document::from_json(&text).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn default_document_is_null() {
        assert!(Document::default().is_null());
    }

    #[test]
    fn decode_mismatched_shape_fails() {
        let doc = Document::from_json(r#"["not","an","object"]"#).unwrap();
        let result: Result<ContractInfo, _> = doc.decode();
        assert!(result.is_err());
    }

    #[test]
    fn from_json_rejects_invalid_text() {
        assert!(Document::from_json("{not json").is_err());
    }
}
