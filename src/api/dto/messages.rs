/*
 * Responsibility
 * - Message upload DTOs (POST /upload-message)
 * - content / mood are taken as-is: scalars are stored as their string form,
 *   only absent / null / structured values are refused
 */
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct UploadMessageRequest {
    #[serde(deserialize_with = "scalar_as_string")]
    pub content: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub mood: String,
}

#[derive(Debug, Serialize)]
pub struct UploadMessageResponse {
    pub success: bool,
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(de::Error::custom("expected a value, found null")),
        Value::Array(_) | Value::Object(_) => {
            Err(de::Error::custom("expected a string, number or boolean"))
        }
    }
}
