use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::{debug, instrument};

use crate::config::InventoryConfig;
use crate::utils::user_agent;
use crate::Error;

/// The parts of `meta_data.json` the inventory cares about.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct MetadataDocument {
    /// User supplied instance metadata. Values are strings, some of them JSON encoded.
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

impl MetadataDocument {
    /// Decode a raw response body. Invalid UTF-8 is rejected, not replaced.
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::MalformedResponse(format!("body is not valid JSON: {e}")))?;

        if !value.is_object() {
            return Err(Error::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::MalformedResponse(format!("unexpected document layout: {e}")))
    }

    /// The `meta` mapping, empty when the service didn't provide one.
    pub fn meta(&self) -> Cow<'_, Map<String, Value>> {
        match &self.meta {
            Some(meta) => Cow::Borrowed(meta),
            None => Cow::Owned(Map::new()),
        }
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub struct MetadataClient {
    client: Client,
    url: String,
}

impl MetadataClient {
    pub fn new(config: &InventoryConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(MetadataClient {
            client,
            url: config.metadata_url.clone(),
        })
    }

    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<MetadataDocument, Error> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().await?;
        debug!("metadata: received {} bytes", body.len());

        MetadataDocument::parse(&body)
    }
}
