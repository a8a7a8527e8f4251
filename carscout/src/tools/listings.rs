//! `search_auto_dev`: the listings client exposed as a model-callable tool.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};

use crate::listings::ListingsClient;
use crate::state::{SearchRequest, DEFAULT_DISTANCE};
use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::Tool;

/// Tool name the model must use.
pub const SEARCH_LISTINGS_TOOL: &str = "search_auto_dev";

const DESCRIPTION: &str = "Search for live vehicle listings by make, model, year, \
and distance from a US ZIP code. Returns the listings service response as JSON.";

/// Typed arguments of `search_auto_dev`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchListingsArgs {
    pub make: String,
    pub model: String,
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub year: i64,
    pub zip_code: String,
    #[serde(default, deserialize_with = "opt_int_or_numeric_string")]
    pub distance: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Text(String),
}

impl IntLike {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Int(n) => Ok(n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, got {:?}", s))),
        }
    }
}

// Models sometimes quote integers ("2025"); accept both forms.
fn int_or_numeric_string<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    IntLike::deserialize(d)?.into_i64()
}

fn opt_int_or_numeric_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    Option::<IntLike>::deserialize(d)?
        .map(IntLike::into_i64)
        .transpose()
}

impl SearchListingsArgs {
    pub fn from_args(args: Map<String, Value>) -> Result<Self, ToolSourceError> {
        serde_json::from_value(Value::Object(args))
            .map_err(|e| ToolSourceError::InvalidInput(e.to_string()))
    }

    /// Converts to a request, range-checking year and distance.
    pub fn into_request(self) -> Result<SearchRequest, ToolSourceError> {
        let year = i32::try_from(self.year)
            .map_err(|_| ToolSourceError::InvalidInput(format!("year out of range: {}", self.year)))?;
        let distance = match self.distance {
            None => DEFAULT_DISTANCE,
            Some(d) => u32::try_from(d).map_err(|_| {
                ToolSourceError::InvalidInput(format!("distance must be non-negative: {}", d))
            })?,
        };
        Ok(SearchRequest {
            make: self.make,
            model: self.model,
            year,
            zip_code: self.zip_code,
            distance,
        })
    }
}

/// Listings search tool backed by a shared [`ListingsClient`].
pub struct SearchListingsTool {
    client: ListingsClient,
}

impl SearchListingsTool {
    pub fn new(client: ListingsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchListingsTool {
    fn name(&self) -> &str {
        SEARCH_LISTINGS_TOOL
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: SEARCH_LISTINGS_TOOL.to_string(),
            description: Some(DESCRIPTION.to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "make": { "type": "string", "description": "Vehicle make, e.g. Toyota" },
                    "model": { "type": "string", "description": "Vehicle model, e.g. Camry" },
                    "year": { "type": "integer", "description": "Model year" },
                    "zip_code": { "type": "string", "description": "5-digit US ZIP code" },
                    "distance": {
                        "type": "integer",
                        "description": "Search radius in miles",
                        "default": DEFAULT_DISTANCE
                    }
                },
                "required": ["make", "model", "year", "zip_code"]
            }),
        }
    }

    async fn call(&self, args: Map<String, Value>) -> Result<ToolCallContent, ToolSourceError> {
        let request = SearchListingsArgs::from_args(args)?.into_request()?;
        let result = self.client.fetch(&request).await;
        if !result.is_success() {
            tracing::debug!(?result, "listings call returned an error record");
        }
        Ok(ToolCallContent {
            text: result.into_content(),
        })
    }
}
