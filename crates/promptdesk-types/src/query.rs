//! Inbound query types for the `/query` endpoint.

use crate::{SamplingParams, Turn};
use serde::{Deserialize, Serialize};

/// A chat prompt submitted by the frontend.
///
/// Sampling fields are optional on the wire and fall back to
/// [`SamplingParams::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub model: String,
    pub prompt: String,
    pub chat_id: String,
    pub project_id: String,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

impl QueryRequest {
    /// Build the turn recorded once the model has replied.
    pub fn into_turn(self, response: String) -> Turn {
        Turn {
            prompt: self.prompt,
            response,
            model: self.model,
            sampling: self.sampling,
        }
    }
}

/// Successful reply to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_defaults() {
        let req: QueryRequest = serde_json::from_value(json!({
            "model": "m",
            "prompt": "hi",
            "chat_id": "c1",
            "project_id": "default"
        }))
        .unwrap();

        assert_eq!(req.sampling, SamplingParams::default());
    }

    #[test]
    fn test_query_request_accepts_integer_sampling_values() {
        let req: QueryRequest = serde_json::from_value(json!({
            "model": "m",
            "prompt": "hi",
            "chat_id": "c1",
            "project_id": "default",
            "temperature": 1,
            "top_p": 0.9,
            "top_k": 40,
            "frequency_penalty": 0
        }))
        .unwrap();

        assert_eq!(req.sampling.temperature, 1.0);
        assert_eq!(req.sampling.top_p, 0.9);
        assert_eq!(req.sampling.top_k, 40);
        assert_eq!(req.sampling.frequency_penalty, 0.0);
    }

    #[test]
    fn test_query_request_rejects_non_integer_top_k() {
        for top_k in [json!(-1), json!(40.0), json!("40")] {
            let result = serde_json::from_value::<QueryRequest>(json!({
                "model": "m",
                "prompt": "hi",
                "chat_id": "c1",
                "project_id": "default",
                "top_k": top_k
            }));
            assert!(result.is_err(), "top_k {top_k} should be rejected");
        }
    }

    #[test]
    fn test_into_turn_keeps_parameters() {
        let req = QueryRequest {
            model: "m".to_string(),
            prompt: "hi".to_string(),
            chat_id: "c1".to_string(),
            project_id: "default".to_string(),
            sampling: SamplingParams {
                temperature: 0.2,
                ..SamplingParams::default()
            },
        };

        let turn = req.into_turn("hello".to_string());
        assert_eq!(turn.prompt, "hi");
        assert_eq!(turn.response, "hello");
        assert_eq!(turn.sampling.temperature, 0.2);
    }
}
