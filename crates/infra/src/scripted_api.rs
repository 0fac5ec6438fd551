use std::collections::HashMap;

use orderflow_core::OrderId;
use orderflow_orders::{ApiCallError, ApiClient, ApiResponse};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(ApiResponse),
    Fail(String),
}

/// API client answering from a per-order script, for demos and tests.
///
/// Orders without a scripted entry get the fallback response.
#[derive(Debug, Clone)]
pub struct ScriptedApiClient {
    script: HashMap<OrderId, Scripted>,
    fallback: ApiResponse,
}

impl ScriptedApiClient {
    pub fn new(fallback: ApiResponse) -> Self {
        Self {
            script: HashMap::new(),
            fallback,
        }
    }

    pub fn respond(mut self, order_id: OrderId, response: ApiResponse) -> Self {
        self.script.insert(order_id, Scripted::Respond(response));
        self
    }

    pub fn fail(mut self, order_id: OrderId, message: impl Into<String>) -> Self {
        self.script.insert(order_id, Scripted::Fail(message.into()));
        self
    }
}

impl Default for ScriptedApiClient {
    fn default() -> Self {
        Self::new(ApiResponse::new("success", 0.0))
    }
}

impl ApiClient for ScriptedApiClient {
    fn call(&self, order_id: OrderId) -> Result<ApiResponse, ApiCallError> {
        match self.script.get(&order_id) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Fail(message)) => Err(ApiCallError(message.clone())),
            None => Ok(self.fallback.clone()),
        }
    }
}
