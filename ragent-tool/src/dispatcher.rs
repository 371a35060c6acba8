//! Name resolution, validation, and execution of model-issued tool calls.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragent_tool::{ToolDispatcher, ToolKind};
//!
//! let dispatcher = ToolDispatcher::builder()
//!     .tool(ToolKind::GetCurrentWeather)
//!     .timeout(Duration::from_secs(10))
//!     .build();
//!
//! let result = dispatcher.dispatch(&call).await;
//! conversation.push(result);
//! ```

use std::sync::Arc;
use std::time::Duration;

use ragent_core::{ToolCall, ToolDeclaration, ToolResult};
use serde_json::Value;
use tracing::{debug, warn};

use crate::calculator::calculate;
use crate::error::ToolError;
use crate::kind::{ToolInvocation, ToolKind};
use crate::weather::{MockWeatherService, WeatherService};

/// Runs the tools an agent has advertised.
///
/// Only registered tools resolve; a name outside the registry is a
/// [`ToolError::Resolution`] even if this crate implements it.
#[derive(Clone)]
pub struct ToolDispatcher {
    tools: Vec<ToolKind>,
    weather: Arc<dyn WeatherService>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.tools)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatcher {
    /// All built-in tools, backed by [`MockWeatherService`], no timeout.
    pub fn new() -> Self {
        Self::builder().tools(ToolKind::ALL).build()
    }

    pub fn builder() -> ToolDispatcherBuilder {
        ToolDispatcherBuilder::default()
    }

    /// Registered tools in registration order.
    pub fn tools(&self) -> &[ToolKind] {
        &self.tools
    }

    /// Declarations to advertise on a completion request.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(|kind| kind.declaration()).collect()
    }

    /// Look up a registered tool by exact name.
    pub fn resolve(&self, name: &str) -> Result<ToolKind, ToolError> {
        ToolKind::from_name(name)
            .filter(|kind| self.tools.contains(kind))
            .ok_or_else(|| ToolError::Resolution { name: name.to_string() })
    }

    /// Resolve, validate, and run one call, returning its structured output.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        let kind = self.resolve(name)?;
        let invocation = kind.parse_arguments(arguments)?;

        match self.timeout {
            Some(after) => tokio::time::timeout(after, self.invoke(invocation))
                .await
                .map_err(|_| ToolError::Timeout { tool: kind.name().to_string(), after })?,
            None => self.invoke(invocation).await,
        }
    }

    async fn invoke(&self, invocation: ToolInvocation) -> Result<Value, ToolError> {
        let tool = invocation.kind().name();
        let output = match invocation {
            ToolInvocation::GetCurrentWeather(args) => {
                let report = self.weather.current_weather(&args.location, args.unit).await?;
                serde_json::to_value(report)
            }
            ToolInvocation::Calculate(args) => serde_json::to_value(calculate(&args)?),
        };
        output.map_err(|e| ToolError::execution(tool, format!("failed to encode result: {e}")))
    }

    /// Run a model-issued call and always produce a tool result.
    ///
    /// Failures become an error payload with `is_error` set, so the
    /// conversation stays well-formed.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        match self.execute(&call.function_name, &call.arguments).await {
            Ok(output) => {
                debug!(tool = %call.function_name, call_id = %call.id, "tool call succeeded");
                ToolResult::success(call, output.to_string())
            }
            Err(e) => {
                warn!(
                    tool = %call.function_name,
                    call_id = %call.id,
                    kind = e.kind(),
                    error = %e,
                    "tool call failed"
                );
                ToolResult::failure(call, e.to_payload().to_string())
            }
        }
    }
}

/// Builder for constructing a [`ToolDispatcher`].
///
/// Starts with no tools and the [`MockWeatherService`].
#[derive(Default)]
pub struct ToolDispatcherBuilder {
    tools: Vec<ToolKind>,
    weather: Option<Arc<dyn WeatherService>>,
    timeout: Option<Duration>,
}

impl ToolDispatcherBuilder {
    /// Register a tool. Registering twice has no effect.
    pub fn tool(mut self, kind: ToolKind) -> Self {
        if !self.tools.contains(&kind) {
            self.tools.push(kind);
        }
        self
    }

    pub fn tools(self, kinds: impl IntoIterator<Item = ToolKind>) -> Self {
        kinds.into_iter().fold(self, Self::tool)
    }

    /// Set the backend for `get_current_weather`.
    pub fn weather_service(mut self, service: Arc<dyn WeatherService>) -> Self {
        self.weather = Some(service);
        self
    }

    /// Fail any single tool run that takes longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ToolDispatcher {
        ToolDispatcher {
            tools: self.tools,
            weather: self.weather.unwrap_or_else(|| Arc::new(MockWeatherService)),
            timeout: self.timeout,
        }
    }
}
