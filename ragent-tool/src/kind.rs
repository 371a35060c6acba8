//! The closed set of tools an agent can be offered.

use ragent_core::ToolDeclaration;
use serde::de::DeserializeOwned;

use crate::calculator::CalculatorArgs;
use crate::error::ToolError;
use crate::schema::parameters_schema;
use crate::weather::WeatherArgs;

/// Every tool this crate knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetCurrentWeather,
    Calculate,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::GetCurrentWeather, ToolKind::Calculate];

    /// The name advertised to the model.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetCurrentWeather => "get_current_weather",
            ToolKind::Calculate => "calculate",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::GetCurrentWeather => "Get the current weather in a given location",
            ToolKind::Calculate => {
                "Perform basic arithmetic calculations. Supports add, subtract, multiply, divide."
            }
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Name, description, and argument schema for the completion request.
    pub fn declaration(self) -> ToolDeclaration {
        let parameters = match self {
            ToolKind::GetCurrentWeather => parameters_schema::<WeatherArgs>(),
            ToolKind::Calculate => parameters_schema::<CalculatorArgs>(),
        };
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters,
        }
    }

    /// Decode a JSON-encoded argument object into this tool's typed record.
    ///
    /// An empty payload is read as `{}`.
    pub fn parse_arguments(self, arguments: &str) -> Result<ToolInvocation, ToolError> {
        match self {
            ToolKind::GetCurrentWeather => {
                decode(self, arguments).map(ToolInvocation::GetCurrentWeather)
            }
            ToolKind::Calculate => decode(self, arguments).map(ToolInvocation::Calculate),
        }
    }
}

fn decode<T: DeserializeOwned>(kind: ToolKind, arguments: &str) -> Result<T, ToolError> {
    let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(arguments).map_err(|e| ToolError::ArgumentValidation {
        tool: kind.name().to_string(),
        message: e.to_string(),
    })
}

/// A validated call, ready to run.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    GetCurrentWeather(WeatherArgs),
    Calculate(CalculatorArgs),
}

impl ToolInvocation {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolInvocation::GetCurrentWeather(_) => ToolKind::GetCurrentWeather,
            ToolInvocation::Calculate(_) => ToolKind::Calculate,
        }
    }
}
