//! # ragent-tool
//!
//! Tool dispatch for ragent agents.
//!
//! Tools form a closed set ([`ToolKind`]). A model-issued call is resolved by
//! exact name against the registered tools, its JSON arguments are decoded
//! into a typed record, and the result (or the failure) is serialized back
//! into a [`ToolResult`](ragent_core::ToolResult).
//!
//! ## Built-in tools
//!
//! | Name | Arguments |
//! |------|-----------|
//! | `get_current_weather` | `location`, optional `unit` (`celsius` or `fahrenheit`) |
//! | `calculate` | `operation` (`add`, `subtract`, `multiply`, `divide`), `a`, `b` |

pub mod calculator;
pub mod dispatcher;
pub mod error;
pub mod kind;
pub mod schema;
pub mod weather;

pub use calculator::{Calculation, CalculatorArgs, Operation, calculate};
pub use dispatcher::{ToolDispatcher, ToolDispatcherBuilder};
pub use error::ToolError;
pub use kind::{ToolInvocation, ToolKind};
pub use schema::{parameters_schema, sanitize_schema};
pub use weather::{MockWeatherService, TemperatureUnit, WeatherArgs, WeatherReport, WeatherService};
