//! The `calculate` tool.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ToolError;

/// Arithmetic operations supported by `calculate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Arguments for `calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalculatorArgs {
    /// The arithmetic operation to perform
    pub operation: Operation,
    /// First operand
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub a: f64,
    /// Second operand
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub b: f64,
}

/// Models sometimes quote numbers; accept `"4"` as well as `4`.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Output of `calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
    pub result: f64,
}

/// Run `calculate`.
///
/// # Errors
///
/// Division by zero is a [`ToolError::Execution`].
pub fn calculate(args: &CalculatorArgs) -> Result<Calculation, ToolError> {
    let result = match args.operation {
        Operation::Add => args.a + args.b,
        Operation::Subtract => args.a - args.b,
        Operation::Multiply => args.a * args.b,
        Operation::Divide => {
            if args.b == 0.0 {
                return Err(ToolError::execution("calculate", "division by zero"));
            }
            args.a / args.b
        }
    };
    Ok(Calculation { operation: args.operation, a: args.a, b: args.b, result })
}
