//! In-memory airline tool source for demos and tests.
//!
//! Serves a single canned user with one reservation and a small flight table.
//! Useful for driving the change-flight workflow end to end without the real
//! benchmark backend: the CLI and examples talk to this source, tests script
//! conversations against it.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

use super::tools::{
    airline_tool_specs, TOOL_CALCULATE, TOOL_GET_RESERVATION_DETAILS, TOOL_GET_USER_DETAILS,
    TOOL_LIST_ALL_AIRPORTS, TOOL_SEARCH_DIRECT_FLIGHT, TOOL_SEARCH_ONESTOP_FLIGHT,
    TOOL_UPDATE_RESERVATION_FLIGHTS,
};

/// Sample user id served by the fixture.
pub const SAMPLE_USER_ID: &str = "ava_chen_7341";
/// Sample reservation id served by the fixture.
pub const SAMPLE_RESERVATION_ID: &str = "K9ANM2";

/// Fixture tool source over a canned airline dataset.
///
/// `get_user_details` / `get_reservation_details` answer for the sample ids
/// only; `search_direct_flight` filters a static flight table; `calculate`
/// evaluates a single binary arithmetic expression. Unknown ids return
/// error text the way the real tools would.
pub struct SampleAirlineToolSource;

impl SampleAirlineToolSource {
    pub fn new() -> Self {
        Self
    }

    /// The canned user profile.
    pub fn sample_user() -> Value {
        json!({
            "user_id": SAMPLE_USER_ID,
            "name": { "first_name": "Ava", "last_name": "Chen" },
            "email": "ava.chen@example.com",
            "membership": "silver",
            "payment_methods": {
                "credit_card_991": {
                    "id": "credit_card_991",
                    "source": "credit_card",
                    "brand": "visa",
                    "last_four": "4421"
                },
                "gift_card_208": {
                    "id": "gift_card_208",
                    "source": "gift_card",
                    "amount": 120.0
                }
            },
            "saved_passengers": [
                { "first_name": "Noah", "last_name": "Chen", "dob": "1990-04-12" }
            ],
            "reservations": [SAMPLE_RESERVATION_ID]
        })
    }

    /// The canned reservation.
    pub fn sample_reservation() -> Value {
        json!({
            "reservation_id": SAMPLE_RESERVATION_ID,
            "user_id": SAMPLE_USER_ID,
            "origin": "SFO",
            "destination": "JFK",
            "flight_type": "one_way",
            "cabin": "economy",
            "flights": [
                {
                    "flight_number": "HAT170",
                    "origin": "SFO",
                    "destination": "JFK",
                    "date": "2024-05-20",
                    "price": 157.0
                }
            ],
            "passengers": [
                { "first_name": "Ava", "last_name": "Chen", "dob": "1988-09-02" }
            ],
            "payment_history": [
                { "payment_id": "credit_card_991", "amount": 157.0 }
            ],
            "created_at": "2024-05-01T09:00:00",
            "total_baggages": 1,
            "nonfree_baggages": 0,
            "insurance": "no"
        })
    }

    fn flight_table() -> Vec<Value> {
        vec![
            json!({
                "flight_number": "HAT170",
                "origin": "SFO",
                "destination": "JFK",
                "date": "2024-05-20",
                "price": 157.0
            }),
            json!({
                "flight_number": "HAT204",
                "origin": "SFO",
                "destination": "JFK",
                "date": "2024-05-21",
                "price": 142.0
            }),
            json!({
                "flight_number": "HAT088",
                "origin": "JFK",
                "destination": "SFO",
                "date": "2024-05-25",
                "price": 171.0
            }),
        ]
    }

    fn str_arg(arguments: &Value, key: &str) -> Result<String, ToolSourceError> {
        arguments
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolSourceError::InvalidInput(format!("missing argument: {}", key)))
    }

    /// Evaluates `lhs op rhs` for `+ - * /`. The real benchmark exposes a full
    /// calculator; a single binary operation is enough for fare differences.
    fn calculate(expression: &str) -> Result<f64, String> {
        let tokens: Vec<&str> = expression.split_whitespace().collect();
        let [lhs, op, rhs] = tokens.as_slice() else {
            return Err(format!(
                "unsupported expression (use 'a <op> b'): {}",
                expression
            ));
        };
        let a: f64 = lhs.parse().map_err(|_| format!("not a number: {}", lhs))?;
        let b: f64 = rhs.parse().map_err(|_| format!("not a number: {}", rhs))?;
        match *op {
            "+" => Ok(a + b),
            "-" => Ok(a - b),
            "*" => Ok(a * b),
            "/" if b != 0.0 => Ok(a / b),
            "/" => Err("division by zero".to_string()),
            _ => Err(format!("unknown operator: {}", op)),
        }
    }
}

impl Default for SampleAirlineToolSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolSource for SampleAirlineToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        airline_tool_specs().map_err(|e| ToolSourceError::Transport(e.to_string()))
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let text = match name {
            TOOL_GET_USER_DETAILS => {
                let user_id = Self::str_arg(&arguments, "user_id")?;
                if user_id == SAMPLE_USER_ID {
                    Self::sample_user().to_string()
                } else {
                    format!("Error: user not found: {}", user_id)
                }
            }
            TOOL_GET_RESERVATION_DETAILS => {
                let reservation_id = Self::str_arg(&arguments, "reservation_id")?;
                if reservation_id == SAMPLE_RESERVATION_ID {
                    Self::sample_reservation().to_string()
                } else {
                    format!("Error: reservation not found: {}", reservation_id)
                }
            }
            TOOL_SEARCH_DIRECT_FLIGHT => {
                let origin = Self::str_arg(&arguments, "origin")?;
                let destination = Self::str_arg(&arguments, "destination")?;
                let hits: Vec<Value> = Self::flight_table()
                    .into_iter()
                    .filter(|f| f["origin"] == origin.as_str() && f["destination"] == destination.as_str())
                    .collect();
                Value::Array(hits).to_string()
            }
            TOOL_SEARCH_ONESTOP_FLIGHT => {
                // The sample network has no one-stop pairs.
                "[]".to_string()
            }
            TOOL_LIST_ALL_AIRPORTS => json!([
                { "code": "SFO", "city": "San Francisco" },
                { "code": "JFK", "city": "New York" },
                { "code": "ORD", "city": "Chicago" }
            ])
            .to_string(),
            TOOL_CALCULATE => {
                let expression = Self::str_arg(&arguments, "expression")?;
                match Self::calculate(&expression) {
                    Ok(v) => v.to_string(),
                    Err(e) => format!("Error: {}", e),
                }
            }
            TOOL_UPDATE_RESERVATION_FLIGHTS => {
                let reservation_id = Self::str_arg(&arguments, "reservation_id")?;
                if reservation_id == SAMPLE_RESERVATION_ID {
                    json!({ "status": "success", "reservation_id": reservation_id }).to_string()
                } else {
                    format!("Error: reservation not found: {}", reservation_id)
                }
            }
            other => return Err(ToolSourceError::NotFound(other.to_string())),
        };
        Ok(ToolCallContent { text })
    }
}
