//! The change-flight workflow: five dialogue nodes gated by four edges.
//!
//! The conversation moves identify user → locate reservation → select
//! flights → collect payment → apply change. Each node accumulates its own
//! typed state; each edge fires once the state it gates on is populated and
//! hands the accumulated context to the next node as input.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::prompts::SystemTemplate;
use crate::schema::{CompiledFlow, EdgeSchema, GraphSchema, ModelBinding, NodeSchema, SchemaError};

use super::tools::{
    TOOL_CALCULATE, TOOL_GET_RESERVATION_DETAILS, TOOL_GET_USER_DETAILS, TOOL_LIST_ALL_AIRPORTS,
    TOOL_SEARCH_DIRECT_FLIGHT, TOOL_SEARCH_ONESTOP_FLIGHT, TOOL_UPDATE_RESERVATION_FLIGHTS,
};
use super::types::{FlightInfo, ReservationDetails, UserDetails};

/// Node id: identify the customer.
pub const NODE_IDENTIFY_USER: &str = "identify_user";
/// Node id: find the reservation being changed.
pub const NODE_LOCATE_RESERVATION: &str = "locate_reservation";
/// Node id: pick the new flight segments.
pub const NODE_SELECT_FLIGHTS: &str = "select_flights";
/// Node id: choose how to pay the fare difference.
pub const NODE_COLLECT_PAYMENT: &str = "collect_payment";
/// Node id: apply the change to the reservation.
pub const NODE_APPLY_CHANGE: &str = "apply_change";

/// Shared opener for every node prompt in this workflow.
pub const CHANGE_FLIGHT_PREAMBLE: &str =
    "You are helping the customer to change one or more flights on an existing reservation. ";

/// Airline-wide agent background shared by all nodes.
pub const AIRLINE_BACKGROUND: &str = "\
You are a customer service agent for an airline. Help the customer with \
exactly the task described below, using only the tools available in this \
step. Do not invent user details, reservations, flights, or prices; every \
value you rely on must come from the customer or a tool result. Confirm \
with the customer before any action that modifies a reservation.";

// ---------------------------------------------------------------------------
// Per-node state and input models.

/// State while identifying the customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifyUserState {
    pub user_details: Option<UserDetails>,
}

/// Context handed to the reservation-lookup node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_details: UserDetails,
}

/// State while locating the reservation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocateReservationState {
    pub reservation_details: Option<ReservationDetails>,
}

/// Context handed to the flight-selection node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationContext {
    pub user_details: UserDetails,
    pub reservation_details: ReservationDetails,
}

/// State while selecting the new flights.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectFlightsState {
    /// Every segment of the reservation after the change, including segments
    /// the customer keeps unchanged.
    pub flight_infos: Vec<FlightInfo>,
}

/// Context handed to the payment node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSelectionContext {
    pub user_details: UserDetails,
    pub reservation_details: ReservationDetails,
    pub flight_infos: Vec<FlightInfo>,
}

/// State while collecting the payment method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectPaymentState {
    pub payment_id: Option<String>,
}

/// Context handed to the final node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentContext {
    pub user_details: UserDetails,
    pub reservation_details: ReservationDetails,
    pub flight_infos: Vec<FlightInfo>,
    pub payment_id: String,
}

/// State while applying the change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyChangeState {
    pub is_change_successful: bool,
}

// ---------------------------------------------------------------------------
// Graph declaration.

fn identify_user_node(template: &SystemTemplate) -> NodeSchema {
    NodeSchema::new(
        NODE_IDENTIFY_USER,
        format!(
            "{}Right now, you need to get their user details.",
            CHANGE_FLIGHT_PREAMBLE
        ),
        template.clone(),
        ModelBinding::state::<IdentifyUserState>(json!({
            "type": "object",
            "properties": {
                "user_details": {
                    "type": ["object", "null"],
                    "description": "The complete user profile exactly as returned by get_user_details."
                }
            },
            "additionalProperties": false
        })),
    )
    .with_tools([TOOL_GET_USER_DETAILS, TOOL_CALCULATE])
}

fn locate_reservation_node(template: &SystemTemplate) -> NodeSchema {
    NodeSchema::new(
        NODE_LOCATE_RESERVATION,
        format!(
            "{}Right now, you need to get the reservation details by asking for the \
             reservation id. If they don't know the id, look up each reservation in \
             their user details and find the one that best matches their description.",
            CHANGE_FLIGHT_PREAMBLE
        ),
        template.clone(),
        ModelBinding::state::<LocateReservationState>(json!({
            "type": "object",
            "properties": {
                "reservation_details": {
                    "type": ["object", "null"],
                    "description": "The reservation exactly as returned by get_reservation_details."
                }
            },
            "additionalProperties": false
        })),
    )
    .with_input::<UserContext>()
    .with_tools([
        TOOL_GET_RESERVATION_DETAILS,
        TOOL_CALCULATE,
        TOOL_LIST_ALL_AIRPORTS,
    ])
}

fn select_flights_node(template: &SystemTemplate) -> NodeSchema {
    NodeSchema::new(
        NODE_SELECT_FLIGHTS,
        format!(
            "{}Right now, you need to help find new flights for them. The customer can \
             change anything from a single flight segment to all the flights. \
             Remember, basic economy flights cannot be modified. Other reservations \
             can be modified without changing the origin, destination, and trip type.",
            CHANGE_FLIGHT_PREAMBLE
        ),
        template.clone(),
        ModelBinding::state::<SelectFlightsState>(json!({
            "type": "object",
            "properties": {
                "flight_infos": {
                    "type": "array",
                    "description": "Details about each flight segment in the ENTIRE new \
                                    reservation. Even if a segment is not changed, it must \
                                    still be included.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "flight_number": { "type": "string" },
                            "origin": { "type": "string" },
                            "destination": { "type": "string" },
                            "date": { "type": "string" },
                            "price": { "type": ["number", "null"] }
                        },
                        "required": ["flight_number", "origin", "destination", "date"]
                    }
                }
            },
            "additionalProperties": false
        })),
    )
    .with_input::<ReservationContext>()
    .with_tools([
        TOOL_SEARCH_DIRECT_FLIGHT,
        TOOL_SEARCH_ONESTOP_FLIGHT,
        TOOL_LIST_ALL_AIRPORTS,
        TOOL_CALCULATE,
    ])
}

fn collect_payment_node(template: &SystemTemplate) -> NodeSchema {
    NodeSchema::new(
        NODE_COLLECT_PAYMENT,
        format!(
            "{}Right now, you need to get the payment information. They can only use a \
             gift card or a credit card. IMPORTANT: all payment methods must already \
             be in the user profile for safety reasons.",
            CHANGE_FLIGHT_PREAMBLE
        ),
        template.clone(),
        ModelBinding::state::<CollectPaymentState>(json!({
            "type": "object",
            "properties": {
                "payment_id": {
                    "type": ["string", "null"],
                    "description": "Id of a payment method saved on the user profile."
                }
            },
            "additionalProperties": false
        })),
    )
    .with_input::<FlightSelectionContext>()
    .with_tools([TOOL_CALCULATE])
}

fn apply_change_node(template: &SystemTemplate) -> NodeSchema {
    NodeSchema::new(
        NODE_APPLY_CHANGE,
        format!(
            "{}Right now, you have all the data necessary to apply the flight change.",
            CHANGE_FLIGHT_PREAMBLE
        ),
        template.clone(),
        ModelBinding::state::<ApplyChangeState>(json!({
            "type": "object",
            "properties": {
                "is_change_successful": {
                    "type": "boolean",
                    "description": "True once update_reservation_flights confirmed the change."
                }
            },
            "additionalProperties": false
        })),
    )
    .with_input::<PaymentContext>()
    .with_tools([TOOL_UPDATE_RESERVATION_FLIGHTS, TOOL_CALCULATE])
}

/// Declares the change-flight workflow graph.
///
/// Five nodes, four edges; each edge fires when the field its source node
/// accumulates becomes populated, and carries all context gathered so far to
/// the next node.
pub fn change_flight_graph() -> GraphSchema {
    let template = SystemTemplate::new(AIRLINE_BACKGROUND);

    let mut graph = GraphSchema::new("change_flight");
    graph
        .add_node(identify_user_node(&template))
        .add_node(locate_reservation_node(&template))
        .add_node(select_flights_node(&template))
        .add_node(collect_payment_node(&template))
        .add_node(apply_change_node(&template))
        .set_start(NODE_IDENTIFY_USER);

    graph.add_edge(EdgeSchema::new(
        NODE_IDENTIFY_USER,
        NODE_LOCATE_RESERVATION,
        |state: &IdentifyUserState| state.user_details.is_some(),
        |state: &IdentifyUserState, _input: &()| {
            Some(UserContext {
                user_details: state.user_details.clone()?,
            })
        },
    ));

    graph.add_edge(EdgeSchema::new(
        NODE_LOCATE_RESERVATION,
        NODE_SELECT_FLIGHTS,
        |state: &LocateReservationState| state.reservation_details.is_some(),
        |state: &LocateReservationState, input: &UserContext| {
            Some(ReservationContext {
                user_details: input.user_details.clone(),
                reservation_details: state.reservation_details.clone()?,
            })
        },
    ));

    graph.add_edge(EdgeSchema::new(
        NODE_SELECT_FLIGHTS,
        NODE_COLLECT_PAYMENT,
        |state: &SelectFlightsState| !state.flight_infos.is_empty(),
        |state: &SelectFlightsState, input: &ReservationContext| {
            Some(FlightSelectionContext {
                user_details: input.user_details.clone(),
                reservation_details: input.reservation_details.clone(),
                flight_infos: state.flight_infos.clone(),
            })
        },
    ));

    graph.add_edge(EdgeSchema::new(
        NODE_COLLECT_PAYMENT,
        NODE_APPLY_CHANGE,
        |state: &CollectPaymentState| state.payment_id.is_some(),
        |state: &CollectPaymentState, input: &FlightSelectionContext| {
            Some(PaymentContext {
                user_details: input.user_details.clone(),
                reservation_details: input.reservation_details.clone(),
                flight_infos: input.flight_infos.clone(),
                payment_id: state.payment_id.clone()?,
            })
        },
    ));

    graph
}

/// Compiles the change-flight workflow.
pub fn change_flight_flow() -> Result<CompiledFlow, SchemaError> {
    change_flight_graph().compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: the declared graph compiles and has the expected shape.
    #[test]
    fn change_flight_flow_compiles_with_expected_shape() {
        let flow = change_flight_flow().expect("workflow must compile");
        assert_eq!(flow.start_id(), NODE_IDENTIFY_USER);
        assert_eq!(flow.node_count(), 5);

        for (from, to) in [
            (NODE_IDENTIFY_USER, NODE_LOCATE_RESERVATION),
            (NODE_LOCATE_RESERVATION, NODE_SELECT_FLIGHTS),
            (NODE_SELECT_FLIGHTS, NODE_COLLECT_PAYMENT),
            (NODE_COLLECT_PAYMENT, NODE_APPLY_CHANGE),
        ] {
            let edges = flow.outgoing(from);
            assert_eq!(edges.len(), 1, "{} should have one outgoing edge", from);
            assert_eq!(edges[0].to(), to);
        }
        assert!(flow.is_terminal(NODE_APPLY_CHANGE));
    }

    /// **Scenario**: each node permits exactly the tools of the original registry subset.
    #[test]
    fn node_tool_permissions_match_workflow() {
        let flow = change_flight_flow().unwrap();
        let tools_of = |id: &str| {
            flow.node(id)
                .map(|n| n.tool_names().to_vec())
                .unwrap_or_default()
        };
        assert_eq!(
            tools_of(NODE_IDENTIFY_USER),
            vec![TOOL_GET_USER_DETAILS, TOOL_CALCULATE]
        );
        assert_eq!(
            tools_of(NODE_LOCATE_RESERVATION),
            vec![TOOL_GET_RESERVATION_DETAILS, TOOL_CALCULATE, TOOL_LIST_ALL_AIRPORTS]
        );
        assert_eq!(
            tools_of(NODE_SELECT_FLIGHTS),
            vec![
                TOOL_SEARCH_DIRECT_FLIGHT,
                TOOL_SEARCH_ONESTOP_FLIGHT,
                TOOL_LIST_ALL_AIRPORTS,
                TOOL_CALCULATE
            ]
        );
        assert_eq!(tools_of(NODE_COLLECT_PAYMENT), vec![TOOL_CALCULATE]);
        assert_eq!(
            tools_of(NODE_APPLY_CHANGE),
            vec![TOOL_UPDATE_RESERVATION_FLIGHTS, TOOL_CALCULATE]
        );
    }

    /// **Scenario**: edge predicates gate on the populated state fields.
    #[test]
    fn edge_predicates_follow_state_population() {
        let flow = change_flight_flow().unwrap();
        let edge = &flow.outgoing(NODE_SELECT_FLIGHTS)[0];
        assert!(!edge
            .evaluate(&serde_json::json!({ "flight_infos": [] }))
            .unwrap());
        assert!(edge
            .evaluate(&serde_json::json!({ "flight_infos": [{
                "flight_number": "HAT170",
                "origin": "SFO",
                "destination": "JFK",
                "date": "2024-05-20",
                "price": null
            }] }))
            .unwrap());
    }
}
