//! Airline customer-service workflow: domain types, tool specs, and the
//! change-flight graph.
//!
//! This module is configuration on top of the generic schema/runtime layers:
//! [`change_flight_flow`] declares the five-node change-flight conversation,
//! [`airline_tool_specs`] the tool registry subset it permits, and
//! [`SampleAirlineToolSource`] a canned backend for demos and tests.

mod change_flight;
mod fixtures;
mod tools;
mod types;

pub use change_flight::{
    change_flight_flow, change_flight_graph, ApplyChangeState, CollectPaymentState,
    FlightSelectionContext, IdentifyUserState, LocateReservationState, PaymentContext,
    ReservationContext, SelectFlightsState, UserContext, AIRLINE_BACKGROUND,
    CHANGE_FLIGHT_PREAMBLE, NODE_APPLY_CHANGE, NODE_COLLECT_PAYMENT, NODE_IDENTIFY_USER,
    NODE_LOCATE_RESERVATION, NODE_SELECT_FLIGHTS,
};
pub use fixtures::{SampleAirlineToolSource, SAMPLE_RESERVATION_ID, SAMPLE_USER_ID};
pub use tools::{
    airline_tool_specs, AirlineSpecError, TOOL_CALCULATE, TOOL_GET_RESERVATION_DETAILS,
    TOOL_GET_USER_DETAILS, TOOL_LIST_ALL_AIRPORTS, TOOL_SEARCH_DIRECT_FLIGHT,
    TOOL_SEARCH_ONESTOP_FLIGHT, TOOL_UPDATE_RESERVATION_FLIGHTS,
};
pub use types::{
    Address, CabinClass, FlightInfo, FlightType, Insurance, MembershipTier, Name, PassengerInfo,
    PaymentMethod, PaymentRecord, PaymentSource, ReservationDetails, UserDetails,
};
