//! Airline domain models shared by the workflow states and inputs.
//!
//! Shapes follow the airline customer-service dataset: user profiles with
//! saved payment methods and passengers, reservations with flight segments,
//! and flight search results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A person's name as stored on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub first_name: String,
    pub last_name: String,
}

/// Postal address on the user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

/// How a payment method is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSource {
    CreditCard,
    GiftCard,
    Certificate,
}

/// A payment method saved on the user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub source: PaymentSource,
    /// Card brand, for credit cards.
    #[serde(default)]
    pub brand: Option<String>,
    /// Last four digits, for credit cards.
    #[serde(default)]
    pub last_four: Option<String>,
    /// Remaining balance, for gift cards and certificates.
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Loyalty membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    #[default]
    Regular,
    Silver,
    Gold,
}

/// One passenger on a reservation or saved on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerInfo {
    pub first_name: String,
    pub last_name: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub dob: String,
}

/// A user profile as returned by `get_user_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user_id: String,
    pub name: Name,
    pub email: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub membership: MembershipTier,
    /// Saved payment methods keyed by id.
    #[serde(default)]
    pub payment_methods: BTreeMap<String, PaymentMethod>,
    #[serde(default)]
    pub saved_passengers: Vec<PassengerInfo>,
    /// Reservation ids on this profile.
    #[serde(default)]
    pub reservations: Vec<String>,
}

/// Cabin class of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    BasicEconomy,
    Economy,
    Business,
}

/// Trip type of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightType {
    OneWay,
    RoundTrip,
}

/// Whether travel insurance was purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insurance {
    Yes,
    No,
}

/// One flight segment: a search result or a segment of a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    /// Departure date, `YYYY-MM-DD`.
    pub date: String,
    /// Per-passenger price for the selected cabin, when known.
    #[serde(default)]
    pub price: Option<f64>,
}

/// One entry in a reservation's payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub amount: f64,
}

/// A reservation as returned by `get_reservation_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub reservation_id: String,
    pub user_id: String,
    pub origin: String,
    pub destination: String,
    pub flight_type: FlightType,
    pub cabin: CabinClass,
    pub flights: Vec<FlightInfo>,
    #[serde(default)]
    pub passengers: Vec<PassengerInfo>,
    #[serde(default)]
    pub payment_history: Vec<PaymentRecord>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub total_baggages: u32,
    #[serde(default)]
    pub nonfree_baggages: u32,
    pub insurance: Insurance,
}
