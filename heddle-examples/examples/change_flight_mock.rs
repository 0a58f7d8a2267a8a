//! Walk the change-flight workflow end to end with a scripted LLM and the
//! fixture tool source. No API key needed.
//!
//! Run: `cargo run -p heddle-examples --example change_flight_mock`

use std::sync::Arc;

use heddle::airline::{
    change_flight_flow, SampleAirlineToolSource, SAMPLE_RESERVATION_ID, SAMPLE_USER_ID,
};
use heddle::{LlmResponse, MockLlm, ToolCall, WorkflowRuntime};
use serde_json::json;

fn update_state(args: serde_json::Value) -> ToolCall {
    ToolCall::new("update_state", args.to_string())
}

fn scripted_llm() -> MockLlm {
    let user = SampleAirlineToolSource::sample_user();
    let reservation = SampleAirlineToolSource::sample_reservation();

    MockLlm::scripted(vec![
        LlmResponse::calling(
            "Let me look up your account.",
            vec![ToolCall::new(
                "get_user_details",
                json!({ "user_id": SAMPLE_USER_ID }).to_string(),
            )],
        ),
        LlmResponse::calling("", vec![update_state(json!({ "user_details": user }))]),
        LlmResponse::text("I found your account, Ava. Which reservation should we change?"),
        LlmResponse::calling(
            "One moment.",
            vec![ToolCall::new(
                "get_reservation_details",
                json!({ "reservation_id": SAMPLE_RESERVATION_ID }).to_string(),
            )],
        ),
        LlmResponse::calling(
            "",
            vec![update_state(json!({ "reservation_details": reservation }))],
        ),
        LlmResponse::text("Got it: SFO to JFK on May 20. What would you like instead?"),
        LlmResponse::calling(
            "Searching.",
            vec![ToolCall::new(
                "search_direct_flight",
                json!({ "origin": "SFO", "destination": "JFK", "date": "2024-05-21" }).to_string(),
            )],
        ),
        LlmResponse::calling(
            "",
            vec![update_state(json!({ "flight_infos": [{
                "flight_number": "HAT204",
                "origin": "SFO",
                "destination": "JFK",
                "date": "2024-05-21",
                "price": 142.0
            }] }))],
        ),
        LlmResponse::text("HAT204 on May 21 is available at $142. How would you like to pay?"),
        LlmResponse::calling(
            "",
            vec![update_state(json!({ "payment_id": "credit_card_991" }))],
        ),
        LlmResponse::text("I'll settle the difference with your visa ending in 4421."),
        LlmResponse::calling(
            "Applying the change.",
            vec![ToolCall::new(
                "update_reservation_flights",
                json!({
                    "reservation_id": SAMPLE_RESERVATION_ID,
                    "cabin": "economy",
                    "flights": [{
                        "flight_number": "HAT204",
                        "origin": "SFO",
                        "destination": "JFK",
                        "date": "2024-05-21"
                    }],
                    "payment_id": "credit_card_991"
                })
                .to_string(),
            )],
        ),
        LlmResponse::calling("", vec![update_state(json!({ "is_change_successful": true }))]),
        LlmResponse::text("Done. Your reservation now has flight HAT204 on May 21."),
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let flow = change_flight_flow()?;
    let runtime = WorkflowRuntime::new(
        flow,
        Arc::new(scripted_llm()),
        Arc::new(SampleAirlineToolSource::new()),
    );
    let mut conversation = runtime.start_conversation()?;

    let turns = [
        "Hi, I need to change my flight. My user id is ava_chen_7341.",
        "It's reservation K9ANM2.",
        "Can you move me to a flight on May 21?",
        "Use my visa card.",
        "Yes, please confirm.",
    ];

    for text in turns {
        println!("> {}", text);
        let outcome = conversation.user_turn(text).await?;
        println!("[{}] {}", conversation.current_node(), outcome.reply);
        if let Some(t) = outcome.transition {
            println!("  (moved {} -> {})", t.from, t.to);
        }
    }

    println!(
        "terminal: {}, transitions: {}",
        conversation.is_terminal(),
        conversation.transitions().len()
    );
    Ok(())
}
