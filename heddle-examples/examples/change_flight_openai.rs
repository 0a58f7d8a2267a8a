//! Drive the change-flight workflow against a real OpenAI-compatible backend
//! with the fixture tool source.
//!
//! Requires `OPENAI_API_KEY` (e.g. in `.env`). Optionally set `OPENAI_MODEL`.
//!
//! Run: `cargo run -p heddle-examples --example change_flight_openai`

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use heddle::airline::{change_flight_flow, SampleAirlineToolSource};
use heddle::{ChatOpenAI, WorkflowRuntime};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

    let flow = change_flight_flow()?;
    let runtime = WorkflowRuntime::new(
        flow,
        Arc::new(ChatOpenAI::new(model).with_temperature(0.0)),
        Arc::new(SampleAirlineToolSource::new()),
    );
    let mut conversation = runtime.start_conversation()?;

    println!("change-flight demo (sample user: ava_chen_7341, reservation K9ANM2)");
    println!("type your message, or 'exit' to quit\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" {
            break;
        }

        let outcome = conversation.user_turn(text).await?;
        println!("[{}] {}", conversation.current_node(), outcome.reply);
        if let Some(t) = outcome.transition {
            println!("  (moved {} -> {})", t.from, t.to);
        }
        if conversation.is_terminal() {
            println!("conversation reached the final step");
        }
    }
    Ok(())
}
