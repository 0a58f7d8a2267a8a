//! Heddle CLI: drive the change-flight workflow from a terminal REPL.
//!
//! Reads user messages from stdin, prints assistant replies and node
//! transitions. Talks to an OpenAI-compatible backend (`OPENAI_API_KEY`,
//! optional `OPENAI_BASE_URL`) with the in-memory fixture tool source, so the
//! whole flow can be exercised without the benchmark backend.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

use heddle::airline::{change_flight_flow, SampleAirlineToolSource};
use heddle::{ChatOpenAI, RunOptions, ToolChoiceMode, WorkflowRuntime};

/// Run the airline change-flight conversation workflow.
#[derive(Debug, Parser)]
#[command(name = "heddle", version, about)]
struct Args {
    /// Model name for the OpenAI-compatible backend.
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o")]
    model: String,

    /// Sampling temperature.
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Tool choice mode: auto, none, or required.
    #[arg(long, default_value = "auto")]
    tool_choice: String,

    /// Maximum tool rounds per user turn.
    #[arg(long, default_value_t = 8)]
    max_tool_rounds: u32,

    /// Print state and transition details after each turn.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    if let Err(e) = config::load_and_apply("heddle", None) {
        tracing::warn!(error = %e, "Could not load config; continuing with process env");
    }
    let args = Args::parse();

    let tool_choice: ToolChoiceMode = args.tool_choice.parse()?;
    let llm = ChatOpenAI::new(&args.model)
        .with_temperature(args.temperature)
        .with_tool_choice(tool_choice);

    let flow = change_flight_flow()?;
    let runtime = WorkflowRuntime::new(
        flow,
        Arc::new(llm),
        Arc::new(SampleAirlineToolSource::new()),
    )
    .with_options(RunOptions {
        max_tool_rounds: args.max_tool_rounds,
    });

    let mut conversation = runtime.start_conversation()?;
    println!("heddle change-flight REPL (model: {})", args.model);
    println!("sample user: ava_chen_7341, reservation K9ANM2; 'exit' to quit\n");

    let stdin = io::stdin();
    loop {
        print!("[{}] > ", conversation.current_node());
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }

        match conversation.user_turn(text).await {
            Ok(outcome) => {
                println!("{}", outcome.reply);
                if let Some(t) = &outcome.transition {
                    println!("  (moved {} -> {})", t.from, t.to);
                }
                if args.verbose {
                    println!("  state: {}", conversation.state_value());
                    if let Some(usage) = &outcome.usage {
                        println!("  tokens: {}", usage.total_tokens);
                    }
                }
                if conversation.is_terminal() {
                    println!("\nconversation reached the final step");
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }
    Ok(())
}
