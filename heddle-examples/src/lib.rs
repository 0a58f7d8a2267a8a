//! Runnable examples for heddle; see the `examples/` directory.
//!
//! - `change_flight_mock`: scripted LLM + fixture tools, no API key needed.
//! - `change_flight_openai`: interactive REPL against an OpenAI-compatible
//!   backend (`OPENAI_API_KEY`).
