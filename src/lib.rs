//! Narcissus - a customer-support agent for Atla AI
//!
//! Narcissus answers questions about Atla AI's products by calling a hosted
//! chat model with a set of tools bound. When the model asks for tools, they
//! are executed and their results fed back, until the model replies with a
//! plain answer.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `tools` - Local scraping tools, the tool registry, and the tool execution step
//! - `aci` - Remote tool catalog and execution service
//! - `agent` - Conversation types, the chat model, and the reasoning loop
//! - `cli` - Command line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use narcissus::agent::Agent;
//! use narcissus::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let agent = Agent::from_settings(&settings).await?;
//!
//!     let answer = agent.ask("What is Atla AI?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod aci;
pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod tools;

pub use error::{NarcissusError, Result};
