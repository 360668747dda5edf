//! Agent system: a reasoning step that calls the chat model and a tool
//! execution step, alternating until the model answers without tool calls.

mod graph;
mod message;
mod model;
mod runner;

pub use graph::{AgentGraph, Edge};
pub use message::{Conversation, Message, ToolCallRequest};
pub use model::{to_openai_tools, to_request_messages, ChatModel, OpenAIChatModel};
pub use runner::{route, Agent, AgentResponse, Route, DEFAULT_MAX_ITERATIONS};
