//! Chat completion gateways.

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleGateway;
