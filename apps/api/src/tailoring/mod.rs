// Job application tailoring: prompt templates, task functions, the session
// controller and the page/API handlers built on them.
// All completion calls go through llm_client — nothing here speaks HTTP upstream.

pub mod controller;
pub mod handlers;
pub mod page;
pub mod prompts;
pub mod tasks;
