pub mod evaluation_service;
pub mod huntflow_service;
pub mod llm_service;
pub mod status_service;
pub mod token_store;
