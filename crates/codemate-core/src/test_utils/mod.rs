pub mod mock_llm_server;
pub mod scripted_llm;
