pub mod mock_bot_api;

pub use mock_bot_api::MockBotApi;
