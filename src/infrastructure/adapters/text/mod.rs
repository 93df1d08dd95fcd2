//! Text Adapter - 文本生成客户端实现

mod cohere_client;
mod fake_text_client;

pub use cohere_client::{CohereChatClient, CohereChatClientConfig};
pub use fake_text_client::{FakeTextClient, FakeTextClientConfig};
