//! Image Adapter - 图像生成客户端实现

mod fake_image_client;
mod leonardo_client;

pub use fake_image_client::{FakeImageClient, FakeImageClientConfig};
pub use leonardo_client::{LeonardoImageClient, LeonardoImageClientConfig};
