pub mod cloudflare;
pub mod traits;
pub mod util;

pub use cloudflare::WorkersAi;
pub use traits::{ChatModel, Message, MessageRole};
pub use util::{strip_code_blocks, truncate_to_char_boundary};
