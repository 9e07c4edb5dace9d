//! In-process consumer for the streaming endpoint: an SSE decoder, a pure
//! event reducer, and a poll-style client that ties them together.

pub mod reducer;
pub mod stream;

pub use reducer::{StreamStatus, StreamingAnalysisState};
pub use stream::{SseFrameDecoder, StreamingAnalysisClient};
