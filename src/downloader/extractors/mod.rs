// InfoExtractor module - video metadata extraction
//
// The CLI extractor shells out to the native `yt-dlp` binary. Its stderr is
// run through `diagnose_error` so failures carry a BlockingReason.

mod cli;
mod diagnostics;
mod traits;

pub use cli::CliInfoExtractor;
pub use diagnostics::{diagnose_error, BlockingReason};
pub use traits::InfoExtractor;
