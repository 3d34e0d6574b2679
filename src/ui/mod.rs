pub mod preview;

pub use preview::{PreviewError, PreviewLayout, PreviewRenderer};
