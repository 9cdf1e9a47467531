pub mod displayer;
pub mod library;
pub mod pipeline;
pub mod session;

pub use displayer::{Displayer, DisplayerEvent, FrameScheduler, OffscreenDisplayer};
pub use library::DemoLibrary;
pub use pipeline::{PreviewPipeline, PreviewProvider, PreviewStageData};
pub use session::{LookDev, SessionSettings};
