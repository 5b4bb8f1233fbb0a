pub mod debounce;
pub mod overlay;
pub mod render;
pub mod session;

pub use debounce::{Debouncer, Ticket};
pub use overlay::{EditSession, KeyOutcome, Overlay};
pub use render::{RENDER_DEBOUNCE, RenderJob, RenderOutcome, RenderPipeline, error_toast_text};
pub use session::LiveSession;
