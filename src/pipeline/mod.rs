//! Render pipeline and editor session.

pub mod render;
pub mod session;

pub use render::render;
pub use session::{EditorSession, RenderListener, RenderState};
