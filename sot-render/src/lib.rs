pub mod layout;
pub mod render;
pub mod text;

pub use ab_glyph::FontVec;
pub use layout::{DialLayout, Frame, Layout};
pub use render::{
    format_remaining, trial_prompt, ResultsView, SceneRenderer, Screen, TrialView,
};
pub use text::{render_text_pixmap, wrap, TextCache};
