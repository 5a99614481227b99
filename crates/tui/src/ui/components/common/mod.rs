mod inline_editor;
mod text_input;

pub use inline_editor::{EditorTarget, InlineEditor};
pub use text_input::TextInputState;
