mod field_view;
mod hints;

pub use field_view::{FieldDrawOptions, field_lines};
pub use hints::{draw_hints, hints_for};
