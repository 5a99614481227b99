mod nord;
mod roles;
pub mod theme_helpers;

pub use nord::NordTheme;
pub use roles::{Theme, ThemeRoles};
