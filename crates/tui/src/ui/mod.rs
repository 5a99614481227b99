pub mod components;
pub mod main_view;
pub mod runtime;
pub mod theme;
pub mod widgets;
