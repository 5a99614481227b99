pub mod canvas;
pub mod common;
pub mod component;
pub mod hint_bar;
pub mod palette;
pub mod preview;
pub mod properties;

pub use canvas::CanvasComponent;
pub use hint_bar::HintBarComponent;
pub use palette::PaletteComponent;
pub use preview::PreviewComponent;
pub use properties::PropertiesComponent;
