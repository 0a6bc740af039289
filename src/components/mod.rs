pub mod add_city_overlay;
pub mod board_header;
pub mod city_board;
pub mod city_card;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use add_city_overlay::{AddCityOverlay, AddCityOverlayProps};
pub use board_header::{BoardHeader, BoardHeaderProps};
pub use city_board::{CityBoard, CityBoardProps};
pub use city_card::{CityCard, CityCardProps};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
