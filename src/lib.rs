pub mod config;
pub mod constants;
pub mod dome_com;
pub mod enums;
pub mod error;
pub mod mock_dome_com {
    pub mod mock_dome_com;
}
pub mod model;
pub mod registry;
pub mod reporter;
pub mod signals;
pub mod status;
pub mod status_classifier;
