pub mod folder_service;
pub mod listing_service;
pub mod mutation_service;
pub mod navigation_service;
pub mod view_service;
