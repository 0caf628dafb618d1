pub mod edit_service;
pub mod export_service;
pub mod prompt_composer;

pub use edit_service::{EditRequest, EditService, EditedImage, ImageEditCapability};
pub use export_service::{Bundle, ExportService};
pub use prompt_composer::compose;
