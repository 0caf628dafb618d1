pub mod aspect_ratio;
pub mod preset;
pub mod work_item;

pub use aspect_ratio::AspectRatio;
pub use preset::{FilterPreset, PresetCatalog, PresetCategory};
pub use work_item::{
    result_file_name, ItemId, ItemPatch, ItemStatus, OriginalRef, ResultRef, WorkItem,
};
