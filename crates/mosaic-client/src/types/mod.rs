pub mod mode;
pub mod request;
pub mod response;
pub mod settings;
pub mod tool;

pub use mode::CanonicalMode;
pub use request::{ChatRequest, DocumentUpload, HistoryEntry, Role};
pub use response::{
    ChatResponse, GalleryClearResponse, GalleryItem, GalleryResponse, HistoryResponse,
    UploadResponse,
};
pub use settings::{ImageSettings, Settings};
pub use tool::ToolRecord;
