pub mod client;
pub mod methods;
pub mod requests;
pub mod response;
pub mod types;
pub mod upload;

pub use client::SlackClient;
pub use methods::SlackMethod;
pub use response::{SlackData, SlackResponse};
pub use upload::{FileUpload, UploadSource};
