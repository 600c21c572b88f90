pub mod helpers;
pub mod params;
mod request;
mod response;

pub use params::{ParamSource, Params};
pub use request::ActionRequest;
pub(crate) use request::{is_json_media_type, media_type_of};
pub use response::ActionResponse;
