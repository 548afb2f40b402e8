mod extract;
mod request;
mod response;
mod wrapper;

pub use extract::*;
pub use request::*;
pub use response::*;
pub use wrapper::*;
