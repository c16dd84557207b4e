pub mod errors;
pub mod health_check;
pub mod jobs;
pub mod notify;
pub mod subscribers;
pub mod subscriptions;
pub mod videos;

pub use health_check::*;
pub use jobs::*;
pub use notify::*;
pub use subscribers::*;
pub use subscriptions::*;
pub use videos::*;
