pub mod events;
pub mod restaurant;
pub mod review;
pub mod review_comment;
pub mod user;

pub use events::*;
pub use restaurant::*;
pub use review::*;
pub use review_comment::*;
pub use user::*;
