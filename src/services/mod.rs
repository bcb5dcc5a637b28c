pub mod restaurant_service;
pub mod review_comment_service;
pub mod review_service;

pub use restaurant_service::*;
pub use review_comment_service::*;
pub use review_service::*;
