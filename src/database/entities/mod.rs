pub mod restaurants;
pub mod review_comments;
pub mod reviews;
pub mod users;
