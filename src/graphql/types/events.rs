use async_graphql::*;

use crate::graphql::types::{Restaurant, Review, ReviewComment};

/// What happened to the resource carried by a change event.
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct RestaurantChanged {
    pub mutation: MutationKind,
    pub id: i32,
    /// Absent for deletions
    pub node: Option<Restaurant>,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ReviewChanged {
    pub mutation: MutationKind,
    pub id: i32,
    pub restaurant_id: i32,
    pub node: Option<Review>,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct ReviewCommentChanged {
    pub mutation: MutationKind,
    pub id: i32,
    pub restaurant_id: i32,
    pub node: Option<ReviewComment>,
}
