use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::review_comments;

#[derive(SimpleObject, Clone, Debug)]
pub struct ReviewComment {
    pub id: i32,
    pub review_id: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<review_comments::Model> for ReviewComment {
    fn from(model: review_comments::Model) -> Self {
        Self {
            id: model.id,
            review_id: model.review_id,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

#[derive(InputObject)]
pub struct AddReviewCommentInput {
    pub review_id: i32,
    pub comment: String,
}

#[derive(InputObject)]
pub struct EditReviewCommentInput {
    pub id: i32,
    pub comment: String,
}
