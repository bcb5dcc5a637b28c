use async_graphql::*;
use chrono::{DateTime, Utc};
use sea_orm::EntityTrait;

use crate::database::entities::{reviews, users};
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::app_error_to_graphql_error;
use crate::graphql::types::{ReviewComment, User};

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Review {
    pub id: i32,
    pub restaurant_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            user_id: model.user_id,
            rating: model.rating,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

#[ComplexObject]
impl Review {
    /// The owner's reply, if any
    async fn review_comment(&self, ctx: &Context<'_>) -> Result<Option<ReviewComment>> {
        let context = ctx.data::<GraphQLContext>()?;
        let comment = context
            .comments
            .for_review(self.id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(comment.map(ReviewComment::from))
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = users::Entity::find_by_id(self.user_id)
            .one(&context.db)
            .await?;

        Ok(user.map(User::from))
    }

    /// Creation date formatted for display
    async fn date(&self) -> String {
        self.created_at.format("%m/%d/%y %H:%M").to_string()
    }
}

#[derive(InputObject)]
pub struct AddReviewInput {
    pub restaurant_id: i32,
    pub rating: i32,
    pub content: String,
}

#[derive(InputObject)]
pub struct EditReviewInput {
    pub id: i32,
    pub rating: i32,
    pub content: String,
}
