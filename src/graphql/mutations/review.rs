use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::ResultExt;
use crate::graphql::subscriptions::publish_review_event;
use crate::graphql::types::{
    AddReviewInput, EditReviewInput, MutationKind, Review, ReviewChanged,
};
use crate::services::{NewReview, ReviewPatch};

#[derive(Default)]
pub struct ReviewMutation;

#[Object]
impl ReviewMutation {
    /// Post the acting customer's review on a restaurant. One review per
    /// customer per restaurant; violating that fails with a conflict.
    async fn add_review(&self, ctx: &Context<'_>, input: AddReviewInput) -> Result<Review> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let model = context
            .reviews
            .create(
                &actor,
                NewReview {
                    restaurant_id: input.restaurant_id,
                    rating: input.rating,
                    content: input.content,
                },
            )
            .await
            .to_graphql_result()?;

        Ok(Review::from(model))
    }

    /// Edit a review; admins may edit any, customers only their own
    async fn edit_review(&self, ctx: &Context<'_>, input: EditReviewInput) -> Result<Review> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let model = context
            .reviews
            .update(
                &actor,
                ReviewPatch {
                    id: input.id,
                    rating: input.rating,
                    content: input.content,
                },
            )
            .await
            .to_graphql_result()?;

        let review = Review::from(model);
        publish_review_event(ReviewChanged {
            mutation: MutationKind::Updated,
            id: review.id,
            restaurant_id: review.restaurant_id,
            node: Some(review.clone()),
        })
        .await;

        Ok(review)
    }

    /// Delete a review and its comment
    async fn delete_review(&self, ctx: &Context<'_>, id: i32) -> Result<Review> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let model = context.reviews.delete(&actor, id).await.to_graphql_result()?;

        let review = Review::from(model);
        publish_review_event(ReviewChanged {
            mutation: MutationKind::Deleted,
            id: review.id,
            restaurant_id: review.restaurant_id,
            node: None,
        })
        .await;

        Ok(review)
    }
}
