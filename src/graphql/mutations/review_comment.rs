use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::ResultExt;
use crate::graphql::subscriptions::publish_review_comment_event;
use crate::graphql::types::{
    AddReviewCommentInput, EditReviewCommentInput, MutationKind, ReviewComment,
    ReviewCommentChanged,
};
use crate::services::{NewReviewComment, ReviewCommentPatch};

#[derive(Default)]
pub struct ReviewCommentMutation;

#[Object]
impl ReviewCommentMutation {
    /// Answer a review on one of the acting owner's restaurants. One comment
    /// per review; violating that fails with a conflict.
    async fn add_review_comment(
        &self,
        ctx: &Context<'_>,
        input: AddReviewCommentInput,
    ) -> Result<ReviewComment> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let (model, restaurant_id) = context
            .comments
            .create(
                &actor,
                NewReviewComment {
                    review_id: input.review_id,
                    comment: input.comment,
                },
            )
            .await
            .to_graphql_result()?;

        let comment = ReviewComment::from(model);
        publish_review_comment_event(ReviewCommentChanged {
            mutation: MutationKind::Created,
            id: comment.id,
            restaurant_id,
            node: Some(comment.clone()),
        })
        .await;

        Ok(comment)
    }

    async fn edit_review_comment(
        &self,
        ctx: &Context<'_>,
        input: EditReviewCommentInput,
    ) -> Result<ReviewComment> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let (model, restaurant_id) = context
            .comments
            .update(
                &actor,
                ReviewCommentPatch {
                    id: input.id,
                    comment: input.comment,
                },
            )
            .await
            .to_graphql_result()?;

        let comment = ReviewComment::from(model);
        publish_review_comment_event(ReviewCommentChanged {
            mutation: MutationKind::Updated,
            id: comment.id,
            restaurant_id,
            node: Some(comment.clone()),
        })
        .await;

        Ok(comment)
    }

    async fn delete_review_comment(&self, ctx: &Context<'_>, id: i32) -> Result<ReviewComment> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let (model, restaurant_id) = context
            .comments
            .delete(&actor, id)
            .await
            .to_graphql_result()?;

        let comment = ReviewComment::from(model);
        publish_review_comment_event(ReviewCommentChanged {
            mutation: MutationKind::Deleted,
            id: comment.id,
            restaurant_id,
            node: None,
        })
        .await;

        Ok(comment)
    }
}
