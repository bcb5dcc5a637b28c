mod restaurant;
mod review;
mod review_comment;

use async_graphql::*;

/// Mutation root combining the per-entity submodules
#[derive(Default, MergedObject)]
pub struct Mutation(
    pub restaurant::RestaurantMutation,
    pub review::ReviewMutation,
    pub review_comment::ReviewCommentMutation,
);
