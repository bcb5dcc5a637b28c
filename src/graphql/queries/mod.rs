use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::app_error_to_graphql_error;
use crate::graphql::types::{
    PageInfo, Restaurant, RestaurantConnection, RestaurantEdge, Review, ReviewComment,
};
use crate::pagination::paginate;

pub struct Query;

#[Object]
impl Query {
    /// Restaurants visible to the actor, best rated first, as a positional
    /// cursor page. Restaurants without any review are never listed.
    async fn restaurants(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] limit: i32,
        #[graphql(default = 0)] after: i32,
        ratings_minimum: Option<i32>,
    ) -> Result<RestaurantConnection> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let rated = context
            .restaurants
            .list_with_ratings(&actor, ratings_minimum)
            .await
            .map_err(app_error_to_graphql_error)?;

        let page = paginate(rated, limit.max(0) as usize, after.max(0) as usize);

        Ok(RestaurantConnection {
            total_count: page.total_count as i32,
            edges: page
                .edges
                .into_iter()
                .map(|edge| RestaurantEdge {
                    cursor: edge.cursor as i32,
                    node: Restaurant::from(edge.node.restaurant),
                })
                .collect(),
            page_info: PageInfo {
                end_cursor: page.end_cursor as i32,
                has_next_page: page.has_next_page,
            },
        })
    }

    async fn restaurant(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Restaurant>> {
        let context = ctx.data::<GraphQLContext>()?;
        let restaurant = context
            .restaurants
            .get(id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(restaurant.map(Restaurant::from))
    }

    async fn review(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Review>> {
        let context = ctx.data::<GraphQLContext>()?;
        let review = context
            .reviews
            .get(id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(review.map(Review::from))
    }

    async fn review_comment(&self, ctx: &Context<'_>, id: i32) -> Result<Option<ReviewComment>> {
        let context = ctx.data::<GraphQLContext>()?;
        let comment = context
            .comments
            .get(id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(comment.map(ReviewComment::from))
    }

    /// Reviews on the acting owner's restaurants that have no comment yet
    #[graphql(name = "getUnansweredReviewsForOwner")]
    async fn unanswered_reviews_for_owner(&self, ctx: &Context<'_>) -> Result<Vec<Review>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let reviews = context
            .reviews
            .unanswered_for_owner(&actor)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(reviews.into_iter().map(Review::from).collect())
    }
}
