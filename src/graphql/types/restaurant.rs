use async_graphql::*;
use chrono::{DateTime, Utc};
use sea_orm::EntityTrait;

use crate::database::entities::{restaurants, users};
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::app_error_to_graphql_error;
use crate::graphql::types::{Review, User};

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Restaurant {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<restaurants::Model> for Restaurant {
    fn from(model: restaurants::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            location: model.location,
            image_url: model.image_url,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[ComplexObject]
impl Restaurant {
    /// Reviews for this restaurant, newest first
    async fn reviews(&self, ctx: &Context<'_>) -> Result<Vec<Review>> {
        let context = ctx.data::<GraphQLContext>()?;
        let reviews = context
            .reviews
            .for_restaurant(self.id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(reviews.into_iter().map(Review::from).collect())
    }

    async fn average_rating(&self, ctx: &Context<'_>) -> Result<Option<f64>> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reviews
            .average_rating(self.id)
            .await
            .map_err(app_error_to_graphql_error)
    }

    async fn total_reviews(&self, ctx: &Context<'_>) -> Result<u64> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .reviews
            .total_for_restaurant(self.id)
            .await
            .map_err(app_error_to_graphql_error)
    }

    async fn highest_review(&self, ctx: &Context<'_>) -> Result<Option<Review>> {
        let context = ctx.data::<GraphQLContext>()?;
        let review = context
            .reviews
            .highest_for_restaurant(self.id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(review.map(Review::from))
    }

    async fn lowest_review(&self, ctx: &Context<'_>) -> Result<Option<Review>> {
        let context = ctx.data::<GraphQLContext>()?;
        let review = context
            .reviews
            .lowest_for_restaurant(self.id)
            .await
            .map_err(app_error_to_graphql_error)?;

        Ok(review.map(Review::from))
    }

    /// Whether the acting customer may still add a review here
    async fn can_add_review(&self, ctx: &Context<'_>) -> Result<bool> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let Some(user_id) = actor.user_id else {
            return Ok(false);
        };

        context
            .reviews
            .customer_can_add_review(user_id, self.id)
            .await
            .map_err(app_error_to_graphql_error)
    }

    async fn owner(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = users::Entity::find_by_id(self.user_id)
            .one(&context.db)
            .await?;

        Ok(user.map(User::from))
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct RestaurantEdge {
    pub cursor: i32,
    pub node: Restaurant,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct PageInfo {
    pub end_cursor: i32,
    pub has_next_page: bool,
}

#[derive(SimpleObject, Clone, Debug)]
pub struct RestaurantConnection {
    pub total_count: i32,
    pub edges: Vec<RestaurantEdge>,
    pub page_info: PageInfo,
}

#[derive(InputObject)]
pub struct AddRestaurantInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
}

#[derive(InputObject)]
pub struct EditRestaurantInput {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
}
