use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::ResultExt;
use crate::graphql::subscriptions::{publish_restaurant_event, publish_restaurant_list_event};
use crate::graphql::types::{
    AddRestaurantInput, EditRestaurantInput, MutationKind, Restaurant, RestaurantChanged,
};
use crate::services::{NewRestaurant, RestaurantPatch};

#[derive(Default)]
pub struct RestaurantMutation;

#[Object]
impl RestaurantMutation {
    /// Create a restaurant owned by the acting owner
    async fn add_restaurant(
        &self,
        ctx: &Context<'_>,
        input: AddRestaurantInput,
    ) -> Result<Restaurant> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let model = context
            .restaurants
            .create(
                &actor,
                NewRestaurant {
                    title: input.title,
                    description: input.description,
                    location: input.location,
                    image_url: input.image_url,
                },
            )
            .await
            .to_graphql_result()?;

        let restaurant = Restaurant::from(model);

        // New rows only affect the listing; nobody watches a page that did
        // not exist yet.
        publish_restaurant_list_event(RestaurantChanged {
            mutation: MutationKind::Created,
            id: restaurant.id,
            node: Some(restaurant.clone()),
        })
        .await;

        Ok(restaurant)
    }

    /// Update a restaurant; admins may edit any, owners only their own
    async fn edit_restaurant(
        &self,
        ctx: &Context<'_>,
        input: EditRestaurantInput,
    ) -> Result<Restaurant> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let model = context
            .restaurants
            .update(
                &actor,
                RestaurantPatch {
                    id: input.id,
                    title: input.title,
                    description: input.description,
                    location: input.location,
                    image_url: input.image_url,
                },
            )
            .await
            .to_graphql_result()?;

        let restaurant = Restaurant::from(model);
        let event = RestaurantChanged {
            mutation: MutationKind::Updated,
            id: restaurant.id,
            node: Some(restaurant.clone()),
        };
        publish_restaurant_list_event(event.clone()).await;
        publish_restaurant_event(event).await;

        Ok(restaurant)
    }

    /// Delete a restaurant and everything under it
    async fn delete_restaurant(&self, ctx: &Context<'_>, id: i32) -> Result<Restaurant> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = GraphQLContext::actor(ctx);

        let model = context
            .restaurants
            .delete(&actor, id)
            .await
            .to_graphql_result()?;

        // Subscribers get the removed row as the payload; it is the last
        // place its fields are still observable.
        let restaurant = Restaurant::from(model);
        let event = RestaurantChanged {
            mutation: MutationKind::Deleted,
            id: restaurant.id,
            node: Some(restaurant.clone()),
        };
        publish_restaurant_list_event(event.clone()).await;
        publish_restaurant_event(event).await;

        Ok(restaurant)
    }
}
