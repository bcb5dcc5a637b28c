use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::auth::{require_owner, Actor, Authorizer, ScopeAuthorizer};
use crate::database::entities::{restaurants, reviews};
use crate::errors::{AppError, AppResult};

/// A restaurant with its aggregated review rating, as produced by the
/// listing query.
#[derive(Clone, Debug)]
pub struct RatedRestaurant {
    pub restaurant: restaurants::Model,
    pub average_rating: f64,
}

pub struct NewRestaurant {
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
}

pub struct RestaurantPatch {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
}

#[derive(Clone)]
pub struct RestaurantService {
    db: DatabaseConnection,
}

impl RestaurantService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Restaurants visible to the actor, ordered by average rating
    /// descending. Restaurants without any review never appear; with
    /// `ratings_minimum`, only restaurants having at least one review rated
    /// strictly above the threshold remain. Actors holding only
    /// `restaurant:view:self` (owners) see their own rows alone.
    pub async fn list_with_ratings(
        &self,
        actor: &Actor,
        ratings_minimum: Option<i32>,
    ) -> AppResult<Vec<RatedRestaurant>> {
        let mut query = restaurants::Entity::find();
        if let Some(owner_id) = Self::owner_filter(actor) {
            query = query.filter(restaurants::Column::UserId.eq(owner_id));
        }
        let restaurants = query.all(&self.db).await?;

        let ids: Vec<i32> = restaurants.iter().map(|r| r.id).collect();
        let reviews = reviews::Entity::find()
            .filter(reviews::Column::RestaurantId.is_in(ids))
            .all(&self.db)
            .await?;

        let mut by_restaurant: HashMap<i32, Vec<&reviews::Model>> = HashMap::new();
        for review in &reviews {
            by_restaurant
                .entry(review.restaurant_id)
                .or_default()
                .push(review);
        }

        let mut rated: Vec<RatedRestaurant> = restaurants
            .into_iter()
            .filter_map(|restaurant| {
                let reviews = by_restaurant.get(&restaurant.id)?;
                if let Some(minimum) = ratings_minimum {
                    if !reviews.iter().any(|review| review.rating > minimum) {
                        return None;
                    }
                }
                let sum: i64 = reviews.iter().map(|review| review.rating as i64).sum();
                let average_rating = sum as f64 / reviews.len() as f64;
                Some(RatedRestaurant {
                    restaurant,
                    average_rating,
                })
            })
            .collect();

        rated.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.restaurant.id.cmp(&b.restaurant.id))
        });

        Ok(rated)
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<restaurants::Model>> {
        Ok(restaurants::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: NewRestaurant,
    ) -> AppResult<restaurants::Model> {
        ScopeAuthorizer.authorize(actor, "restaurant:create:self")?;
        let user_id = actor
            .user_id
            .ok_or_else(|| AppError::unauthorized("User is not authenticated"))?;

        let restaurant = restaurants::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            location: Set(input.location),
            image_url: Set(input.image_url),
            user_id: Set(user_id),
            ..restaurants::ActiveModel::new()
        };

        Ok(restaurant.insert(&self.db).await?)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        patch: RestaurantPatch,
    ) -> AppResult<restaurants::Model> {
        ScopeAuthorizer.authorize(actor, "restaurant:update:self")?;

        let restaurant = restaurants::Entity::find_by_id(patch.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant", patch.id.to_string()))?;

        require_owner(actor, restaurant.user_id)?;

        let mut restaurant: restaurants::ActiveModel = restaurant.into();
        restaurant.title = Set(patch.title);
        restaurant.description = Set(patch.description);
        restaurant.location = Set(patch.location);
        restaurant.image_url = Set(patch.image_url);
        let restaurant = restaurant.set_updated_at();

        Ok(restaurant.update(&self.db).await?)
    }

    /// Delete a restaurant, returning the removed row. Deleting an id that
    /// no longer exists is a state conflict, not a silent success.
    pub async fn delete(&self, actor: &Actor, id: i32) -> AppResult<restaurants::Model> {
        ScopeAuthorizer.authorize(actor, "restaurant:delete:self")?;

        let restaurant = restaurants::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::conflict("Restaurant is already deleted"))?;

        require_owner(actor, restaurant.user_id)?;

        let result = restaurants::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::conflict("Restaurant is already deleted"));
        }

        Ok(restaurant)
    }

    fn owner_filter(actor: &Actor) -> Option<i32> {
        if actor.has_scope("restaurant:view:all") {
            return None;
        }
        if actor.has_scope("restaurant:view:self") {
            return actor.user_id;
        }
        None
    }
}
