use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::auth::{require_owner, Actor, Authorizer, ScopeAuthorizer};
use crate::database::entities::{restaurants, review_comments, reviews};
use crate::errors::{AppError, AppResult};

pub struct NewReview {
    pub restaurant_id: i32,
    pub rating: i32,
    pub content: String,
}

pub struct ReviewPatch {
    pub id: i32,
    pub rating: i32,
    pub content: String,
}

#[derive(Clone)]
pub struct ReviewService {
    db: DatabaseConnection,
}

impl ReviewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Review eligibility: a customer may review a restaurant only once.
    /// Read-then-write; concurrent duplicate submissions can race past this
    /// (no unique constraint backs it, matching the stored schema).
    pub async fn customer_can_add_review(
        &self,
        user_id: i32,
        restaurant_id: i32,
    ) -> AppResult<bool> {
        let existing = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::RestaurantId.eq(restaurant_id))
            .one(&self.db)
            .await?;

        Ok(existing.is_none())
    }

    pub async fn create(&self, actor: &Actor, input: NewReview) -> AppResult<reviews::Model> {
        ScopeAuthorizer.authorize(actor, "review:create:self")?;
        let user_id = actor
            .user_id
            .ok_or_else(|| AppError::unauthorized("User is not authenticated"))?;

        if !(1..=5).contains(&input.rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        let restaurant = restaurants::Entity::find_by_id(input.restaurant_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Restaurant", input.restaurant_id.to_string())
            })?;

        if !self.customer_can_add_review(user_id, restaurant.id).await? {
            return Err(AppError::conflict(
                "User has already added a review to this restaurant",
            ));
        }

        let review = reviews::ActiveModel {
            restaurant_id: Set(restaurant.id),
            user_id: Set(user_id),
            rating: Set(input.rating),
            content: Set(input.content),
            ..reviews::ActiveModel::new()
        };

        Ok(review.insert(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<reviews::Model>> {
        Ok(reviews::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn update(&self, actor: &Actor, patch: ReviewPatch) -> AppResult<reviews::Model> {
        let review = reviews::Entity::find_by_id(patch.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Review", patch.id.to_string()))?;

        require_owner(actor, review.user_id)?;

        if !(1..=5).contains(&patch.rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        let mut review: reviews::ActiveModel = review.into();
        review.rating = Set(patch.rating);
        review.content = Set(patch.content);
        let review = review.set_updated_at();

        Ok(review.update(&self.db).await?)
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> AppResult<reviews::Model> {
        let review = reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::conflict("Review is already deleted"))?;

        require_owner(actor, review.user_id)?;

        let result = reviews::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::conflict("Review is already deleted"));
        }

        Ok(review)
    }

    /// Reviews for one restaurant, newest first.
    pub async fn for_restaurant(&self, restaurant_id: i32) -> AppResult<Vec<reviews::Model>> {
        Ok(reviews::Entity::find()
            .filter(reviews::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn highest_for_restaurant(
        &self,
        restaurant_id: i32,
    ) -> AppResult<Option<reviews::Model>> {
        Ok(reviews::Entity::find()
            .filter(reviews::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(reviews::Column::Rating)
            .order_by_desc(reviews::Column::CreatedAt)
            .one(&self.db)
            .await?)
    }

    pub async fn lowest_for_restaurant(
        &self,
        restaurant_id: i32,
    ) -> AppResult<Option<reviews::Model>> {
        Ok(reviews::Entity::find()
            .filter(reviews::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(reviews::Column::Rating)
            .order_by_desc(reviews::Column::CreatedAt)
            .one(&self.db)
            .await?)
    }

    pub async fn average_rating(&self, restaurant_id: i32) -> AppResult<Option<f64>> {
        let reviews = self.for_restaurant(restaurant_id).await?;
        if reviews.is_empty() {
            return Ok(None);
        }
        let sum: i64 = reviews.iter().map(|review| review.rating as i64).sum();
        Ok(Some(sum as f64 / reviews.len() as f64))
    }

    pub async fn total_for_restaurant(&self, restaurant_id: i32) -> AppResult<u64> {
        Ok(self.for_restaurant(restaurant_id).await?.len() as u64)
    }

    /// Reviews on the acting owner's restaurants that have no comment yet.
    pub async fn unanswered_for_owner(&self, actor: &Actor) -> AppResult<Vec<reviews::Model>> {
        let owner_id = actor
            .user_id
            .ok_or_else(|| AppError::unauthorized("User is not authenticated"))?;

        let restaurant_ids: Vec<i32> = restaurants::Entity::find()
            .filter(restaurants::Column::UserId.eq(owner_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|restaurant| restaurant.id)
            .collect();

        let reviews = reviews::Entity::find()
            .filter(reviews::Column::RestaurantId.is_in(restaurant_ids))
            .order_by_desc(reviews::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let answered: std::collections::HashSet<i32> = review_comments::Entity::find()
            .filter(
                review_comments::Column::ReviewId
                    .is_in(reviews.iter().map(|review| review.id).collect::<Vec<i32>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|comment| comment.review_id)
            .collect();

        Ok(reviews
            .into_iter()
            .filter(|review| !answered.contains(&review.id))
            .collect())
    }
}
