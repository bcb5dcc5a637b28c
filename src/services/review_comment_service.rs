use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::auth::{require_owner, Actor, Authorizer, ScopeAuthorizer};
use crate::database::entities::{restaurants, review_comments, reviews};
use crate::errors::{AppError, AppResult};

pub struct NewReviewComment {
    pub review_id: i32,
    pub comment: String,
}

pub struct ReviewCommentPatch {
    pub id: i32,
    pub comment: String,
}

#[derive(Clone)]
pub struct ReviewCommentService {
    db: DatabaseConnection,
}

impl ReviewCommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<review_comments::Model>> {
        Ok(review_comments::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn for_review(&self, review_id: i32) -> AppResult<Option<review_comments::Model>> {
        Ok(review_comments::Entity::find()
            .filter(review_comments::Column::ReviewId.eq(review_id))
            .one(&self.db)
            .await?)
    }

    /// Comment eligibility plus insert: the review must exist, the actor must
    /// own its parent restaurant, and the review must not be answered yet.
    /// Returns the comment together with the parent restaurant id for
    /// notification fan-out.
    pub async fn create(
        &self,
        actor: &Actor,
        input: NewReviewComment,
    ) -> AppResult<(review_comments::Model, i32)> {
        ScopeAuthorizer.authorize(actor, "reviewComment:create:self")?;

        let (review, restaurant) = self.review_with_restaurant(input.review_id).await?;
        require_owner(actor, restaurant.user_id)?;

        if self.for_review(review.id).await?.is_some() {
            return Err(AppError::conflict("Review already has a comment"));
        }

        let comment = review_comments::ActiveModel {
            review_id: Set(review.id),
            comment: Set(input.comment),
            ..review_comments::ActiveModel::new()
        };

        Ok((comment.insert(&self.db).await?, restaurant.id))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        patch: ReviewCommentPatch,
    ) -> AppResult<(review_comments::Model, i32)> {
        let comment = review_comments::Entity::find_by_id(patch.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("ReviewComment", patch.id.to_string()))?;

        let (_, restaurant) = self.review_with_restaurant(comment.review_id).await?;
        require_owner(actor, restaurant.user_id)?;

        let mut comment: review_comments::ActiveModel = comment.into();
        comment.comment = Set(patch.comment);
        let comment = comment.set_updated_at();

        Ok((comment.update(&self.db).await?, restaurant.id))
    }

    pub async fn delete(
        &self,
        actor: &Actor,
        id: i32,
    ) -> AppResult<(review_comments::Model, i32)> {
        let comment = review_comments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::conflict("Review comment is already deleted"))?;

        let (_, restaurant) = self.review_with_restaurant(comment.review_id).await?;
        require_owner(actor, restaurant.user_id)?;

        let result = review_comments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::conflict("Review comment is already deleted"));
        }

        Ok((comment, restaurant.id))
    }

    async fn review_with_restaurant(
        &self,
        review_id: i32,
    ) -> AppResult<(reviews::Model, restaurants::Model)> {
        let review = reviews::Entity::find_by_id(review_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Review", review_id.to_string()))?;

        let restaurant = restaurants::Entity::find_by_id(review.restaurant_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Restaurant", review.restaurant_id.to_string())
            })?;

        Ok((review, restaurant))
    }
}
