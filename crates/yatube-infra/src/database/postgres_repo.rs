//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use yatube_core::domain::{Group, GroupId, NewPost, Post, PostId, User, UserId};
use yatube_core::error::RepoError;
use yatube_core::ports::{GroupRepository, PostFilter, PostRepository, UserRepository};

use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_group::{self, Entity as PostGroupEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[GroupId]) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
///
/// Post rows and their `post_groups` links are written in one transaction.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn filtered(filter: PostFilter) -> Select<PostEntity> {
        let query = PostEntity::find();
        match filter {
            PostFilter::All => query,
            PostFilter::Author(id) => query.filter(post::Column::AuthorId.eq(id)),
            PostFilter::Group(id) => query.filter(post::Column::GroupId.eq(id)),
        }
    }

    async fn with_secondary_groups(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<PostId> = models.iter().map(|m| m.id).collect();
        let links = PostGroupEntity::find()
            .filter(post_group::Column::PostId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let mut by_post: HashMap<PostId, Vec<Uuid>> = HashMap::new();
        for link in links {
            by_post.entry(link.post_id).or_default().push(link.group_id);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let groups = by_post.remove(&m.id).unwrap_or_default();
                m.into_domain(groups)
            })
            .collect())
    }

    async fn replace_links<C>(conn: &C, post_id: PostId, groups: &[GroupId]) -> Result<(), RepoError>
    where
        C: ConnectionTrait,
    {
        PostGroupEntity::delete_many()
            .filter(post_group::Column::PostId.eq(post_id))
            .exec(conn)
            .await
            .map_err(query_error)?;

        if groups.is_empty() {
            return Ok(());
        }

        let links = groups.iter().map(|group_id| post_group::ActiveModel {
            post_id: Set(post_id),
            group_id: Set(*group_id),
        });
        PostGroupEntity::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(write_error)?;

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        Ok(self.with_secondary_groups(vec![model]).await?.pop())
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = post::ActiveModel {
            id: NotSet,
            text: Set(new_post.text),
            pub_date: Set(new_post.pub_date.into()),
            author_id: Set(new_post.author_id),
            group_id: Set(new_post.group_id),
        }
        .insert(&txn)
        .await
        .map_err(write_error)?;

        Self::replace_links(&txn, model.id, &new_post.groups).await?;
        txn.commit().await.map_err(query_error)?;

        tracing::debug!(post_id = model.id, "Post created");
        Ok(model.into_domain(new_post.groups))
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = post::ActiveModel {
            id: Set(post.id),
            text: Set(post.text),
            group_id: Set(post.group_id),
            pub_date: NotSet,
            author_id: NotSet,
        }
        .update(&txn)
        .await
        .map_err(write_error)?;

        Self::replace_links(&txn, model.id, &post.groups).await?;
        txn.commit().await.map_err(query_error)?;

        Ok(model.into_domain(post.groups))
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let models = Self::filtered(filter)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_secondary_groups(models).await
    }
}
