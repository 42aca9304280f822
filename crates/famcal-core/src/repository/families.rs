use crate::error::CoreError;
use crate::models::{Family, FamilyRole, Member};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

#[async_trait]
impl super::FamilyRepository for SqliteRepository {
    async fn add_family(&self, name: String) -> Result<Family, CoreError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("Family name cannot be empty".to_string()));
        }

        let family = Family {
            id: Uuid::now_v7(),
            name,
            created_at: Utc::now(),
        };

        let mut tx = self.pool().begin().await?;
        sqlx::query("INSERT INTO families (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(family.id)
            .bind(&family.name)
            .bind(family.created_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(family)
    }

    async fn find_family_by_id(&self, id: Uuid) -> Result<Option<Family>, CoreError> {
        let family = sqlx::query_as("SELECT * FROM families WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(family)
    }

    async fn find_families(&self) -> Result<Vec<Family>, CoreError> {
        let families = sqlx::query_as("SELECT * FROM families ORDER BY name")
            .fetch_all(self.pool())
            .await?;
        Ok(families)
    }

    async fn add_member(&self, family_id: Uuid, display_name: String, role: FamilyRole) -> Result<Member, CoreError> {
        let display_name = display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(CoreError::InvalidInput("Member name cannot be empty".to_string()));
        }

        let mut tx = self.pool().begin().await?;

        let family: Option<Family> = sqlx::query_as("SELECT * FROM families WHERE id = $1")
            .bind(family_id)
            .fetch_optional(&mut *tx)
            .await?;
        if family.is_none() {
            return Err(CoreError::NotFound(format!("Family with id {} not found", family_id)));
        }

        let member = Member {
            id: Uuid::now_v7(),
            family_id,
            display_name,
            role,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO family_members (id, family_id, display_name, role, created_at)
            VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(member.id)
        .bind(member.family_id)
        .bind(&member.display_name)
        .bind(member.role)
        .bind(member.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation()) {
                CoreError::InvalidInput(format!(
                    "A member named '{}' already exists in this family",
                    member.display_name
                ))
            } else {
                CoreError::Database(e)
            }
        })?;

        tx.commit().await?;
        Ok(member)
    }

    async fn find_member_by_id(&self, id: Uuid) -> Result<Option<Member>, CoreError> {
        let member = sqlx::query_as("SELECT * FROM family_members WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(member)
    }

    async fn find_member_by_name(&self, family_id: Uuid, display_name: &str) -> Result<Option<Member>, CoreError> {
        let member = sqlx::query_as(
            "SELECT * FROM family_members WHERE family_id = $1 AND display_name = $2 COLLATE NOCASE",
        )
        .bind(family_id)
        .bind(display_name)
        .fetch_optional(self.pool())
        .await?;
        Ok(member)
    }

    async fn find_members(&self, family_id: Uuid) -> Result<Vec<Member>, CoreError> {
        let members = sqlx::query_as("SELECT * FROM family_members WHERE family_id = $1 ORDER BY created_at")
            .bind(family_id)
            .fetch_all(self.pool())
            .await?;
        Ok(members)
    }
}

impl SqliteRepository {
    pub(crate) async fn find_member_in_transaction(
        tx: &mut Transaction<'_, Sqlite>,
        id: Uuid,
    ) -> Result<Option<Member>, CoreError> {
        let member = sqlx::query_as("SELECT * FROM family_members WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(member)
    }
}
