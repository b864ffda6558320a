//! Members repository

use async_trait::async_trait;

use super::{ensure_unreferenced, on_delete_violation, MemoryRepository, Repository};
use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, UpdateMember},
};

#[async_trait]
pub trait MembersStore: Send + Sync {
    async fn members_list(&self) -> AppResult<Vec<Member>>;
    async fn members_get_by_id(&self, id: i32) -> AppResult<Member>;
    async fn members_create(&self, data: &CreateMember) -> AppResult<Member>;
    /// Replace every field of an existing member
    async fn members_update(&self, id: i32, data: &UpdateMember) -> AppResult<Member>;
    async fn members_delete(&self, id: i32) -> AppResult<()>;
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Member {} not found", id))
}

#[async_trait]
impl MembersStore for Repository {
    /// List all members
    async fn members_list(&self) -> AppResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY member_id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get member by ID
    async fn members_get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE member_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Create member
    async fn members_create(&self, data: &CreateMember) -> AppResult<Member> {
        let row = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, phone_number, birth_date, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.birth_date)
        .bind(&data.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update member
    async fn members_update(&self, id: i32, data: &UpdateMember) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET name = $1, email = $2, phone_number = $3, birth_date = $4, address = $5
            WHERE member_id = $6
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone_number)
        .bind(data.birth_date)
        .bind(&data.address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Delete member
    async fn members_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM members WHERE member_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_delete_violation(e, "Member", id))?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl MembersStore for MemoryRepository {
    async fn members_list(&self) -> AppResult<Vec<Member>> {
        let tables = self.tables.read().await;
        Ok(tables.members.rows.values().cloned().collect())
    }

    async fn members_get_by_id(&self, id: i32) -> AppResult<Member> {
        let tables = self.tables.read().await;
        tables.members.get(id).ok_or_else(|| not_found(id))
    }

    async fn members_create(&self, data: &CreateMember) -> AppResult<Member> {
        let mut tables = self.tables.write().await;
        let id = tables.members.next_id();
        let member = Member::from_fields(id, data);
        tables.members.rows.insert(id, member.clone());
        Ok(member)
    }

    async fn members_update(&self, id: i32, data: &UpdateMember) -> AppResult<Member> {
        let mut tables = self.tables.write().await;
        let row = tables.members.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        *row = Member::from_fields(id, data);
        Ok(row.clone())
    }

    async fn members_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.members.rows.contains_key(&id) {
            return Err(not_found(id));
        }
        let referrers = tables.borrows.rows.values().filter(|r| r.member_id == id).count();
        ensure_unreferenced(referrers, "Member", id, "borrow(s)")?;
        tables.members.rows.remove(&id);
        Ok(())
    }
}
