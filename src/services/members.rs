//! Member management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::member::{CreateMember, Member, UpdateMember},
    repository::DynStore,
};

#[derive(Clone)]
pub struct MembersService {
    store: DynStore,
}

impl MembersService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.store.members_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        self.store.members_get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateMember) -> AppResult<Member> {
        data.validate()?;
        let member = self.store.members_create(data).await?;
        tracing::info!(member_id = member.member_id, "Member created");
        Ok(member)
    }

    pub async fn update(&self, id: i32, data: &UpdateMember) -> AppResult<Member> {
        data.validate()?;
        self.store.members_update(id, data).await
    }

    /// Delete a member with no borrow history
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.members_delete(id).await?;
        tracing::info!(member_id = id, "Member deleted");
        Ok(())
    }
}
