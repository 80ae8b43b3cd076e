//! Tenant-partitioned school data.
//!
//! Every operation takes the tenant id of the request context; there is no
//! way to read or write across partitions.

use std::collections::HashMap;
use std::sync::Arc;

use orchestrator_core::school::assignment::Assignment;
use orchestrator_core::school::class::Class;
use orchestrator_core::school::student::Student;
use orchestrator_core::tenant::TenantId;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
struct TenantData {
    students: HashMap<Uuid, Student>,
    classes: HashMap<Uuid, Class>,
    assignments: HashMap<Uuid, Assignment>,
}

#[derive(Debug, Clone, Default)]
pub struct SchoolStore {
    tenants: Arc<RwLock<HashMap<TenantId, TenantData>>>,
}

fn sorted_by<T: Clone, K: Ord>(items: &HashMap<Uuid, T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.values().cloned().collect();
    items.sort_by_key(|item| key(item));
    items
}

impl SchoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self))]
    pub async fn list_students(&self, tenant_id: &TenantId) -> Vec<Student> {
        let tenants = self.tenants.read().await;
        tenants
            .get(tenant_id)
            .map(|data| sorted_by(&data.students, |s| (s.created_at, s.id)))
            .unwrap_or_default()
    }

    pub async fn add_student(&self, student: Student) -> anyhow::Result<Student> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(student.tenant_id.clone())
            .or_default()
            .students
            .insert(student.id, student.clone());
        Ok(student)
    }

    #[instrument(skip(self))]
    pub async fn list_classes(&self, tenant_id: &TenantId) -> Vec<Class> {
        let tenants = self.tenants.read().await;
        tenants
            .get(tenant_id)
            .map(|data| sorted_by(&data.classes, |c| (c.created_at, c.id)))
            .unwrap_or_default()
    }

    pub async fn add_class(&self, class: Class) -> anyhow::Result<Class> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(class.tenant_id.clone())
            .or_default()
            .classes
            .insert(class.id, class.clone());
        Ok(class)
    }

    pub async fn get_class(&self, tenant_id: &TenantId, id: Uuid) -> Option<Class> {
        let tenants = self.tenants.read().await;
        tenants
            .get(tenant_id)
            .and_then(|data| data.classes.get(&id))
            .cloned()
    }

    #[instrument(skip(self))]
    pub async fn list_assignments(&self, tenant_id: &TenantId) -> Vec<Assignment> {
        let tenants = self.tenants.read().await;
        tenants
            .get(tenant_id)
            .map(|data| sorted_by(&data.assignments, |a| (a.created_at, a.id)))
            .unwrap_or_default()
    }

    pub async fn get_assignment(&self, tenant_id: &TenantId, id: Uuid) -> Option<Assignment> {
        let tenants = self.tenants.read().await;
        tenants
            .get(tenant_id)
            .and_then(|data| data.assignments.get(&id))
            .cloned()
    }

    /// Insert or replace an assignment in its own tenant's partition.
    pub async fn save_assignment(&self, assignment: Assignment) -> anyhow::Result<Assignment> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(assignment.tenant_id.clone())
            .or_default()
            .assignments
            .insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    /// Replace an existing assignment. Fails when it was removed in the
    /// meantime instead of recreating it.
    pub async fn update_assignment(&self, assignment: Assignment) -> anyhow::Result<Assignment> {
        let mut tenants = self.tenants.write().await;
        let slot = tenants
            .get_mut(&assignment.tenant_id)
            .and_then(|data| data.assignments.get_mut(&assignment.id))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Assignment {} no longer exists in tenant {}",
                    assignment.id,
                    assignment.tenant_id
                )
            })?;
        *slot = assignment.clone();
        Ok(assignment)
    }

    pub async fn remove_assignment(
        &self,
        tenant_id: &TenantId,
        id: Uuid,
    ) -> anyhow::Result<Option<Assignment>> {
        let mut tenants = self.tenants.write().await;
        Ok(tenants
            .get_mut(tenant_id)
            .and_then(|data| data.assignments.remove(&id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::identity::UserId;
    use orchestrator_core::school::assignment::CreateAssignmentRequest;
    use orchestrator_core::school::class::CreateClassRequest;

    fn assignment(tenant: &str, title: &str) -> Assignment {
        CreateAssignmentRequest {
            tenant_id: None,
            title: title.to_string(),
            description: None,
            class_id: None,
            due_at: None,
        }
        .into_assignment(TenantId::new(tenant), UserId::new("u-1"))
    }

    #[tokio::test]
    async fn test_partitions_are_isolated() {
        let store = SchoolStore::new();
        let a = store.save_assignment(assignment("tenant-a", "Algèbre")).await.unwrap();
        store.save_assignment(assignment("tenant-b", "Géométrie")).await.unwrap();

        let tenant_a = TenantId::new("tenant-a");
        let tenant_b = TenantId::new("tenant-b");

        assert_eq!(store.list_assignments(&tenant_a).await.len(), 1);
        assert!(store.get_assignment(&tenant_a, a.id).await.is_some());
        assert!(store.get_assignment(&tenant_b, a.id).await.is_none());
        assert!(store
            .remove_assignment(&tenant_b, a.id)
            .await
            .unwrap()
            .is_none());
        assert!(store.get_assignment(&tenant_a, a.id).await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_tenant_has_no_data() {
        let store = SchoolStore::new();
        let nowhere = TenantId::new("nowhere");
        assert!(store.list_students(&nowhere).await.is_empty());
        assert!(store.list_classes(&nowhere).await.is_empty());
        assert!(store.list_assignments(&nowhere).await.is_empty());
    }

    #[tokio::test]
    async fn test_classes_are_only_found_in_their_tenant() {
        let store = SchoolStore::new();
        let class = store
            .add_class(
                CreateClassRequest {
                    tenant_id: None,
                    name: "6e A".to_string(),
                    level: "6e".to_string(),
                    teacher_id: None,
                }
                .into_class(TenantId::new("tenant-b")),
            )
            .await
            .unwrap();

        assert!(store.get_class(&TenantId::new("tenant-b"), class.id).await.is_some());
        assert!(store.get_class(&TenantId::new("tenant-a"), class.id).await.is_none());
    }

    #[tokio::test]
    async fn test_update_does_not_recreate_a_removed_assignment() {
        let store = SchoolStore::new();
        let saved = store.save_assignment(assignment("tenant-a", "Lecture")).await.unwrap();
        store.remove_assignment(&saved.tenant_id, saved.id).await.unwrap();

        assert!(store.update_assignment(saved.clone()).await.is_err());
        assert!(store.get_assignment(&saved.tenant_id, saved.id).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_returns_the_deleted_assignment() {
        let store = SchoolStore::new();
        let saved = store.save_assignment(assignment("tenant-a", "Lecture")).await.unwrap();
        let removed = store
            .remove_assignment(&saved.tenant_id, saved.id)
            .await
            .unwrap();
        assert_eq!(removed.map(|a| a.id), Some(saved.id));
        assert!(store.list_assignments(&saved.tenant_id).await.is_empty());
    }
}
