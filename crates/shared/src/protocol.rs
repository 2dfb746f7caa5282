use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{UserId, ViewId, ViewType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub token: String,
}

impl From<SignInResponse> for UserProfile {
    fn from(value: SignInResponse) -> Self {
        Self {
            id: value.user_id,
            email: value.email,
            name: value.name,
            token: value.token,
        }
    }
}

/// Raw request to create a workspace entry, as produced by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateViewRequest {
    pub belong_to_id: String,
    pub name: String,
    pub description: String,
    /// `None` and `Some("")` are distinct on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub view_type: ViewType,
}

/// Canonical, persist-ready form of [`CreateViewRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateViewParams {
    pub belong_to_id: String,
    pub name: String,
    pub description: String,
    pub thumbnail: String,
    pub view_type: ViewType,
    pub view_data: String,
    pub view_id: ViewId,
}

/// A workspace entry and the subtree it owns.
///
/// Identity is the `id`: two values with the same id compare equal even if
/// their contents have diverged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    pub id: ViewId,
    pub belong_to_id: String,
    pub name: String,
    pub description: String,
    pub view_type: ViewType,
    pub version: i64,
    #[serde(default)]
    pub belongings: RepeatedView,
    pub modified_time: DateTime<Utc>,
    pub create_time: DateTime<Utc>,
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for View {}

impl Hash for View {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedView {
    pub items: Vec<View>,
}

impl RepeatedView {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, View> {
        self.items.iter()
    }
}

impl From<Vec<View>> for RepeatedView {
    fn from(items: Vec<View>) -> Self {
        Self { items }
    }
}

impl IntoIterator for RepeatedView {
    type Item = View;
    type IntoIter = std::vec::IntoIter<View>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RepeatedView {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
