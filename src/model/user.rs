use bson::oid::ObjectId;
use bson::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Egresado,
    Empresario,
    Administrador,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Egresado => "egresado",
            UserRole::Empresario => "empresario",
            UserRole::Administrador => "administrador",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub school: String,
    pub field_of_study: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

fn first_login_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    // Excluded by projection on every read
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    pub profile_picture: Option<String>,
    pub banner_img: Option<String>,
    pub curriculum_img: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub connections: Vec<ObjectId>,
    pub company_info: Option<Document>,
    pub student_id: Option<String>,
    #[serde(default = "first_login_default")]
    pub is_first_login: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    pub fn new(name: &str, username: &str, email: &str, role: UserRole) -> Self {
        User {
            id: None,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: String::new(),
            role,
            profile_picture: None,
            banner_img: None,
            curriculum_img: None,
            headline: None,
            location: None,
            about: None,
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            connections: Vec::new(),
            company_info: None,
            student_id: None,
            is_first_login: true,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Administrador
    }
}

/// Public slice of a user embedded in notifications, posts and suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub headline: String,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Option<Self> {
        Some(UserSummary {
            id: user.id?,
            name: user.name.clone(),
            username: user.username.clone(),
            profile_picture: user.profile_picture.clone().unwrap_or_default(),
            headline: user.headline.clone().unwrap_or_default(),
        })
    }
}
