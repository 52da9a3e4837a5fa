use crate::client::route_config::get_public_path;
use crate::model::timestamp_now;
use crate::model::user::UserRole;
use serde::{Deserialize, Serialize};

const UNKNOWN_USER: &str = "Usuario desconocido";
const DEFAULT_AVATAR: &str = "/avatar.png";

/// A user as embedded in post and comment payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub headline: String,
}

impl AuthorView {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_USER
        } else {
            &self.name
        }
    }

    pub fn avatar(&self) -> &str {
        if self.profile_picture.is_empty() {
            DEFAULT_AVATAR
        } else {
            &self.profile_picture
        }
    }

    /// Public (localized) link to the user's profile.
    pub fn profile_link(&self) -> String {
        let username = if self.username.is_empty() { "unknown" } else { &self.username };
        get_public_path(&format!("/profile/{}", username))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub user: Option<AuthorView>,
    pub created_at: Option<String>,
}

/// A post as received from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub author: Option<AuthorView>,
    #[serde(default)]
    pub content: String,
    pub image: Option<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<CommentView>,
    pub created_at: Option<String>,
}

/// The signed-in user looking at a post.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub id: String,
    pub name: String,
    pub profile_picture: String,
    pub role: UserRole,
}

/// Local view model for one post: server data plus the optimistic comment list.
#[derive(Debug, Clone)]
pub struct PostView {
    post: PostData,
    author: AuthorView,
    comments: Vec<CommentView>,
    draft: String,
}

impl PostView {
    /// Posts without an author are not rendered.
    pub fn new(post: PostData) -> Option<Self> {
        let author = post.author.clone()?;
        let comments = post.comments.clone();
        Some(PostView {
            post,
            author,
            comments,
            draft: String::new(),
        })
    }

    pub fn post(&self) -> &PostData {
        &self.post
    }

    pub fn author(&self) -> &AuthorView {
        &self.author
    }

    pub fn comments(&self) -> &[CommentView] {
        &self.comments
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_liked_by(&self, viewer_id: &str) -> bool {
        self.post.likes.iter().any(|id| id == viewer_id)
    }

    pub fn like_label(&self) -> String {
        format!("Votos positivos ({})", self.post.likes.len())
    }

    /// Counts the local list, so optimistic comments show up immediately.
    pub fn comment_label(&self) -> String {
        format!("Comentarios ({})", self.comments.len())
    }

    pub fn permissions(&self, viewer: &Viewer) -> PostPermissions {
        PostPermissions::for_viewer(self, viewer)
    }

    /// Appends `text` as the viewer's comment and clears the draft.
    ///
    /// Blank text is ignored. The server request is sent separately and a
    /// failure there does not remove the local entry.
    pub fn append_optimistic_comment(&mut self, viewer: &Viewer, text: &str) -> Option<CommentView> {
        if text.trim().is_empty() {
            return None;
        }
        let comment = CommentView {
            id: None,
            content: text.to_string(),
            user: Some(AuthorView {
                id: viewer.id.clone(),
                name: viewer.name.clone(),
                username: String::new(),
                profile_picture: viewer.profile_picture.clone(),
                headline: String::new(),
            }),
            created_at: Some(timestamp_now()),
        };
        self.comments.push(comment.clone());
        self.draft.clear();
        Some(comment)
    }
}

/// What a viewer may do with a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPermissions {
    pub is_owner: bool,
    pub is_admin: bool,
    pub can_delete: bool,
    /// Shown when an administrator acts on someone else's post
    pub shows_admin_badge: bool,
}

impl PostPermissions {
    pub fn for_viewer(post: &PostView, viewer: &Viewer) -> Self {
        let is_owner = post.author().id == viewer.id;
        let is_admin = viewer.role == UserRole::Administrador;
        PostPermissions {
            is_owner,
            is_admin,
            can_delete: is_owner || is_admin,
            shows_admin_badge: is_admin && !is_owner,
        }
    }

    pub fn delete_prompt(&self, post: &PostView) -> String {
        if self.shows_admin_badge {
            format!(
                "¿Estás seguro de que quieres eliminar este post de {}? Esta acción no se puede deshacer.",
                post.author().name
            )
        } else {
            "¿Estás seguro de que quieres borrar este post?".to_string()
        }
    }

    pub fn delete_button_title(&self) -> &'static str {
        if self.shows_admin_badge {
            "Eliminar post como administrador"
        } else {
            "Eliminar tu post"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_json(author: serde_json::Value) -> PostData {
        serde_json::from_value(json!({
            "_id": "p1",
            "author": author,
            "content": "Hola egresados",
            "image": null,
            "likes": ["u2"],
            "comments": [
                { "_id": "c1", "content": "Saludos", "user": { "_id": "u2", "name": "Luis" }, "createdAt": "2024-01-01T00:00:00.000Z" }
            ],
            "createdAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap()
    }

    fn author() -> serde_json::Value {
        json!({ "_id": "u1", "name": "Ana", "username": "ana", "profilePicture": "", "headline": "" })
    }

    fn viewer(id: &str, role: UserRole) -> Viewer {
        Viewer {
            id: id.to_string(),
            name: "Viewer".to_string(),
            profile_picture: String::new(),
            role,
        }
    }

    #[test]
    fn test_post_without_author_is_not_rendered() {
        assert!(PostView::new(post_json(serde_json::Value::Null)).is_none());
    }

    #[test]
    fn test_owner_permissions() {
        let view = PostView::new(post_json(author())).unwrap();
        let perms = view.permissions(&viewer("u1", UserRole::Egresado));
        assert!(perms.is_owner && perms.can_delete);
        assert!(!perms.shows_admin_badge);
        assert_eq!(perms.delete_prompt(&view), "¿Estás seguro de que quieres borrar este post?");
        assert_eq!(perms.delete_button_title(), "Eliminar tu post");
    }

    #[test]
    fn test_admin_on_foreign_post() {
        let view = PostView::new(post_json(author())).unwrap();
        let perms = view.permissions(&viewer("u9", UserRole::Administrador));
        assert!(perms.can_delete && perms.shows_admin_badge);
        assert!(perms.delete_prompt(&view).contains("este post de Ana?"));
    }

    #[test]
    fn test_admin_on_own_post_has_no_badge() {
        let view = PostView::new(post_json(author())).unwrap();
        let perms = view.permissions(&viewer("u1", UserRole::Administrador));
        assert!(perms.is_owner && perms.is_admin && !perms.shows_admin_badge);
    }

    #[test]
    fn test_other_user_cannot_delete() {
        let view = PostView::new(post_json(author())).unwrap();
        let perms = view.permissions(&viewer("u3", UserRole::Empresario));
        assert!(!perms.can_delete);
    }

    #[test]
    fn test_optimistic_comment() {
        let mut view = PostView::new(post_json(author())).unwrap();
        let me = viewer("u3", UserRole::Egresado);
        view.set_draft("Felicidades");

        let comment = view.append_optimistic_comment(&me, "Felicidades").unwrap();
        assert_eq!(comment.user.as_ref().unwrap().id, "u3");
        assert_eq!(view.comments().len(), 2);
        assert_eq!(view.draft(), "");
        assert_eq!(view.comment_label(), "Comentarios (2)");
        // server copy is untouched
        assert_eq!(view.post().comments.len(), 1);
    }

    #[test]
    fn test_blank_comment_is_ignored() {
        let mut view = PostView::new(post_json(author())).unwrap();
        view.set_draft("   ");
        assert!(view.append_optimistic_comment(&viewer("u3", UserRole::Egresado), "   ").is_none());
        assert_eq!(view.comments().len(), 1);
        assert_eq!(view.draft(), "   ");
    }

    #[test]
    fn test_labels_and_likes() {
        let view = PostView::new(post_json(author())).unwrap();
        assert!(view.is_liked_by("u2"));
        assert!(!view.is_liked_by("u1"));
        assert_eq!(view.like_label(), "Votos positivos (1)");
        assert_eq!(view.author().profile_link(), "/perfil/ana");
    }

    #[test]
    fn test_author_fallbacks() {
        let anonymous = AuthorView {
            id: "x".to_string(),
            name: String::new(),
            username: String::new(),
            profile_picture: String::new(),
            headline: String::new(),
        };
        assert_eq!(anonymous.display_name(), "Usuario desconocido");
        assert_eq!(anonymous.avatar(), "/avatar.png");
        assert_eq!(anonymous.profile_link(), "/perfil/unknown");
    }
}
