mod common;

use alumni_network_backend::dto::profile_dto::UpdateProfileRequest;
use alumni_network_backend::model::user::UserRole;
use alumni_network_backend::service::user_service::UserService;
use alumni_network_backend::util::error::ServiceError;
use alumni_network_backend::util::media::MediaError;
use common::{MockMediaStore, TestApp};
use mockall::predicate::function;
use serde_json::json;

#[tokio::test]
async fn test_blank_username_is_rejected() {
    let app = TestApp::new();
    let err = app.services.user_service.get_public_profile("   ").await.unwrap_err();
    assert_eq!(err, ServiceError::InvalidInput("Username is required".to_string()));
}

#[tokio::test]
async fn test_trailing_space_lookup_prefers_exact_match() {
    let app = TestApp::new();
    app.add_user("jdoe2", UserRole::Egresado).await;
    app.add_user("ajdoe", UserRole::Egresado).await;
    app.add_user("jdoe", UserRole::Egresado).await;

    let profile = app.services.user_service.get_public_profile("Jdoe ").await.unwrap();
    assert_eq!(profile.username, "jdoe");
}

#[tokio::test]
async fn test_stored_trailing_whitespace_is_second_stage() {
    let app = TestApp::new();
    app.add_user("maria  ", UserRole::Egresado).await;
    app.add_user("mariana", UserRole::Egresado).await;

    let profile = app.services.user_service.get_public_profile("MARIA").await.unwrap();
    assert_eq!(profile.username, "maria  ");
}

#[tokio::test]
async fn test_substring_ties_break_by_username() {
    let app = TestApp::new();
    app.add_user("zeta_garcia", UserRole::Egresado).await;
    app.add_user("ana_garcia", UserRole::Egresado).await;

    let profile = app.services.user_service.get_public_profile("garcia").await.unwrap();
    assert_eq!(profile.username, "ana_garcia");
}

#[tokio::test]
async fn test_regex_characters_are_literal() {
    let app = TestApp::new();
    app.add_user("anything", UserRole::Egresado).await;

    let err = app.services.user_service.get_public_profile(".*").await.unwrap_err();
    assert_eq!(err, ServiceError::NotFound("User not found".to_string()));
}

#[tokio::test]
async fn test_profile_is_normalized() {
    let app = TestApp::new();
    app.add_user("ana", UserRole::Egresado).await;

    let profile = app.services.user_service.get_public_profile("ana").await.unwrap();
    assert_eq!(profile.headline, "Egresado");
    assert_eq!(profile.location, "México");
    assert_eq!(profile.role, "egresado");
    assert_eq!(profile.company_info, json!({}));
    assert!(profile.skills.is_empty());
}

#[tokio::test]
async fn test_update_ignores_fields_outside_allow_list() {
    let app = TestApp::with_media(MockMediaStore::new());
    let user = app.add_user("ana", UserRole::Egresado).await;
    let request: UpdateProfileRequest = serde_json::from_value(json!({
        "name": "Ana María",
        "headline": "Ingeniera",
        "skills": ["rust", "sql"],
        "experience": [{ "title": "Dev", "company": "Acme", "startDate": "2020-01-01" }],
        "role": "administrador",
        "email": "hacker@example.mx",
        "isFirstLogin": false
    }))
    .unwrap();

    let profile = app
        .services
        .user_service
        .update_profile(&user.id.unwrap(), request)
        .await
        .unwrap();
    assert_eq!(profile.name, "Ana María");
    assert_eq!(profile.skills, vec!["rust", "sql"]);
    assert_eq!(profile.experience[0].company, "Acme");

    let stored = app.users.stored(&user.id.unwrap()).unwrap();
    assert_eq!(stored.role, UserRole::Egresado);
    assert_eq!(stored.email, "ana@example.mx");
    assert!(stored.is_first_login);
}

#[tokio::test]
async fn test_update_trims_username_and_rejects_empty() {
    let app = TestApp::new();
    let user = app.add_user("ana", UserRole::Egresado).await;
    let service = &app.services.user_service;

    let request = UpdateProfileRequest {
        username: Some("  ana.m  ".to_string()),
        ..Default::default()
    };
    let profile = service.update_profile(&user.id.unwrap(), request).await.unwrap();
    assert_eq!(profile.username, "ana.m");

    let request = UpdateProfileRequest {
        username: Some("   ".to_string()),
        ..Default::default()
    };
    let err = service.update_profile(&user.id.unwrap(), request).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(app.users.stored(&user.id.unwrap()).unwrap().username, "ana.m");
}

#[tokio::test]
async fn test_profile_picture_is_uploaded_to_profiles() {
    let mut media = MockMediaStore::new();
    media
        .expect_store()
        .with(function(|upload: &alumni_network_backend::util::media::MediaUpload| {
            upload.object_name.starts_with("profiles/") && upload.content_type == "image/png"
        }))
        .times(1)
        .returning(|upload| Ok(format!("https://media.test/b/{}", upload.object_name)));
    let app = TestApp::with_media(media);
    let user = app.add_user("ana", UserRole::Egresado).await;

    let request = UpdateProfileRequest {
        profile_picture: Some("data:image/png;base64,aGVsbG8=".to_string()),
        ..Default::default()
    };
    let profile = app
        .services
        .user_service
        .update_profile(&user.id.unwrap(), request)
        .await
        .unwrap();
    assert!(profile.profile_picture.starts_with("https://media.test/b/profiles/"));
}

#[tokio::test]
async fn test_curriculum_is_stored_as_downloadable_pdf() {
    let mut media = MockMediaStore::new();
    media
        .expect_store()
        .with(function(|upload: &alumni_network_backend::util::media::MediaUpload| {
            upload.content_type == "application/pdf"
                && upload.object_name.starts_with("curricula/curriculum_")
                && upload.object_name.ends_with(".pdf")
        }))
        .times(1)
        .returning(|upload| Ok(format!("https://media.test/b/{}", upload.object_name)));
    let app = TestApp::with_media(media);
    let user = app.add_user("ana", UserRole::Egresado).await;

    let request = UpdateProfileRequest {
        curriculum_img: Some("data:application/pdf;base64,JVBERi0=".to_string()),
        ..Default::default()
    };
    let profile = app
        .services
        .user_service
        .update_profile(&user.id.unwrap(), request)
        .await
        .unwrap();
    assert!(profile.curriculum_img.ends_with(".pdf?dl=1"));
    assert!(profile
        .curriculum_img
        .contains(&format!("curriculum_{}_", user.id.unwrap().to_hex())));
}

#[tokio::test]
async fn test_existing_urls_and_empty_values_skip_upload() {
    let mut media = MockMediaStore::new();
    media.expect_store().times(0);
    let app = TestApp::with_media(media);
    let user = app.add_user("ana", UserRole::Egresado).await;

    let request = UpdateProfileRequest {
        profile_picture: Some("https://cdn.example.com/ana.png".to_string()),
        banner_img: Some(String::new()),
        ..Default::default()
    };
    let profile = app
        .services
        .user_service
        .update_profile(&user.id.unwrap(), request)
        .await
        .unwrap();
    assert_eq!(profile.profile_picture, "https://cdn.example.com/ana.png");
    assert_eq!(profile.banner_img, "");
}

#[tokio::test]
async fn test_failed_upload_leaves_profile_untouched() {
    let mut media = MockMediaStore::new();
    media
        .expect_store()
        .returning(|_| Err(MediaError::UploadFailed("bucket offline".to_string())));
    let app = TestApp::with_media(media);
    let user = app.add_user("ana", UserRole::Egresado).await;

    let request = UpdateProfileRequest {
        name: Some("Otro".to_string()),
        banner_img: Some("aGVsbG8=".to_string()),
        ..Default::default()
    };
    let err = app
        .services
        .user_service
        .update_profile(&user.id.unwrap(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InternalError(_)));
    assert_eq!(app.users.stored(&user.id.unwrap()).unwrap().name, "ana Test");
}

#[tokio::test]
async fn test_first_login_setup_rules() {
    let app = TestApp::new();
    let service = &app.services.user_service;
    let graduate = app.add_user("ana", UserRole::Egresado).await;
    let company = app.add_user("acme", UserRole::Empresario).await;

    let err = service
        .complete_first_login_setup(&graduate.id.unwrap(), UserRole::Egresado, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let response = service
        .complete_first_login_setup(
            &company.id.unwrap(),
            UserRole::Empresario,
            Some(json!({ "name": "Acme", "sector": "Software" })),
        )
        .await
        .unwrap();
    assert_eq!(response.message, "Configuración inicial completada exitosamente");
    assert!(!response.user.is_first_login);
    assert_eq!(response.user.company_info["sector"], "Software");

    let err = service
        .complete_first_login_setup(&company.id.unwrap(), UserRole::Empresario, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn test_first_login_setup_for_missing_user() {
    let app = TestApp::new();
    let err = app
        .services
        .user_service
        .complete_first_login_setup(&bson::oid::ObjectId::new(), UserRole::Empresario, None)
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::NotFound("Usuario no encontrado".to_string()));
}

#[tokio::test]
async fn test_suggestions_exclude_self_and_connections() {
    let app = TestApp::new();
    let me = app.add_user("ana", UserRole::Egresado).await;
    let friend = app.add_user("luis", UserRole::Egresado).await;
    app.add_user("sofia", UserRole::Egresado).await;
    app.add_user("pedro", UserRole::Empresario).await;
    app.users
        .users
        .lock()
        .unwrap()
        .iter_mut()
        .find(|u| u.id == me.id)
        .unwrap()
        .connections
        .push(friend.id.unwrap());

    let service = &app.services.user_service;
    let all = service.suggested_connections(&me.id.unwrap(), 50).await.unwrap();
    let names: Vec<_> = all.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(names, vec!["sofia", "pedro"]);

    let limited = service.suggested_connections(&me.id.unwrap(), 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}
