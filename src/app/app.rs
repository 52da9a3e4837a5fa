use crate::config::{AppConfig, JwtConfig, MinioConfig, MongoConfig};
use crate::handler::fallback_handler::{spa_fallback_handler, FallbackState};
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::mongo::connect_database;
use crate::repository::notification_repo::{MongoNotificationRepository, NotificationRepository};
use crate::repository::post_repo::{MongoPostRepository, PostRepository};
use crate::repository::project_repo::{MongoProjectRepository, ProjectRepository};
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::notification_router::notification_router;
use crate::router::post_router::post_router;
use crate::router::user_router::user_router;
use crate::service::cleanup_service::CleanupService;
use crate::service::notification_service::NotificationServiceImpl;
use crate::service::post_service::PostServiceImpl;
use crate::service::user_service::UserServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::media::MediaStore;
use crate::util::minio::MinioService;
use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Repositories and collaborators every service is built from.
pub struct AppDependencies {
    pub user_repo: Arc<dyn UserRepository>,
    pub post_repo: Arc<dyn PostRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub media_store: Arc<dyn MediaStore>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

pub struct AppServices {
    pub notification_service: Arc<NotificationServiceImpl>,
    pub user_service: Arc<UserServiceImpl>,
    pub post_service: Arc<PostServiceImpl>,
    pub auth_state: Arc<AuthState>,
    pub fallback_state: Arc<FallbackState>,
    pub max_body_bytes: usize,
}

impl AppServices {
    pub fn new(deps: AppDependencies, config: &AppConfig) -> Self {
        let notification_service = Arc::new(NotificationServiceImpl::new(
            deps.notification_repo.clone(),
            deps.user_repo.clone(),
            deps.post_repo.clone(),
        ));
        let user_service = Arc::new(UserServiceImpl::new(
            deps.user_repo.clone(),
            deps.media_store.clone(),
        ));
        let post_service = Arc::new(PostServiceImpl::new(
            deps.post_repo.clone(),
            deps.user_repo.clone(),
            notification_service.clone(),
            deps.media_store.clone(),
        ));
        let auth_state = Arc::new(AuthState {
            jwt_utils: deps.jwt_utils.clone(),
            user_repo: deps.user_repo.clone(),
            cookie_name: config.auth_cookie_name.clone(),
        });
        let fallback_state = Arc::new(FallbackState {
            frontend_dist: config.frontend_dist.clone(),
        });

        AppServices {
            notification_service,
            user_service,
            post_service,
            auth_state,
            fallback_state,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// API under `/api/v1`, `/health`, and the localized SPA fallback.
pub fn create_router(services: &AppServices) -> Router {
    let api = Router::new()
        .merge(notification_router(
            services.notification_service.clone(),
            services.auth_state.clone(),
        ))
        .merge(user_router(services.user_service.clone(), services.auth_state.clone()))
        .merge(post_router(services.post_service.clone(), services.auth_state.clone()))
        .layer(DefaultBodyLimit::max(services.max_body_bytes));

    let fallback = Router::new()
        .fallback(spa_fallback_handler)
        .with_state(services.fallback_state.clone());

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(fallback)
}

pub struct App {
    config: AppConfig,
    router: Router,
    cleanup: Arc<CleanupService>,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let minio_config = MinioConfig::from_env()?;

        let db = connect_database(&mongo_config).await?;
        let media_store = Arc::new(MinioService::new(minio_config).await?);
        let project_repo: Arc<dyn ProjectRepository> = Arc::new(MongoProjectRepository::new(&db));

        let deps = AppDependencies {
            user_repo: Arc::new(MongoUserRepository::new(&db)),
            post_repo: Arc::new(MongoPostRepository::new(&db)),
            notification_repo: Arc::new(MongoNotificationRepository::new(&db)),
            media_store,
            jwt_utils: Arc::new(JwtTokenUtilsImpl::new(jwt_config)),
        };
        let services = AppServices::new(deps, &config);
        let router = create_router(&services);

        Ok(App {
            config,
            router,
            cleanup: Arc::new(CleanupService::new(project_repo)),
        })
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        if self.config.cleanup_enabled {
            self.cleanup.clone().spawn(self.config.cleanup_period());
        } else {
            info!("Project cleanup disabled");
        }

        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
