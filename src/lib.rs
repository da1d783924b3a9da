mod admin_tasks;
mod auth;
mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use admin_tasks::{BootstrapAdminResult, bootstrap_admin};
pub use config::Config;

use crate::auth::role::RoleAuthorizer;
use crate::auth::session::SessionManager;
use crate::auth::token::TokenCodec;
use crate::database::postgres_repository::Repo;
use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=info,coursework::routes=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // try_init: tests build many rockets in one process.
    let _ = if json_format { subscriber.json().try_init() } else { subscriber.try_init() };
}

fn rocket_profile() -> String {
    std::env::var("ROCKET_PROFILE").unwrap_or_else(|_| "debug".to_string())
}

fn build_token_codec(auth_config: &config::AuthConfig, profile: &str) -> TokenCodec {
    if !auth_config.token_secret.is_empty() {
        return TokenCodec::from_secret(&auth_config.token_secret);
    }

    if profile != "debug" {
        panic!(
            "auth.token_secret is required for profile '{}'. Set COURSEWORK_AUTH__TOKEN_SECRET, e.g. from: openssl rand -base64 32",
            profile
        );
    }

    warn!("auth.token_secret is not set; using a per-process key, sessions will not survive a restart");
    TokenCodec::ephemeral()
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options, Method::Head]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Authorization", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

fn get_swagger_config(openapi_url: &str) -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: openapi_url.to_string(),
        ..Default::default()
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
    openapi: rocket_okapi::okapi::openapi3::OpenApi,
}

fn collect_route_specs() -> Vec<RouteSpec> {
    let (health_routes, health_openapi) = app_routes::health::routes();
    let (auth_routes, auth_openapi) = app_routes::auth::routes();
    let (user_routes, user_openapi) = app_routes::user::routes();
    let (admin_routes, admin_openapi) = app_routes::admin::routes();
    let (department_routes, department_openapi) = app_routes::department::routes();
    let (course_routes, course_openapi) = app_routes::course::routes();
    let (assignment_routes, assignment_openapi) = app_routes::assignment::routes();
    let (submission_routes, submission_openapi) = app_routes::submission::routes();

    vec![
        RouteSpec {
            path: "/health",
            routes: health_routes,
            openapi: health_openapi,
        },
        RouteSpec {
            path: "/auth",
            routes: auth_routes,
            openapi: auth_openapi,
        },
        RouteSpec {
            path: "/users",
            routes: user_routes,
            openapi: user_openapi,
        },
        RouteSpec {
            path: "/admin",
            routes: admin_routes,
            openapi: admin_openapi,
        },
        RouteSpec {
            path: "/departments",
            routes: department_routes,
            openapi: department_openapi,
        },
        RouteSpec {
            path: "/courses",
            routes: course_routes,
            openapi: course_openapi,
        },
        RouteSpec {
            path: "/assignments",
            routes: assignment_routes,
            openapi: assignment_openapi,
        },
        RouteSpec {
            path: "/submissions",
            routes: submission_routes,
            openapi: submission_openapi,
        },
    ]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Rocket<Build> {
    let route_specs = collect_route_specs();

    if enable_swagger {
        let mut openapi_list = Vec::new();
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
            openapi_list.push((spec.path, spec.openapi));
        }

        let openapi_docs = match marge_spec_list(&openapi_list) {
            Ok(docs) => docs,
            Err(err) => panic!("Could not merge OpenAPI spec: {}", err),
        };

        let settings = rocket_okapi::settings::OpenApiSettings::default();
        rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

        let docs_path = join_base_path(base_path, "docs");
        let openapi_url = join_base_path(base_path, "openapi.json");
        rocket = rocket.mount(docs_path, make_swagger_ui(&get_swagger_config(&openapi_url)));
    } else {
        for spec in route_specs {
            rocket = rocket.mount(join_base_path(base_path, spec.path), spec.routes);
        }
    }

    rocket
}

/// Everything but the repository: tracing, auth state, CORS, routes and catchers.
fn assemble(config: &Config, rocket: Rocket<Build>) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let codec = build_token_codec(&config.auth, &rocket_profile());
    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");
    let base_path = normalize_base_path(&config.api.base_path);

    let rocket = rocket
        .manage(SessionManager::new(codec, config.auth.token_ttl_hours))
        .manage(RoleAuthorizer::new(&config.auth.admin_email))
        .attach(cors)
        .attach(RequestLogger);

    mount_api_routes(rocket, &base_path, config.api.enable_swagger).register(
        base_path.as_str(),
        catchers![
            app_routes::error::bad_request,
            app_routes::error::unauthorized,
            app_routes::error::forbidden,
            app_routes::error::not_found,
            app_routes::error::conflict,
            app_routes::error::unprocessable,
            app_routes::error::internal,
            app_routes::error::default,
        ],
    )
}

fn figment_for(config: &Config) -> rocket::figment::Figment {
    rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port))
}

/// Rocket backed by Postgres; the pool is created (and migrations run) on ignition.
pub fn build_rocket(config: Config) -> Rocket<Build> {
    let rocket = rocket::custom(figment_for(&config)).attach(stage_db(config.database.clone()));
    assemble(&config, rocket)
}

/// Rocket backed by an already constructed repository.
pub fn build_rocket_with_repository(config: Config, repository: Repo) -> Rocket<Build> {
    let rocket = rocket::custom(figment_for(&config)).manage(repository);
    assemble(&config, rocket)
}
