use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::{Alumno, CreatedId};
use crate::token::TokenKeys;
use crate::{breaks, creates, pass, proceeds, Created, Error, Payload};

pub async fn login(
    Json(login): Json<LoginRequest>,
    Extension(pg): Extension<PgPool>,
    Extension(keys): Extension<TokenKeys>,
) -> Payload<LoggedIn> {
    let email = match login.email.as_deref() {
        Some(email) if !email.is_empty() => email,
        _ => {
            return breaks(Error::InvalidPayload {
                message: "Email y contraseña son requeridos".to_string(),
            })
        }
    };
    let password = match login.password.as_deref() {
        Some(password) if !password.is_empty() => password,
        _ => {
            return breaks(Error::InvalidPayload {
                message: "Email y contraseña son requeridos".to_string(),
            })
        }
    };

    let alumno = sqlx::query_as::<_, Alumno>("SELECT * FROM alumnos WHERE email = $1 LIMIT 1")
        .bind(email)
        .fetch_optional(&pg)
        .await
        .map_err(Error::from)?;

    // an unknown email and a wrong password produce the same response
    let alumno = match alumno {
        Some(alumno) if pass::verify_password(&alumno.password_hash, password) => alumno,
        _ => return breaks(Error::unauthorized("Credenciales inválidas")),
    };

    let token = keys.issue(alumno.id, &alumno.email, Utc::now())?;
    log::debug!("login exitoso para alumno {}", alumno.id);

    proceeds(LoggedIn {
        token,
        user: UserSummary {
            id: alumno.id,
            nombre: alumno.nombre,
            apellido: alumno.apellido,
            email: alumno.email,
        },
        mensaje: "Login exitoso",
    })
}

/// Registration persists the account but does not issue a token; the
/// caller logs in separately afterwards.
pub async fn register(
    Json(alumno): Json<RegisterRequest>,
    Extension(pg): Extension<PgPool>,
) -> Created<CreatedId> {
    let missing = alumno.missing_fields();
    if !missing.is_empty() {
        return breaks(Error::MissingFields { fields: missing });
    }

    let digest = pass::hash_password(alumno.password.as_deref().unwrap_or_default())?;

    // the UNIQUE constraint on email decides duplicates, not a prior SELECT
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO alumnos (nombre, apellido, email, password_hash, semestre, carrera, periodo)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(alumno.nombre.unwrap_or_default())
    .bind(alumno.apellido.unwrap_or_default())
    .bind(alumno.email.unwrap_or_default())
    .bind(digest)
    .bind(alumno.semestre.unwrap_or_default())
    .bind(alumno.carrera.unwrap_or_default())
    .bind(alumno.periodo.unwrap_or_default())
    .fetch_one(&pg)
    .await
    .map_err(Error::from)?;

    creates(CreatedId {
        id,
        mensaje: "Alumno registrado exitosamente",
    })
}

/// Identity of the caller, as asserted by a validated token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i32,
}

/// Middleware guarding the write endpoints: the `Authorization` header
/// carries the raw token (no `Bearer ` prefix). On success the wrapped
/// handler receives the caller as an explicit `Extension<CurrentUser>`.
pub async fn require_token<B: Send>(
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, Error> {
    let keys = req
        .extensions()
        .get::<TokenKeys>()
        .cloned()
        .ok_or_else(|| Error::InternalError {
            kind: "MiddlewareError",
            message: "token keys missing from request extensions".to_string(),
        })?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::unauthorized("Token de acceso requerido"))?;

    let claims = keys.validate(token, Utc::now())?;
    req.extensions_mut().insert(CurrentUser { id: claims.sub });
    Ok(next.run(req).await)
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggedIn {
    pub token: String,
    pub user: UserSummary,
    pub mensaje: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub semestre: Option<i32>,
    pub carrera: Option<String>,
    pub periodo: Option<String>,
}

impl RegisterRequest {
    /// Every absent or empty required field, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.nombre) {
            missing.push("nombre");
        }
        if blank(&self.apellido) {
            missing.push("apellido");
        }
        if blank(&self.email) {
            missing.push("email");
        }
        if blank(&self.password) {
            missing.push("password");
        }
        // a zero semestre counts as absent, like an empty string
        if self.semestre.unwrap_or(0) == 0 {
            missing.push("semestre");
        }
        if blank(&self.carrera) {
            missing.push("carrera");
        }
        if blank(&self.periodo) {
            missing.push("periodo");
        }
        missing
    }
}

pub(crate) fn blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}
