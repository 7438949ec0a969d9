use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error taxonomy for the whole HTTP surface. Every variant maps to one
/// contractual status code and a `{"error": ...}` JSON body.
#[derive(Debug, Clone)]
pub enum Error {
    MissingFields { fields: Vec<&'static str> },
    InvalidPayload { message: String },
    DuplicateEmail,
    NotFound { message: String },
    Unauthorized { message: String },
    InternalError { kind: &'static str, message: String },
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingFields { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::MissingFields { fields } => {
                format!("Campos requeridos: {}", fields.join(", "))
            }
            Error::InvalidPayload { message } => message.clone(),
            Error::DuplicateEmail => "El email ya está registrado".to_string(),
            Error::NotFound { message } => message.clone(),
            Error::Unauthorized { message } => message.clone(),
            Error::InternalError { kind, message } => format!("{}: {}", kind, message),
        }
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Error {
        Error::NotFound {
            message: msg.into(),
        }
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Error {
        Error::Unauthorized {
            message: msg.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::InternalError { kind, ref message } = self {
            log::error!("{}: {}", kind, message);
        }
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            // SQLSTATE 23505: unique constraint violation
            if db.code().as_deref() == Some("23505") {
                return Error::DuplicateEmail;
            }
        }
        Error::InternalError {
            kind: "DatabaseError",
            message: err.to_string(),
        }
    }
}

impl From<pbkdf2::password_hash::Error> for Error {
    fn from(err: pbkdf2::password_hash::Error) -> Self {
        Error::InternalError {
            kind: "PasswordHashError",
            message: err.to_string(),
        }
    }
}

pub async fn handler404(path: Uri) -> Response {
    Error::not_found(format!("Ruta inválida: {}", path)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        let cases = [
            (
                Error::MissingFields {
                    fields: vec!["email"],
                },
                StatusCode::BAD_REQUEST,
            ),
            (Error::DuplicateEmail, StatusCode::BAD_REQUEST),
            (
                Error::not_found("Alumno no encontrado"),
                StatusCode::NOT_FOUND,
            ),
            (
                Error::unauthorized("Token inválido"),
                StatusCode::UNAUTHORIZED,
            ),
            (
                Error::InternalError {
                    kind: "DatabaseError",
                    message: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn missing_fields_lists_every_field() {
        let err = Error::MissingFields {
            fields: vec!["nombre", "email", "password"],
        };
        assert_eq!(err.message(), "Campos requeridos: nombre, email, password");
    }

    #[test]
    fn row_not_found_is_not_a_duplicate() {
        let err: Error = Error::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::InternalError { .. }));
    }

    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "database error with code {}", self.0)
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(std::borrow::Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_maps_to_duplicate_email() {
        let err: Error = Error::from(sqlx::Error::Database(Box::new(StubDbError("23505"))));
        assert!(matches!(err, Error::DuplicateEmail));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "El email ya está registrado");
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err: Error = Error::from(sqlx::Error::Database(Box::new(StubDbError("23502"))));
        assert!(matches!(err, Error::InternalError { .. }));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
