use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{blank, CurrentUser};
use crate::models::{Alumno, CreatedId, Mutated};
use crate::{breaks, creates, pass, proceeds, Created, Error, Payload};

pub async fn get_alumnos(Extension(pg): Extension<PgPool>) -> Payload<Vec<Alumno>> {
    let alumnos = sqlx::query_as::<_, Alumno>("SELECT * FROM alumnos ORDER BY id")
        .fetch_all(&pg)
        .await
        .map_err(Error::from)?;
    proceeds(alumnos)
}

pub async fn get_alumno(
    Path(id): Path<i32>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Alumno> {
    let alumno = sqlx::query_as::<_, Alumno>("SELECT * FROM alumnos WHERE id = $1 LIMIT 1")
        .bind(id)
        .fetch_optional(&pg)
        .await
        .map_err(Error::from)?;
    match alumno {
        Some(alumno) => proceeds(alumno),
        None => breaks(Error::not_found("Alumno no encontrado")),
    }
}

pub async fn create_alumno(
    Json(alumno): Json<CreateAlumno>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Created<CreatedId> {
    let missing = alumno.missing_fields();
    if !missing.is_empty() {
        return breaks(Error::MissingFields { fields: missing });
    }

    // accounts created here get a placeholder credential until the
    // student registers properly
    let digest = pass::hash_password(alumno.password.as_deref().unwrap_or("defaultpassword"))?;

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

    log::debug!("alumno {} creado por usuario {}", id, user.id);
    creates(CreatedId {
        id,
        mensaje: "Alumno creado exitosamente",
    })
}

/// Partial update; email and password are deliberately untouchable here.
pub async fn update_alumno(
    Path(id): Path<i32>,
    Json(cambios): Json<UpdateAlumno>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Mutated> {
    let res = sqlx::query(
        "UPDATE alumnos SET
            nombre = COALESCE($2, nombre),
            apellido = COALESCE($3, apellido),
            semestre = COALESCE($4, semestre),
            carrera = COALESCE($5, carrera),
            periodo = COALESCE($6, periodo)
         WHERE id = $1",
    )
    .bind(id)
    .bind(cambios.nombre)
    .bind(cambios.apellido)
    .bind(cambios.semestre)
    .bind(cambios.carrera)
    .bind(cambios.periodo)
    .execute(&pg)
    .await
    .map_err(Error::from)?;

    if res.rows_affected() < 1 {
        return breaks(Error::not_found("Alumno no encontrado"));
    }
    log::debug!("alumno {} actualizado por usuario {}", id, user.id);
    proceeds(Mutated {
        mensaje: "Alumno actualizado exitosamente",
    })
}

pub async fn delete_alumno(
    Path(id): Path<i32>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Mutated> {
    let res = sqlx::query("DELETE FROM alumnos WHERE id = $1")
        .bind(id)
        .execute(&pg)
        .await
        .map_err(Error::from)?;

    if res.rows_affected() < 1 {
        return breaks(Error::not_found("Alumno no encontrado"));
    }
    log::debug!("alumno {} eliminado por usuario {}", id, user.id);
    proceeds(Mutated {
        mensaje: "Alumno eliminado exitosamente",
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlumno {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub semestre: Option<i32>,
    pub carrera: Option<String>,
    pub periodo: Option<String>,
}

impl CreateAlumno {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.nombre) {
            missing.push("nombre");
        }
        if blank(&self.apellido) {
            missing.push("apellido");
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

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAlumno {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub semestre: Option<i32>,
    pub carrera: Option<String>,
    pub periodo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_and_password_are_optional_on_create() {
        let alumno = CreateAlumno {
            nombre: Some("Ana".to_string()),
            apellido: Some("García".to_string()),
            email: None,
            password: None,
            semestre: Some(4),
            carrera: Some("Sistemas".to_string()),
            periodo: Some("2024-1".to_string()),
        };
        assert!(alumno.missing_fields().is_empty());
    }

    #[test]
    fn enrollment_fields_are_required_on_create() {
        let alumno = CreateAlumno {
            nombre: Some("Ana".to_string()),
            apellido: None,
            email: None,
            password: None,
            semestre: None,
            carrera: Some("Sistemas".to_string()),
            periodo: None,
        };
        assert_eq!(
            alumno.missing_fields(),
            vec!["apellido", "semestre", "periodo"]
        );
    }

    #[test]
    fn zero_semestre_counts_as_missing_on_create() {
        let alumno = CreateAlumno {
            nombre: Some("Ana".to_string()),
            apellido: Some("García".to_string()),
            email: None,
            password: None,
            semestre: Some(0),
            carrera: Some("Sistemas".to_string()),
            periodo: Some("2024-1".to_string()),
        };
        assert_eq!(alumno.missing_fields(), vec!["semestre"]);
    }
}
