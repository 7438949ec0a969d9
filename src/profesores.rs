use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{blank, CurrentUser};
use crate::models::{CreatedId, Mutated, Profesor};
use crate::{breaks, creates, proceeds, Created, Error, Payload};

pub async fn get_profesores(Extension(pg): Extension<PgPool>) -> Payload<Vec<Profesor>> {
    let profesores = sqlx::query_as::<_, Profesor>("SELECT * FROM profesores ORDER BY id")
        .fetch_all(&pg)
        .await
        .map_err(Error::from)?;
    proceeds(profesores)
}

pub async fn get_profesor(
    Path(id): Path<i32>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Profesor> {
    let profesor = sqlx::query_as::<_, Profesor>("SELECT * FROM profesores WHERE id = $1 LIMIT 1")
        .bind(id)
        .fetch_optional(&pg)
        .await
        .map_err(Error::from)?;
    match profesor {
        Some(profesor) => proceeds(profesor),
        None => breaks(Error::not_found("Profesor no encontrado")),
    }
}

pub async fn create_profesor(
    Json(profesor): Json<CreateProfesor>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Created<CreatedId> {
    let missing = profesor.missing_fields();
    if !missing.is_empty() {
        return breaks(Error::MissingFields { fields: missing });
    }

    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO profesores (nombre, apellido, email, especialidad, departamento, telefono)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(profesor.nombre.unwrap_or_default())
    .bind(profesor.apellido.unwrap_or_default())
    .bind(profesor.email.unwrap_or_default())
    .bind(profesor.especialidad.unwrap_or_default())
    .bind(profesor.departamento.unwrap_or_default())
    .bind(profesor.telefono)
    .fetch_one(&pg)
    .await
    .map_err(Error::from)?;

    log::debug!("profesor {} creado por usuario {}", id, user.id);
    creates(CreatedId {
        id,
        mensaje: "Profesor creado exitosamente",
    })
}

/// Partial update; unlike alumnos, the email may change here and can
/// therefore collide with another profesor's.
pub async fn update_profesor(
    Path(id): Path<i32>,
    Json(cambios): Json<UpdateProfesor>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Mutated> {
    let res = sqlx::query(
        "UPDATE profesores SET
            nombre = COALESCE($2, nombre),
            apellido = COALESCE($3, apellido),
            email = COALESCE($4, email),
            especialidad = COALESCE($5, especialidad),
            departamento = COALESCE($6, departamento),
            telefono = COALESCE($7, telefono)
         WHERE id = $1",
    )
    .bind(id)
    .bind(cambios.nombre)
    .bind(cambios.apellido)
    .bind(cambios.email)
    .bind(cambios.especialidad)
    .bind(cambios.departamento)
    .bind(cambios.telefono)
    .execute(&pg)
    .await
    .map_err(Error::from)?;

    if res.rows_affected() < 1 {
        return breaks(Error::not_found("Profesor no encontrado"));
    }
    log::debug!("profesor {} actualizado por usuario {}", id, user.id);
    proceeds(Mutated {
        mensaje: "Profesor actualizado exitosamente",
    })
}

pub async fn delete_profesor(
    Path(id): Path<i32>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Mutated> {
    let res = sqlx::query("DELETE FROM profesores WHERE id = $1")
        .bind(id)
        .execute(&pg)
        .await
        .map_err(Error::from)?;

    if res.rows_affected() < 1 {
        return breaks(Error::not_found("Profesor no encontrado"));
    }
    log::debug!("profesor {} eliminado por usuario {}", id, user.id);
    proceeds(Mutated {
        mensaje: "Profesor eliminado exitosamente",
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfesor {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub especialidad: Option<String>,
    pub departamento: Option<String>,
    pub telefono: Option<String>,
}

impl CreateProfesor {
    fn missing_fields(&self) -> Vec<&'static str> {
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
        if blank(&self.especialidad) {
            missing.push("especialidad");
        }
        if blank(&self.departamento) {
            missing.push("departamento");
        }
        missing
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfesor {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub especialidad: Option<String>,
    pub departamento: Option<String>,
    pub telefono: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telefono_is_optional_on_create() {
        let profesor = CreateProfesor {
            nombre: Some("Luis".to_string()),
            apellido: Some("Mora".to_string()),
            email: Some("lmora@escuela.mx".to_string()),
            especialidad: Some("Redes".to_string()),
            departamento: Some("Ingeniería".to_string()),
            telefono: None,
        };
        assert!(profesor.missing_fields().is_empty());
    }

    #[test]
    fn identity_fields_are_required_on_create() {
        let profesor = CreateProfesor {
            nombre: None,
            apellido: Some("Mora".to_string()),
            email: Some(String::new()),
            especialidad: None,
            departamento: Some("Ingeniería".to_string()),
            telefono: None,
        };
        assert_eq!(
            profesor.missing_fields(),
            vec!["nombre", "email", "especialidad"]
        );
    }
}
