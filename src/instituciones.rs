use axum::extract::Path;
use axum::{Extension, Json};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{blank, CurrentUser};
use crate::models::{CreatedId, Institucion, Mutated};
use crate::{breaks, creates, proceeds, Created, Error, Payload};

pub async fn get_instituciones(Extension(pg): Extension<PgPool>) -> Payload<Vec<Institucion>> {
    let instituciones =
        sqlx::query_as::<_, Institucion>("SELECT * FROM instituciones ORDER BY id")
            .fetch_all(&pg)
            .await
            .map_err(Error::from)?;
    proceeds(instituciones)
}

pub async fn get_institucion(
    Path(id): Path<i32>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Institucion> {
    let institucion =
        sqlx::query_as::<_, Institucion>("SELECT * FROM instituciones WHERE id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(&pg)
            .await
            .map_err(Error::from)?;
    match institucion {
        Some(institucion) => proceeds(institucion),
        None => breaks(Error::not_found("Institución no encontrada")),
    }
}

pub async fn create_institucion(
    Json(institucion): Json<CreateInstitucion>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Created<CreatedId> {
    let missing = institucion.missing_fields();
    if !missing.is_empty() {
        return breaks(Error::MissingFields { fields: missing });
    }

    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO instituciones (nombre, direccion, telefono, email)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(institucion.nombre.unwrap_or_default())
    .bind(institucion.direccion.unwrap_or_default())
    .bind(institucion.telefono.unwrap_or_default())
    .bind(institucion.email)
    .fetch_one(&pg)
    .await
    .map_err(Error::from)?;

    log::debug!("institución {} creada por usuario {}", id, user.id);
    creates(CreatedId {
        id,
        mensaje: "Institución creada exitosamente",
    })
}

pub async fn update_institucion(
    Path(id): Path<i32>,
    Json(cambios): Json<UpdateInstitucion>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Mutated> {
    let res = sqlx::query(
        "UPDATE instituciones SET
            nombre = COALESCE($2, nombre),
            direccion = COALESCE($3, direccion),
            telefono = COALESCE($4, telefono),
            email = COALESCE($5, email)
         WHERE id = $1",
    )
    .bind(id)
    .bind(cambios.nombre)
    .bind(cambios.direccion)
    .bind(cambios.telefono)
    .bind(cambios.email)
    .execute(&pg)
    .await
    .map_err(Error::from)?;

    if res.rows_affected() < 1 {
        return breaks(Error::not_found("Institución no encontrada"));
    }
    log::debug!("institución {} actualizada por usuario {}", id, user.id);
    proceeds(Mutated {
        mensaje: "Institución actualizada exitosamente",
    })
}

pub async fn delete_institucion(
    Path(id): Path<i32>,
    Extension(user): Extension<CurrentUser>,
    Extension(pg): Extension<PgPool>,
) -> Payload<Mutated> {
    let res = sqlx::query("DELETE FROM instituciones WHERE id = $1")
        .bind(id)
        .execute(&pg)
        .await
        .map_err(Error::from)?;

    if res.rows_affected() < 1 {
        return breaks(Error::not_found("Institución no encontrada"));
    }
    log::debug!("institución {} eliminada por usuario {}", id, user.id);
    proceeds(Mutated {
        mensaje: "Institución eliminada exitosamente",
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstitucion {
    pub nombre: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

impl CreateInstitucion {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.nombre) {
            missing.push("nombre");
        }
        if blank(&self.direccion) {
            missing.push("direccion");
        }
        if blank(&self.telefono) {
            missing.push("telefono");
        }
        missing
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInstitucion {
    pub nombre: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}
