use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Alumno {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub semestre: i32,
    pub carrera: String,
    pub periodo: String,
    pub fecha_creacion: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profesor {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub especialidad: String,
    pub departamento: String,
    pub telefono: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Institucion {
    pub id: i32,
    pub nombre: String,
    pub direccion: String,
    pub telefono: String,
    pub email: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

/// `{id, mensaje}` body returned by every create endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedId {
    pub id: i32,
    pub mensaje: &'static str,
}

/// `{mensaje}` body returned by updates and deletes.
#[derive(Debug, Clone, Serialize)]
pub struct Mutated {
    pub mensaje: &'static str,
}
