use sqlx::PgPool;

/// Creates the schema when it does not exist yet. Duplicate emails are
/// rejected by the UNIQUE constraints here, not by check-then-insert in
/// the handlers, so concurrent registrations cannot race past each other.
pub async fn prepare_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS alumnos (
            id SERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            apellido VARCHAR(100) NOT NULL,
            email VARCHAR(120) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            semestre INTEGER NOT NULL,
            carrera VARCHAR(100) NOT NULL,
            periodo VARCHAR(50) NOT NULL,
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS profesores (
            id SERIAL PRIMARY KEY,
            nombre VARCHAR(50) NOT NULL,
            apellido VARCHAR(50) NOT NULL,
            email VARCHAR(120) NOT NULL UNIQUE,
            especialidad VARCHAR(50) NOT NULL,
            departamento VARCHAR(50) NOT NULL,
            telefono VARCHAR(20),
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    // no uniqueness constraint on any institucion field
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS instituciones (
            id SERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            direccion VARCHAR(200) NOT NULL,
            telefono VARCHAR(20) NOT NULL,
            email VARCHAR(120),
            fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
