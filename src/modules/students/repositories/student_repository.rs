use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::fees::Course;
use crate::modules::students::models::{normalize_dni, NewStudent, PostalAddress, Student};

/// Student lookups needed by invoicing and imports
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Student>>;

    /// Case-insensitive DNI match. More than one hit means dirty data.
    async fn find_by_dni(&self, dni: &str) -> Result<Vec<Student>>;

    async fn create(&self, student: &NewStudent) -> Result<Student>;

    async fn update_address(&self, id: i64, address: &PostalAddress) -> Result<()>;
}

/// MySQL-backed student repository
#[derive(Clone)]
pub struct MySqlStudentRepository {
    pool: MySqlPool,
}

impl MySqlStudentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for MySqlStudentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, first_name, last_name, dni, course, street_address, postal_code,
                   municipality, province, is_active
            FROM students
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StudentRow::into_student).transpose()
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, first_name, last_name, dni, course, street_address, postal_code,
                   municipality, province, is_active
            FROM students
            WHERE UPPER(dni) = ?
            "#,
        )
        .bind(normalize_dni(dni))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StudentRow::into_student).collect()
    }

    async fn create(&self, student: &NewStudent) -> Result<Student> {
        let dni = normalize_dni(&student.dni);

        let result = sqlx::query(
            r#"
            INSERT INTO students (
                first_name, last_name, dni, course, street_address, postal_code,
                municipality, province, is_active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&dni)
        .bind(student.course.code())
        .bind(&student.address.street)
        .bind(&student.address.postal_code)
        .bind(&student.address.municipality)
        .bind(&student.address.province)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::validation(format!(
                        "Student with DNI '{}' already exists",
                        dni
                    ));
                }
            }
            AppError::Database(e)
        })?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("Inserted id out of range"))?;

        Ok(student.clone().into_student(id))
    }

    async fn update_address(&self, id: i64, address: &PostalAddress) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET street_address = ?, postal_code = ?, municipality = ?, province = ?
            WHERE id = ?
            "#,
        )
        .bind(&address.street)
        .bind(&address.postal_code)
        .bind(&address.municipality)
        .bind(&address.province)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Student with id '{}' not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct StudentRow {
    id: i64,
    first_name: String,
    last_name: String,
    dni: String,
    course: String,
    street_address: String,
    postal_code: String,
    municipality: String,
    province: String,
    is_active: bool,
}

impl StudentRow {
    fn into_student(self) -> Result<Student> {
        let course = Course::from_str(&self.course)
            .map_err(|e| AppError::internal(format!("Invalid course in database: {}", e)))?;

        Ok(Student {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            dni: self.dni,
            course,
            address: PostalAddress {
                street: self.street_address,
                postal_code: self.postal_code,
                municipality: self.municipality,
                province: self.province,
            },
            is_active: self.is_active,
        })
    }
}
