//! User model
//!
//! Account data, body profile and the cached output of the last body
//! metrics calculation.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::db::{DbError, DbResult};
use crate::metrics::BodyMetrics;

pub const DEFAULT_GENDER: &str = "male";
pub const DEFAULT_ACTIVITY_LEVEL: &str = "moderate";
pub const DEFAULT_FITNESS_GOAL: &str = "body_recomposition";

/// A registered user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: String,
    pub activity_level: String,
    pub fitness_goal: String,
    pub target_weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub bmi: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub daily_calorie_target: i64,
    pub daily_protein_target: i64,
    pub daily_carb_target: i64,
    pub daily_fat_target: i64,
    pub created_at: String,
}

/// Data for creating a new user
#[derive(Debug, Clone, Default)]
pub struct UserCreate {
    pub username: String,
    pub password_hash: String,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub target_weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
}

/// Data for updating a user; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub target_weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub daily_calorie_target: Option<i64>,
    pub daily_protein_target: Option<i64>,
    pub daily_carb_target: Option<i64>,
    pub daily_fat_target: Option<i64>,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            age: row.get("age")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            gender: row.get("gender")?,
            activity_level: row.get("activity_level")?,
            fitness_goal: row.get("fitness_goal")?,
            target_weight: row.get("target_weight")?,
            body_fat_percentage: row.get("body_fat_percentage")?,
            muscle_mass: row.get("muscle_mass")?,
            bmi: row.get("bmi")?,
            bmr: row.get("bmr")?,
            tdee: row.get("tdee")?,
            daily_calorie_target: row.get("daily_calorie_target")?,
            daily_protein_target: row.get("daily_protein_target")?,
            daily_carb_target: row.get("daily_carb_target")?,
            daily_fat_target: row.get("daily_fat_target")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new user
    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (
                username, password_hash, age, weight, height,
                gender, activity_level, fitness_goal,
                target_weight, body_fat_percentage, muscle_mass, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.username,
                data.password_hash,
                data.age,
                data.weight,
                data.height,
                data.gender.as_deref().unwrap_or(DEFAULT_GENDER),
                data.activity_level.as_deref().unwrap_or(DEFAULT_ACTIVITY_LEVEL),
                data.fitness_goal.as_deref().unwrap_or(DEFAULT_FITNESS_GOAL),
                data.target_weight,
                data.body_fat_percentage,
                data.muscle_mass,
                super::now_timestamp(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by exact username
    pub fn get_by_username(conn: &Connection, username: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?1")?;

        match stmt.query_row([username], Self::from_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All users, oldest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id ASC")?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Partially update a user
    pub fn update(conn: &Connection, id: i64, data: &UserUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(age, "age");
        add_update!(weight, "weight");
        add_update!(height, "height");
        add_update!(gender, "gender");
        add_update!(activity_level, "activity_level");
        add_update!(fitness_goal, "fitness_goal");
        add_update!(target_weight, "target_weight");
        add_update!(body_fat_percentage, "body_fat_percentage");
        add_update!(muscle_mass, "muscle_mass");
        add_update!(daily_calorie_target, "daily_calorie_target");
        add_update!(daily_protein_target, "daily_protein_target");
        add_update!(daily_carb_target, "daily_carb_target");
        add_update!(daily_fat_target, "daily_fat_target");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE users SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Cache the result of a body metrics calculation on the user row
    pub fn update_metrics(conn: &Connection, id: i64, metrics: &BodyMetrics) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE users SET
                bmi = ?1, bmr = ?2, tdee = ?3,
                daily_calorie_target = ?4, daily_protein_target = ?5,
                daily_carb_target = ?6, daily_fat_target = ?7
            WHERE id = ?8
            "#,
            params![
                metrics.bmi,
                metrics.bmr as f64,
                metrics.tdee as f64,
                metrics.calorie_target,
                metrics.protein_target,
                metrics.carb_target,
                metrics.fat_target,
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_applies_defaults() {
        let conn = conn();
        let user = User::create(
            &conn,
            &UserCreate {
                username: "asha".into(),
                password_hash: "hash".into(),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(user.gender, "male");
        assert_eq!(user.activity_level, "moderate");
        assert_eq!(user.fitness_goal, "body_recomposition");
        assert_eq!(user.daily_calorie_target, 2200);
        assert_eq!(user.daily_fat_target, 73);
        assert!(user.bmi.is_none());
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let conn = conn();
        let data = UserCreate {
            username: "asha".into(),
            password_hash: "hash".into(),
            ..Default::default()
        };
        User::create(&conn, &data).unwrap();
        assert!(User::create(&conn, &data).is_err());
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let conn = conn();
        let user = User::create(
            &conn,
            &UserCreate {
                username: "ravi".into(),
                password_hash: "hash".into(),
                age: Some(30),
                height: Some(175.0),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = User::update(
            &conn,
            user.id,
            &UserUpdate {
                weight: Some(72.5),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.weight, Some(72.5));
        assert_eq!(updated.age, Some(30));
        assert_eq!(updated.height, Some(175.0));
        assert!(User::update(&conn, 999, &UserUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let conn = conn();
        let user = User::create(
            &conn,
            &UserCreate {
                username: "meera".into(),
                password_hash: "secret-hash".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("secret-hash"));
        assert_eq!(json["activityLevel"], "moderate");
    }
}
