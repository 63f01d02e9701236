//! Food catalogue

use serde::Deserialize;

use super::require_text;
use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::{FoodItem, FoodItemCreate};

/// Query string for `GET /api/food-items`; `search` wins over `category`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

pub fn list_food_items(db: &Database, query: &FoodQuery) -> ApiResult<Vec<FoodItem>> {
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());
    let category = query.category.as_deref().filter(|c| !c.trim().is_empty());

    let conn = db.get_conn()?;
    let items = match (search, category) {
        (Some(search), _) => FoodItem::search(&conn, search.trim())?,
        (None, Some(category)) => FoodItem::list_by_category(&conn, category)?,
        (None, None) => FoodItem::list(&conn)?,
    };
    Ok(items)
}

pub fn create_food_item(db: &Database, data: FoodItemCreate) -> ApiResult<FoodItem> {
    require_text("name", &data.name)?;
    require_text("category", &data.category)?;
    if data.calories_per_serving < 0 {
        return Err(ApiError::BadRequest("caloriesPerServing must not be negative".to_owned()));
    }

    let item = db.with_conn(|conn| FoodItem::create(conn, &data))?;
    tracing::info!(food_item_id = item.id, name = %item.name, "Created food item");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::database;

    #[test]
    fn test_search_takes_priority() {
        let db = database();

        let all = list_food_items(&db, &FoodQuery::default()).unwrap();
        assert_eq!(all.len(), 18);

        let query = FoodQuery {
            category: Some("no-such-category".into()),
            search: Some("CHAI".into()),
        };
        let found = list_food_items(&db, &query).unwrap();
        let names: Vec<_> = found.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Masala Chai"));

        let blank_search = FoodQuery {
            category: Some("no-such-category".into()),
            search: Some("  ".into()),
        };
        assert!(list_food_items(&db, &blank_search).unwrap().is_empty());
    }

    #[test]
    fn test_create_food_item() {
        let db = database();
        let data: FoodItemCreate = serde_json::from_str(
            r#"{"name":"Sprouts Chaat","category":"snack","caloriesPerServing":150,"proteinPerServing":9}"#,
        )
        .unwrap();

        let item = create_food_item(&db, data).unwrap();
        assert!(item.is_indian);
        assert_eq!(item.fat_per_serving, 0.0);

        let bad: FoodItemCreate =
            serde_json::from_str(r#"{"name":"Air","category":"snack","caloriesPerServing":-5}"#).unwrap();
        assert!(matches!(create_food_item(&db, bad), Err(ApiError::BadRequest(_))));
    }
}
