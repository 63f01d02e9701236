//! Meal logging and AI meal suggestions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{calendar_date, normalize_timestamp, require_user};
use crate::ai::{self, CompletionClient, MealSuggestion};
use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::{FoodItem, MealEntry, MealEntryCreate, MealType};

/// A day's entries keyed by meal slot, in eating order
pub type MealsByType = BTreeMap<MealType, Vec<MealEntry>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub user_id: i64,
    pub food_item_id: i64,
    pub meal_type: MealType,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Explicit nutrition overrides the food item's values
    pub calories: Option<i64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub date: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestionRequest {
    pub user_id: i64,
    pub meal_type: String,
    /// Defaults to a quarter of the user's daily calorie target
    pub target_calories: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// `GET /api/meals/user/{userId}/date/{date}`
pub fn meals_for_date(db: &Database, user_id: i64, date: &str) -> ApiResult<MealsByType> {
    let day = calendar_date(date)?;
    let entries = db.with_conn(|conn| MealEntry::list_for_user_on_date(conn, user_id, &day))?;

    let mut grouped = MealsByType::new();
    for entry in entries {
        grouped.entry(entry.meal_type).or_default().push(entry);
    }
    Ok(grouped)
}

/// Log a food item eaten, scaling its per-serving nutrition by `quantity`
pub fn create_meal(db: &Database, req: CreateMealRequest) -> ApiResult<MealEntry> {
    if req.quantity.is_nan() || req.quantity <= 0.0 {
        return Err(ApiError::BadRequest("quantity must be greater than 0".to_owned()));
    }
    let date = req.date.as_deref().map(normalize_timestamp).transpose()?;

    let conn = db.get_conn()?;
    require_user(&conn, req.user_id)?;
    let food = FoodItem::get_by_id(&conn, req.food_item_id)?.ok_or_else(|| ApiError::not_found("Food item"))?;

    let entry = MealEntry::create(
        &conn,
        &MealEntryCreate {
            user_id: req.user_id,
            food_item_id: food.id,
            meal_type: req.meal_type,
            quantity: req.quantity,
            calories: req
                .calories
                .unwrap_or_else(|| (food.calories_per_serving as f64 * req.quantity).round() as i64),
            protein: req.protein.unwrap_or(food.protein_per_serving * req.quantity),
            carbs: req.carbs.unwrap_or(food.carbs_per_serving * req.quantity),
            fat: req.fat.unwrap_or(food.fat_per_serving * req.quantity),
            date,
        },
    )?;

    tracing::debug!(meal_entry_id = entry.id, user_id = entry.user_id, meal_type = entry.meal_type.as_str(), "Logged meal");
    Ok(entry)
}

pub fn delete_meal(db: &Database, meal_id: i64) -> ApiResult<DeleteResponse> {
    if !db.with_conn(|conn| MealEntry::delete(conn, meal_id))? {
        return Err(ApiError::not_found("Meal entry"));
    }
    Ok(DeleteResponse { success: true })
}

pub async fn suggest_meals(
    db: &Database,
    client: &dyn CompletionClient,
    req: MealSuggestionRequest,
) -> ApiResult<Vec<MealSuggestion>> {
    let user = {
        let conn = db.get_conn()?;
        require_user(&conn, req.user_id)?
    };

    let target = req
        .target_calories
        .unwrap_or(user.daily_calorie_target as f64 / 4.0);

    ai::generate_meal_suggestions(client, &user, &req.meal_type, target)
        .await
        .map_err(ApiError::ai("Failed to generate meal suggestions"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::StubClient;
    use crate::services::test_support::{database, user_with_profile};

    fn request(user_id: i64, food_item_id: i64, meal_type: MealType, date: &str) -> CreateMealRequest {
        CreateMealRequest {
            user_id,
            food_item_id,
            meal_type,
            quantity: 1.0,
            calories: None,
            protein: None,
            carbs: None,
            fat: None,
            date: Some(date.into()),
        }
    }

    #[test]
    fn test_nutrition_is_derived_from_food_item() {
        let db = database();
        let user = user_with_profile(&db, "meera");

        // Dal Tadka: 184 kcal, 12 g protein per bowl
        let mut req = request(user.id, 9, MealType::Lunch, "2025-04-02");
        req.quantity = 1.5;
        let entry = create_meal(&db, req).unwrap();

        assert_eq!(entry.calories, 276);
        assert_eq!(entry.protein, 18.0);
        assert_eq!(entry.date, "2025-04-02T00:00:00Z");

        let mut req = request(user.id, 9, MealType::Lunch, "2025-04-02");
        req.calories = Some(150);
        assert_eq!(create_meal(&db, req).unwrap().calories, 150);
    }

    #[test]
    fn test_create_validation() {
        let db = database();
        let user = user_with_profile(&db, "meera");

        let mut req = request(user.id, 1, MealType::Breakfast, "2025-04-02");
        req.quantity = 0.0;
        assert!(matches!(create_meal(&db, req), Err(ApiError::BadRequest(_))));

        let req = request(user.id, 1, MealType::Breakfast, "not-a-date");
        assert!(matches!(create_meal(&db, req), Err(ApiError::BadRequest(_))));

        let req = request(user.id, 999, MealType::Breakfast, "2025-04-02");
        assert!(matches!(create_meal(&db, req), Err(ApiError::NotFound(ref m)) if m == "Food item not found"));

        let req = request(999, 1, MealType::Breakfast, "2025-04-02");
        assert!(matches!(create_meal(&db, req), Err(ApiError::NotFound(ref m)) if m == "User not found"));

        let unknown_type = serde_json::from_str::<CreateMealRequest>(
            r#"{"userId":1,"foodItemId":1,"mealType":"brunch"}"#,
        );
        assert!(unknown_type.is_err());
    }

    #[test]
    fn test_meals_are_grouped_by_type_for_one_day() {
        let db = database();
        let user = user_with_profile(&db, "meera");

        create_meal(&db, request(user.id, 2, MealType::Dinner, "2025-04-02T20:00:00Z")).unwrap();
        create_meal(&db, request(user.id, 4, MealType::Breakfast, "2025-04-02T08:00:00Z")).unwrap();
        create_meal(&db, request(user.id, 5, MealType::Breakfast, "2025-04-02T08:05:00Z")).unwrap();
        create_meal(&db, request(user.id, 8, MealType::Lunch, "2025-04-03T13:00:00Z")).unwrap();

        let grouped = meals_for_date(&db, user.id, "2025-04-02").unwrap();
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![MealType::Breakfast, MealType::Dinner]);
        assert_eq!(grouped[&MealType::Breakfast].len(), 2);

        let json = serde_json::to_value(&grouped).unwrap();
        assert_eq!(json["breakfast"][0]["foodItemId"], 4);

        assert!(meals_for_date(&db, user.id, "2025-04-05").unwrap().is_empty());
        assert!(matches!(meals_for_date(&db, user.id, "April"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_delete_meal() {
        let db = database();
        let user = user_with_profile(&db, "meera");
        let entry = create_meal(&db, request(user.id, 3, MealType::MiddaySnack, "2025-04-02")).unwrap();

        assert!(delete_meal(&db, entry.id).unwrap().success);
        assert!(matches!(delete_meal(&db, entry.id), Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_suggestions_default_to_quarter_of_daily_target() {
        let db = database();
        let user = user_with_profile(&db, "meera");
        let stub = StubClient::replying(
            r#"{"suggestions":[{"name":"Poha","category":"breakfast","caloriesPerServing":250,
                "proteinPerServing":6,"carbsPerServing":45,"fatPerServing":5,
                "servingSize":"1 plate","description":"Flattened rice"}]}"#,
        );

        let suggestions = suggest_meals(
            &db,
            &stub,
            MealSuggestionRequest {
                user_id: user.id,
                meal_type: "breakfast".into(),
                target_calories: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "Poha");
        // default daily target 2200
        assert!(stub.last_user_prompt().unwrap().contains("approximately 550 total calories"));
    }

    #[tokio::test]
    async fn test_suggestion_failure_is_wrapped() {
        let db = database();
        let user = user_with_profile(&db, "meera");
        let stub = StubClient::replying(r#"{"ideas": []}"#);

        let err = suggest_meals(
            &db,
            &stub,
            MealSuggestionRequest {
                user_id: user.id,
                meal_type: "dinner".into(),
                target_calories: Some(600.0),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Failed to generate meal suggestions: "));
    }
}
