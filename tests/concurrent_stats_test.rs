use daily_diet_tracker::models::Meal;

mod common;
use common::{create_test_user, test_db, test_meal};

const NUM_CONCURRENT_MEALS: usize = 10;

#[tokio::test]
async fn test_concurrent_meal_creation_race_condition() {
    // Concurrent creates for one user all read-modify-write the same stats
    // document. If the stats read happened outside the transaction, two
    // requests could read the same counters and one increment would be lost.
    require_emulator!();

    let db = test_db().await;
    let user = create_test_user(&db).await;

    let meals: Vec<Meal> = (0..NUM_CONCURRENT_MEALS)
        .map(|i| test_meal(user.id, i % 2 == 0))
        .collect();

    let mut handles = vec![];
    for meal in meals.clone() {
        let db_clone = db.clone();
        handles.push(tokio::spawn(async move {
            db_clone.create_meal_atomic(&meal).await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Meal creation failed");
    }

    let stats = db
        .get_user_stats(user.id)
        .await
        .expect("Failed to fetch user stats")
        .expect("User stats document not found");

    assert_eq!(
        stats.registered_meals, NUM_CONCURRENT_MEALS as u32,
        "Registered meal count mismatch due to race condition"
    );
    assert_eq!(
        stats.in_diet_meals,
        (NUM_CONCURRENT_MEALS / 2) as u32,
        "In-diet count mismatch due to race condition"
    );

    // Now delete them all concurrently; counters must return to zero.
    let mut handles = vec![];
    for meal in meals {
        let db_clone = db.clone();
        handles.push(tokio::spawn(async move {
            db_clone.delete_meal_atomic(meal.user_id, meal.id).await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Meal deletion failed");
    }

    let stats = db.get_user_stats(user.id).await.unwrap().unwrap();
    assert_eq!(stats.registered_meals, 0);
    assert_eq!(stats.in_diet_meals, 0);
    assert!(stats.current_streak <= stats.max_streak);
}
