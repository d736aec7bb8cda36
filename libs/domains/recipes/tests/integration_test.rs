//! Integration tests for Recipes domain
//!
//! These tests use real MongoDB via testcontainers to ensure:
//! - The unique (name, author.pseudo) index drives Conflict classification
//! - Partial updates merge into stored documents
//! - Distinct listings and sorting run server-side as expected
//!
//! They need Docker and are ignored by default: `cargo test -- --ignored`.

use domain_recipes::{
    Author, CreateRecipe, MongoRecipeRepository, RecipeError, RecipeId, RecipeRepository,
    RecipeService, StoreError, UpdateRecipe,
};
use mongodb::bson::{Document, doc};
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

async fn setup(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoRecipeRepository {
    let repo =
        MongoRecipeRepository::with_collection(mongo.database(), &builder.collection_name("recipes"));
    repo.init_indexes().await.unwrap();
    repo
}

fn recipe(builder: &TestDataBuilder, suffix: &str, category: &str, difficulty: i32) -> CreateRecipe {
    CreateRecipe {
        category: category.to_string(),
        name: builder.name("recipe", suffix),
        description: "Integration test recipe".to_string(),
        author: Author::new(builder.pseudo("main")),
        ingredients: vec!["3 oeufs".to_string()],
        steps: vec!["Mélanger.".to_string()],
        difficulty,
        preparation_time: 20,
        cooking_time: 0,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_insert_and_get_recipe() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("insert_and_get");
    let repo = setup(&mongo, &builder).await;

    let input = recipe(&builder, "main", "sweet", 3);
    let created = repo.insert(input.clone()).await.unwrap();

    assert_eq!(created.name, input.name);
    assert!(created.created_at.is_some());

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "recipe should exist");
    assert_eq!(retrieved.id, created.id);
    assert_eq!(retrieved.author, created.author);
    assert_eq!(retrieved.steps, created.steps);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_duplicate_key_constraint() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("duplicate_key");
    let repo = setup(&mongo, &builder).await;

    let input = recipe(&builder, "dup", "sweet", 3);
    repo.insert(input.clone()).await.unwrap();

    let mut shouted = input;
    shouted.name = shouted.name.to_uppercase();
    let result = repo.insert(shouted).await;

    assert!(
        matches!(result, Err(StoreError::DuplicateKey(_))),
        "Expected DuplicateKey error, got {:?}",
        result
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_merges_fields() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("update_merges");
    let repo = setup(&mongo, &builder).await;

    let created = repo
        .insert(recipe(&builder, "main", "sweet", 3))
        .await
        .unwrap();

    let updated = repo
        .update_by_id(
            created.id,
            UpdateRecipe {
                preparation_time: Some(99),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let updated = assert_some(updated, "updated recipe");

    assert_eq!(updated.preparation_time, 99);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.ingredients, created.ingredients);
    assert_eq!(updated.difficulty, created.difficulty);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_and_remove_missing_id() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("missing_id");
    let repo = setup(&mongo, &builder).await;
    let id = RecipeId::new();

    let updated = repo
        .update_by_id(id, UpdateRecipe::default())
        .await
        .unwrap();
    assert!(updated.is_none());
    assert!(repo.remove_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_reads_documents_written_by_other_tools() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("foreign_documents");
    let repo = setup(&mongo, &builder).await;

    // Shape written by the seed script: doubles for numbers, a `__v` key
    mongo
        .database()
        .collection::<Document>(&builder.collection_name("recipes"))
        .insert_one(doc! {
            "category": "salty",
            "name": "Eau tadagazeuse",
            "description": "De l'eau gazeuse",
            "author": { "pseudo": "NileRed", "firstname": "Nigel", "lastname": "Braun" },
            "ingredients": ["1L d'eau du robinet"],
            "steps": ["Gazéifier."],
            "difficulty": 8.0,
            "preparationTime": 60.0,
            "cookingTime": 5.0,
            "__v": 0,
        })
        .await
        .unwrap();

    let listed = assert_some(repo.list().await.unwrap(), "seeded recipe");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].difficulty, 8);
    assert!(listed[0].created_at.is_none());
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_conflict_on_create() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("service_conflict");
    let service = RecipeService::new(setup(&mongo, &builder).await);

    let input = recipe(&builder, "main", "sweet", 3);
    service.create(input.clone()).await.unwrap();

    let err = service.create(input.clone()).await.unwrap_err();
    assert_eq!(
        err,
        RecipeError::Conflict {
            name: input.name,
            pseudo: input.author.pseudo,
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires Docker
async fn test_service_concurrent_creates_single_winner() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("service_concurrent_create");
    let service = RecipeService::new(setup(&mongo, &builder).await);
    let input = recipe(&builder, "race", "sweet", 3);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let input = input.clone();
            tokio::spawn(async move { service.create(input).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(
                matches!(err, RecipeError::Conflict { .. }),
                "Expected Conflict, got {:?}",
                err
            ),
        }
    }

    assert_eq!(created, 1);
    let stored = assert_some(service.find_by_name(&input.name).await.unwrap(), "stored");
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_first_is_oldest() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("service_first");
    let service = RecipeService::new(setup(&mongo, &builder).await);

    assert_eq!(service.find_first().await.unwrap(), None);
    let oldest = service
        .create(recipe(&builder, "a", "sweet", 3))
        .await
        .unwrap();
    service
        .create(recipe(&builder, "b", "salty", 5))
        .await
        .unwrap();

    assert_eq!(service.find_first().await.unwrap(), Some(oldest));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_update_conflict() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("service_update_conflict");
    let service = RecipeService::new(setup(&mongo, &builder).await);

    let taken = service
        .create(recipe(&builder, "taken", "sweet", 3))
        .await
        .unwrap();
    let other = service
        .create(recipe(&builder, "other", "sweet", 3))
        .await
        .unwrap();

    let err = service
        .update(
            other.id.parse().unwrap(),
            UpdateRecipe {
                name: Some(taken.name.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RecipeError::Conflict {
            name: taken.name,
            pseudo: taken.author.pseudo,
        }
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_listings() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("service_listings");
    let service = RecipeService::new(setup(&mongo, &builder).await);

    assert_eq!(service.find_all().await.unwrap(), None);
    assert_eq!(service.find_all_categories().await.unwrap(), None);

    for (suffix, category, difficulty) in [
        ("a", "sweet", 3),
        ("b", "salty", 8),
        ("c", "sweet", 0),
        ("d", "salty", 5),
    ] {
        service
            .create(recipe(&builder, suffix, category, difficulty))
            .await
            .unwrap();
    }

    let categories = assert_some(service.find_all_categories().await.unwrap(), "categories");
    assert_same_elements(
        &categories,
        &["sweet".to_string(), "salty".to_string()],
        "categories",
    );

    let sweet = assert_some(service.find_by_category("sweet").await.unwrap(), "sweet");
    assert_eq!(sweet.len(), 2);

    let sorted = service
        .find_and_sort(&"-difficulty".parse().unwrap())
        .await
        .unwrap();
    let difficulties: Vec<i32> = sorted.iter().map(|r| r.difficulty).collect();
    assert_eq!(difficulties, vec![8, 5, 3, 0]);
    assert_non_increasing(&difficulties, "difficulty");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_delete_then_find() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("service_delete");
    let service = RecipeService::new(setup(&mongo, &builder).await);

    let created = service
        .create(recipe(&builder, "main", "sweet", 3))
        .await
        .unwrap();
    let id: RecipeId = created.id.parse().unwrap();

    service.delete(id).await.unwrap();

    assert_eq!(
        service.find_by_id(id).await.unwrap_err(),
        RecipeError::NotFound(id)
    );
}
