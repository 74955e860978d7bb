//! Integration tests for the GraphQL schema
//!
//! Executes documents against a seeded in-memory catalog with per-request
//! loaders attached, as the HTTP handler does.

mod common;

use serde_json::Value;
use sqlx::SqlitePool;

use common::{execute, first_error_code, id_of, names, schema, seeded_pool, test_claims};
use starwars_api::{BatchConfig, LoaderRegistry};

fn character<'a>(all: &'a Value, name: &str) -> &'a Value {
    all.as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap_or_else(|| panic!("{name} missing from {all}"))
}

#[tokio::test]
async fn test_nested_character_graph() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);

    let response = execute(
        &schema,
        &pool,
        "{ allCharacters { name homePlanet { name climate } pilotedStarships { name } } }",
        None,
    )
    .await;

    assert!(response["errors"].is_null(), "{response}");
    let all = &response["data"]["allCharacters"];
    assert_eq!(all.as_array().unwrap().len(), 5);

    let luke = character(all, "Luke Skywalker");
    assert_eq!(luke["homePlanet"]["name"], "Tatooine");
    assert_eq!(luke["homePlanet"]["climate"], "Arid");
    assert_eq!(names(&luke["pilotedStarships"]), ["X-wing"]);

    let han = character(all, "Han Solo");
    assert!(han["homePlanet"].is_null());
    assert_eq!(names(&han["pilotedStarships"]), ["Millennium Falcon"]);

    let yoda = character(all, "Yoda");
    assert!(yoda["pilotedStarships"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_planet_residents_and_starship_pilots() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);

    let response = execute(
        &schema,
        &pool,
        "{ allPlanets { name residents { name } } allStarships { name pilots { name } } }",
        None,
    )
    .await;

    assert!(response["errors"].is_null(), "{response}");
    let planets = response["data"]["allPlanets"].as_array().unwrap();
    assert_eq!(names(&planets[0]["residents"]), ["Luke Skywalker"]);
    assert_eq!(names(&planets[1]["residents"]), ["Leia Organa"]);
    assert!(planets[3]["residents"].as_array().unwrap().is_empty());

    let starships = response["data"]["allStarships"].as_array().unwrap();
    assert_eq!(names(&starships[0]["pilots"]), ["Han Solo"]);
    assert!(starships[2]["pilots"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_single_lookups() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let falcon = id_of(&pool, "starships", "Millennium Falcon").await;

    let query = format!(r#"{{ starship(id: " {falcon} ") {{ id name pilots {{ name }} }} }}"#);
    let response = execute(&schema, &pool, &query, None).await;
    assert_eq!(response["data"]["starship"]["name"], "Millennium Falcon");
    assert_eq!(response["data"]["starship"]["id"], falcon.to_string());

    let response = execute(&schema, &pool, r#"{ planet(id: "999") { name } }"#, None).await;
    assert!(response["errors"].is_null());
    assert!(response["data"]["planet"].is_null());
}

#[tokio::test]
async fn test_malformed_ids_are_rejected() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);

    for id in ["abc", "0", "-3", ""] {
        let query = format!(r#"{{ character(id: "{id}") {{ name }} }}"#);
        let response = execute(&schema, &pool, &query, None).await;
        assert_eq!(first_error_code(&response), "INVALID_KEY", "id {id:?}");
    }
}

#[tokio::test]
async fn test_mutations_require_authentication() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);

    let response = execute(
        &schema,
        &pool,
        r#"mutation { createPlanet(input: { name: "Hoth" }) { id } }"#,
        None,
    )
    .await;

    assert_eq!(first_error_code(&response), "UNAUTHENTICATED");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM planets WHERE name = 'Hoth'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_and_update_planet() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;

    let response = execute(
        &schema,
        &pool,
        r#"mutation { createPlanet(input: { name: "Hoth", climate: "Frozen" }) { id name climate terrain residents { name } } }"#,
        Some(claims.clone()),
    )
    .await;
    assert!(response["errors"].is_null(), "{response}");
    let planet = &response["data"]["createPlanet"];
    assert_eq!(planet["climate"], "Frozen");
    assert!(planet["terrain"].is_null());
    assert!(planet["residents"].as_array().unwrap().is_empty());

    let id = planet["id"].as_str().unwrap();
    let mutation = format!(
        r#"mutation {{ updatePlanet(input: {{ id: "{id}", terrain: "Tundra" }}) {{ name climate terrain }} }}"#
    );
    let response = execute(&schema, &pool, &mutation, Some(claims)).await;
    let planet = &response["data"]["updatePlanet"];
    assert_eq!(planet["name"], "Hoth");
    assert_eq!(planet["climate"], "Frozen");
    assert_eq!(planet["terrain"], "Tundra");
}

#[tokio::test]
async fn test_duplicate_and_invalid_input() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;

    let response = execute(
        &schema,
        &pool,
        r#"mutation { createStarship(input: { name: "X-wing" }) { id } }"#,
        Some(claims.clone()),
    )
    .await;
    assert_eq!(first_error_code(&response), "DUPLICATE_ERROR");

    let response = execute(
        &schema,
        &pool,
        r#"mutation { createCharacter(input: { name: "   " }) { id } }"#,
        Some(claims.clone()),
    )
    .await;
    assert_eq!(first_error_code(&response), "VALIDATION_ERROR");

    let long_climate = "c".repeat(51);
    let mutation =
        format!(r#"mutation {{ createPlanet(input: {{ name: "Dagobah", climate: "{long_climate}" }}) {{ id }} }}"#);
    let response = execute(&schema, &pool, &mutation, Some(claims.clone())).await;
    assert_eq!(first_error_code(&response), "VALIDATION_ERROR");

    let response = execute(
        &schema,
        &pool,
        r#"mutation { createCharacter(input: { name: "Rey", homePlanetId: "999" }) { id } }"#,
        Some(claims),
    )
    .await;
    assert_eq!(first_error_code(&response), "NOT_FOUND");
}

#[tokio::test]
async fn test_planet_with_residents_cannot_be_deleted() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;
    let tatooine = id_of(&pool, "planets", "Tatooine").await;
    let naboo = id_of(&pool, "planets", "Naboo").await;

    let mutation = format!(r#"mutation {{ deletePlanet(id: "{tatooine}") }}"#);
    let response = execute(&schema, &pool, &mutation, Some(claims.clone())).await;
    assert_eq!(first_error_code(&response), "CONSTRAINT_ERROR");

    let query = format!(r#"{{ planet(id: "{tatooine}") {{ name }} }}"#);
    let response = execute(&schema, &pool, &query, None).await;
    assert_eq!(response["data"]["planet"]["name"], "Tatooine");

    let mutation = format!(r#"mutation {{ deletePlanet(id: "{naboo}") }}"#);
    let response = execute(&schema, &pool, &mutation, Some(claims)).await;
    assert_eq!(response["data"]["deletePlanet"], true);

    let query = format!(r#"{{ planet(id: "{naboo}") {{ name }} }}"#);
    let response = execute(&schema, &pool, &query, None).await;
    assert!(response["data"]["planet"].is_null());
}

#[tokio::test]
async fn test_deleting_character_removes_pilot_records() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;
    let han = id_of(&pool, "characters", "Han Solo").await;

    let mutation = format!(r#"mutation {{ deleteCharacter(id: "{han}") }}"#);
    let response = execute(&schema, &pool, &mutation, Some(claims)).await;
    assert_eq!(response["data"]["deleteCharacter"], true);

    let response = execute(
        &schema,
        &pool,
        "{ allStarships { name pilots { name } } allCharacters { name pilotedStarships { name } } }",
        None,
    )
    .await;
    assert!(response["errors"].is_null(), "{response}");

    let falcon = &response["data"]["allStarships"][0];
    assert_eq!(falcon["name"], "Millennium Falcon");
    assert!(falcon["pilots"].as_array().unwrap().is_empty());

    let luke = character(&response["data"]["allCharacters"], "Luke Skywalker");
    assert_eq!(names(&luke["pilotedStarships"]), ["X-wing"]);
}

#[tokio::test]
async fn test_assign_starship_is_idempotent() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;
    let leia = id_of(&pool, "characters", "Leia Organa").await;
    let falcon = id_of(&pool, "starships", "Millennium Falcon").await;

    let mutation = format!(
        r#"mutation {{
            first: assignStarship(input: {{ characterId: "{leia}", starshipId: "{falcon}" }}) {{
                name pilotedStarships {{ name }}
            }}
            second: assignStarship(input: {{ characterId: "{leia}", starshipId: "{falcon}" }}) {{
                name pilotedStarships {{ name }}
            }}
        }}"#
    );
    let response = execute(&schema, &pool, &mutation, Some(claims)).await;

    assert!(response["errors"].is_null(), "{response}");
    assert_eq!(response["data"]["first"]["name"], "Leia Organa");
    assert_eq!(
        names(&response["data"]["first"]["pilotedStarships"]),
        ["Millennium Falcon"]
    );
    assert_eq!(
        names(&response["data"]["second"]["pilotedStarships"]),
        ["Millennium Falcon"]
    );

    let query = format!(r#"{{ starship(id: "{falcon}") {{ pilots {{ name }} }} }}"#);
    let response = execute(&schema, &pool, &query, None).await;
    assert_eq!(
        names(&response["data"]["starship"]["pilots"]),
        ["Leia Organa", "Han Solo"]
    );
}

#[tokio::test]
async fn test_moving_character_updates_residents_in_same_request() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;
    let luke = id_of(&pool, "characters", "Luke Skywalker").await;
    let yavin = id_of(&pool, "planets", "Yavin IV").await;

    let mutation = format!(
        r#"mutation {{
            updateCharacter(input: {{ id: "{luke}", homePlanetId: "{yavin}" }}) {{
                species homePlanet {{ name residents {{ name }} }}
            }}
        }}"#
    );
    let response = execute(&schema, &pool, &mutation, Some(claims)).await;

    assert!(response["errors"].is_null(), "{response}");
    let updated = &response["data"]["updateCharacter"];
    assert_eq!(updated["species"], "Human");
    assert_eq!(updated["homePlanet"]["name"], "Yavin IV");
    assert_eq!(names(&updated["homePlanet"]["residents"]), ["Luke Skywalker"]);

    let response = execute(&schema, &pool, "{ allPlanets { name residents { name } } }", None).await;
    let tatooine = &response["data"]["allPlanets"][0];
    assert_eq!(tatooine["name"], "Tatooine");
    assert!(tatooine["residents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_entities_in_mutations() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);
    let claims = test_claims(&pool).await;

    for mutation in [
        r#"mutation { updateStarship(input: { id: "999", model: "Y-wing" }) { id } }"#,
        r#"mutation { deleteStarship(id: "999") }"#,
        r#"mutation { deleteCharacter(id: "999") }"#,
        r#"mutation { assignStarship(input: { characterId: "1", starshipId: "999" }) { id } }"#,
    ] {
        let response = execute(&schema, &pool, mutation, Some(claims.clone())).await;
        assert_eq!(first_error_code(&response), "NOT_FOUND", "{mutation}");
    }
}

#[tokio::test]
async fn test_failed_relationship_batch_nulls_only_that_field() {
    let pool = seeded_pool().await;
    let schema = schema(&pool);

    sqlx::query("DROP TABLE character_starships")
        .execute(&pool)
        .await
        .unwrap();

    let response = execute(
        &schema,
        &pool,
        "{ allCharacters { name homePlanet { name } pilotedStarships { name } } }",
        None,
    )
    .await;

    let all = &response["data"]["allCharacters"];
    assert_eq!(all.as_array().unwrap().len(), 5);

    let luke = character(all, "Luke Skywalker");
    assert_eq!(luke["homePlanet"]["name"], "Tatooine");
    assert!(luke["pilotedStarships"].is_null());

    // Every failed field reports the same batch failure
    let errors = response["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 5);
    assert!(errors
        .iter()
        .all(|e| e["extensions"]["code"] == "INTERNAL_ERROR"));
}

/// Add `count` characters spread over the seeded planets, each piloting one
/// seeded starship
async fn add_crew(pool: &SqlitePool, count: usize) {
    let planets: Vec<i64> = sqlx::query_scalar("SELECT id FROM planets ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap();
    let starships: Vec<i64> = sqlx::query_scalar("SELECT id FROM starships ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    for i in 0..count {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO characters (name, species, home_planet_id) VALUES (?, 'Human', ?) RETURNING id",
        )
        .bind(format!("Crew Member {i}"))
        .bind(planets[i % planets.len()])
        .fetch_one(&mut *tx)
        .await
        .unwrap();

        sqlx::query("INSERT INTO character_starships (character_id, starship_id) VALUES (?, ?)")
            .bind(id)
            .bind(starships[i % starships.len()])
            .execute(&mut *tx)
            .await
            .unwrap();
    }
    tx.commit().await.unwrap();
}

/// Resolve a few hundred characters with both relationship fields and
/// return the registry the request used
async fn resolve_large_roster() -> LoaderRegistry {
    let pool = seeded_pool().await;
    add_crew(&pool, 300).await;
    let schema = schema(&pool);

    let registry = LoaderRegistry::new(pool.clone(), BatchConfig::default());
    let request = async_graphql::Request::new(
        "{ allCharacters { name homePlanet { name } pilotedStarships { name } } }",
    )
    .data(registry.clone());

    let response = schema.execute(request).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let all = &data["allCharacters"];
    assert_eq!(all.as_array().unwrap().len(), 305);
    let crew = character(all, "Crew Member 7");
    assert!(crew["homePlanet"]["name"].is_string());
    assert_eq!(crew["pilotedStarships"].as_array().unwrap().len(), 1);

    registry
}

#[tokio::test]
async fn test_large_list_resolves_in_one_batch_per_loader() {
    let registry = resolve_large_roster().await;
    let loaders = registry.loaders();

    assert_eq!(loaders.planets.batches_dispatched(), 1);
    assert_eq!(loaders.character_starships.batches_dispatched(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_large_list_resolves_in_one_batch_per_loader_on_worker_pool() {
    let registry = resolve_large_roster().await;
    let loaders = registry.loaders();

    assert_eq!(loaders.planets.batches_dispatched(), 1);
    assert_eq!(loaders.character_starships.batches_dispatched(), 1);
}
