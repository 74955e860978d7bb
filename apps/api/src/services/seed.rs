//! Sample catalog data
//!
//! Fills an empty catalog with a handful of planets, characters, starships
//! and pilot pairs. Everything is inserted in one transaction.

use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::EntityId;

const PLANETS: &[(&str, &str, &str)] = &[
    ("Tatooine", "Arid", "Desert"),
    ("Alderaan", "Temperate", "Grasslands, Mountains"),
    ("Yavin IV", "Temperate, Humid", "Jungle, Rainforests"),
    ("Naboo", "Temperate", "Grassy Hills, Swamps"),
    ("Coruscant", "Temperate", "Cityscape"),
];

/// (name, species, home planet)
const CHARACTERS: &[(&str, &str, Option<&str>)] = &[
    ("Luke Skywalker", "Human", Some("Tatooine")),
    ("Leia Organa", "Human", Some("Alderaan")),
    ("Han Solo", "Human", None),
    ("C-3PO", "Droid", None),
    ("Yoda", "Unknown", None),
];

const STARSHIPS: &[(&str, &str, &str)] = &[
    ("Millennium Falcon", "YT-1300 light freighter", "Corellian Engineering"),
    ("X-wing", "T-65 X-wing starfighter", "Incom Corporation"),
    ("TIE Fighter", "TIE/LN starfighter", "Sienar Fleet Systems"),
];

/// (character, starship)
const PILOTS: &[(&str, &str)] = &[
    ("Han Solo", "Millennium Falcon"),
    ("Luke Skywalker", "X-wing"),
];

/// Seed the catalog if it has no characters yet
///
/// Returns `true` if data was inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let characters: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters")
        .fetch_one(pool)
        .await?;

    if characters > 0 {
        tracing::debug!(characters, "Catalog already populated, skipping seed");
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    seed(&mut tx).await?;
    tx.commit().await?;

    tracing::info!(
        planets = PLANETS.len(),
        characters = CHARACTERS.len(),
        starships = STARSHIPS.len(),
        "Seeded catalog"
    );
    Ok(true)
}

async fn seed(tx: &mut Transaction<'_, Sqlite>) -> Result<(), sqlx::Error> {
    let mut planet_ids = HashMap::new();
    for &(name, climate, terrain) in PLANETS {
        let id: EntityId = sqlx::query_scalar(
            "INSERT INTO planets (name, climate, terrain) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(climate)
        .bind(terrain)
        .fetch_one(&mut **tx)
        .await?;
        planet_ids.insert(name, id);
    }

    let mut character_ids = HashMap::new();
    for &(name, species, home_planet) in CHARACTERS {
        let home_planet_id = home_planet.and_then(|planet| planet_ids.get(planet).copied());
        let id: EntityId = sqlx::query_scalar(
            "INSERT INTO characters (name, species, home_planet_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(species)
        .bind(home_planet_id)
        .fetch_one(&mut **tx)
        .await?;
        character_ids.insert(name, id);
    }

    let mut starship_ids = HashMap::new();
    for &(name, model, manufacturer) in STARSHIPS {
        let id: EntityId = sqlx::query_scalar(
            "INSERT INTO starships (name, model, manufacturer) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(model)
        .bind(manufacturer)
        .fetch_one(&mut **tx)
        .await?;
        starship_ids.insert(name, id);
    }

    for &(character, starship) in PILOTS {
        if let (Some(character_id), Some(starship_id)) =
            (character_ids.get(character).copied(), starship_ids.get(starship).copied())
        {
            sqlx::query("INSERT INTO character_starships (character_id, starship_id) VALUES (?, ?)")
                .bind(character_id)
                .bind(starship_id)
                .execute(&mut **tx)
                .await?;
        }
    }

    Ok(())
}
