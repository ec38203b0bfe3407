mod common;

use common::{child_rows, db_state, drop_schema, input};
use pokedex_api::schema::{ABILITIES_TABLE, STATS_TABLE, TYPES_TABLE};
use pokedex_api::{Ability, AppError, PageRequest, Stat, Type};
use std::collections::HashSet;

#[tokio::test]
async fn create_then_fetch_round_trips() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let data = input("Bulbasaur");

    let id = service.create(&data).await.unwrap();
    let stored = service.fetch_by_id(id).await.unwrap().expect("stored");

    assert_eq!(stored.id, id);
    assert_eq!(stored.name, data.name);
    assert_eq!(stored.height, data.height);
    assert_eq!(stored.weight, data.weight);
    assert_eq!(stored.xp, data.xp);
    assert_eq!(stored.image_url, data.image_url);
    assert_eq!(stored.pokemon_url, data.pokemon_url);
    assert_eq!(stored.abilities, data.abilities);
    assert_eq!(stored.stats, data.stats);
    assert_eq!(stored.types, data.types);

    let by_name = service.fetch_by_name("Bulbasaur").await.unwrap().expect("by name");
    assert_eq!(by_name, stored);
    drop_schema(&state).await;
}

#[tokio::test]
async fn lookups_of_missing_records_are_absent() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    service.create(&input("Pikachu")).await.unwrap();

    assert!(service.fetch_by_id(9999).await.unwrap().is_none());
    assert!(service.fetch_by_name("Raichu").await.unwrap().is_none());
    // exact match only
    assert!(service.fetch_by_name("pikachu").await.unwrap().is_none());
    drop_schema(&state).await;
}

#[tokio::test]
async fn duplicate_name_is_a_conflict_and_leaves_store_unchanged() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let id = service.create(&input("Eevee")).await.unwrap();

    let mut dup = input("Eevee");
    dup.xp = 1;
    dup.abilities.clear();
    let err = service.create(&dup).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    assert_eq!(service.count().await.unwrap(), 1);
    let stored = service.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.xp, 64);
    assert_eq!(stored.abilities.len(), 2);
    drop_schema(&state).await;
}

#[tokio::test]
async fn update_replaces_scalars_and_every_child() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let id = service.create(&input("Ivysaur")).await.unwrap();

    let mut data = input("Venusaur");
    data.height = 20;
    data.weight = 1000;
    data.xp = 236;
    data.abilities = vec![Ability {
        name: "Thick Fat".into(),
        is_hidden: true,
    }];
    data.stats = vec![];
    data.types = vec![
        Type {
            name: "Poison".into(),
        },
        Type {
            name: "Grass".into(),
        },
        Type {
            name: "Dragon".into(),
        },
    ];
    service.update(id, &data).await.unwrap();

    let stored = service.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Venusaur");
    assert_eq!((stored.height, stored.weight, stored.xp), (20, 1000, 236));
    assert_eq!(stored.abilities, data.abilities);
    assert!(stored.stats.is_empty());
    assert_eq!(stored.types, data.types);

    assert_eq!(child_rows(&state, ABILITIES_TABLE, id).await, 1);
    assert_eq!(child_rows(&state, STATS_TABLE, id).await, 0);
    assert_eq!(child_rows(&state, TYPES_TABLE, id).await, 3);
    assert!(service.fetch_by_name("Ivysaur").await.unwrap().is_none());
    drop_schema(&state).await;
}

#[tokio::test]
async fn update_keeping_same_name_succeeds() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let id = service.create(&input("Snorlax")).await.unwrap();

    let mut data = input("Snorlax");
    data.stats.push(Stat {
        name: "speed".into(),
        base_stat: 30,
    });
    service.update(id, &data).await.unwrap();

    let stored = service.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.stats.len(), 3);
    assert_eq!(stored.stats[2].name, "speed");
    drop_schema(&state).await;
}

#[tokio::test]
async fn update_to_taken_name_conflicts_and_rolls_back() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    service.create(&input("Charmander")).await.unwrap();
    let id = service.create(&input("Squirtle")).await.unwrap();

    let mut data = input("Charmander");
    data.abilities.clear();
    let err = service.update(id, &data).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let stored = service.fetch_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Squirtle");
    assert_eq!(stored.abilities.len(), 2);
    assert_eq!(child_rows(&state, ABILITIES_TABLE, id).await, 2);
    drop_schema(&state).await;
}

#[tokio::test]
async fn update_of_missing_id_is_not_found() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let err = service.update(42, &input("Mew")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
    assert_eq!(service.count().await.unwrap(), 0);
    drop_schema(&state).await;
}

#[tokio::test]
async fn delete_removes_record_and_children() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let id = service.create(&input("Gengar")).await.unwrap();
    let other = service.create(&input("Haunter")).await.unwrap();

    assert!(service.delete(id).await.unwrap());
    assert!(service.fetch_by_id(id).await.unwrap().is_none());
    for table in [ABILITIES_TABLE, STATS_TABLE, TYPES_TABLE] {
        assert_eq!(child_rows(&state, table, id).await, 0, "orphans in {table}");
    }
    assert_eq!(child_rows(&state, ABILITIES_TABLE, other).await, 2);

    assert!(!service.delete(id).await.unwrap());
    drop_schema(&state).await;
}

#[tokio::test]
async fn deleting_parent_row_directly_cascades() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let id = service.create(&input("Onix")).await.unwrap();

    sqlx::query(&format!("DELETE FROM {} WHERE id = $1", state.tables.pokemon()))
        .bind(id)
        .execute(&state.pool)
        .await
        .unwrap();
    for table in [ABILITIES_TABLE, STATS_TABLE, TYPES_TABLE] {
        assert_eq!(child_rows(&state, table, id).await, 0);
    }
    drop_schema(&state).await;
}

#[tokio::test]
async fn pages_partition_records_without_overlap_or_gap() {
    let Some(state) = db_state().await else { return };
    let service = state.pokemon_service();
    let mut created = Vec::new();
    for i in 0..45 {
        created.push(service.create(&input(&format!("Unown{:02}", i))).await.unwrap());
    }

    let page = |n| PageRequest::new(n, 20, None).unwrap();
    let first = service.fetch_all(page(1)).await.unwrap();
    let second = service.fetch_all(page(2)).await.unwrap();
    let third = service.fetch_all(page(3)).await.unwrap();
    let fourth = service.fetch_all(page(4)).await.unwrap();

    assert_eq!(first.len(), 20);
    assert_eq!(second.len(), 20);
    assert_eq!(third.len(), 5);
    assert!(fourth.is_empty());

    let ids: Vec<i32> = first.iter().chain(&second).chain(&third).map(|p| p.id).collect();
    assert_eq!(ids, created);
    let unique: HashSet<i32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), 45);
    assert_eq!(first[0].abilities.len(), 2);
    assert_eq!(service.count().await.unwrap(), 45);
    drop_schema(&state).await;
}
