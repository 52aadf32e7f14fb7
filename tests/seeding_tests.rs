//! Integration tests for the seeding phases on an in-memory database.

mod test_utils;

use chrono::{TimeDelta, Utc};
use marketplace_seeder::error::SeedError;
use marketplace_seeder::models::{EntityKind, bid};
use marketplace_seeder::repositories::{AccountRepository, BidRepository, ProductRepository};
use marketplace_seeder::seeds::{
    GenerateAccounts, GenerateBids, LoadCities, PipelineError, SeedPhase, SeedPipeline,
    generate_accounts, generate_bids, generate_bids_for_product, load_cities, load_products,
    place_bid,
};
use marketplace_seeder::sequencer::chain_epoch;
use marketplace_seeder::sheets::{CityRow, ProductRow};
use sea_orm::{ActiveModelTrait, Set};
use std::path::PathBuf;
use test_utils::{insert_account, insert_city, insert_product, setup_test_context};

fn city_row(id: i32, name: &str) -> CityRow {
    CityRow {
        id,
        name: name.to_string(),
        latitude: 1.0,
        longitude: 2.0,
    }
}

fn product_row(id: i32, brand: &str, model: &str, price: f64) -> ProductRow {
    ProductRow {
        id,
        brand: brand.to_string(),
        model: model.to_string(),
        body_type: "Sedan".to_string(),
        year: 2019,
        price,
    }
}

#[tokio::test]
async fn loading_one_city_encodes_location() {
    let mut ctx = setup_test_context().await.unwrap();

    let cities = load_cities(&mut ctx, &[city_row(1, "A")]).await.unwrap();

    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].id, 1);
    assert_eq!(cities[0].name, "A");
    assert_eq!(cities[0].location, "(1.0,2.0)");
}

#[tokio::test]
async fn duplicate_city_id_is_an_integrity_error() {
    let mut ctx = setup_test_context().await.unwrap();

    let err = load_cities(&mut ctx, &[city_row(1, "A"), city_row(1, "B")])
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::Integrity { .. }));
    assert!(err.is_unique_violation());
}

#[tokio::test]
async fn generated_accounts_have_strictly_increasing_timestamps() {
    let mut ctx = setup_test_context().await.unwrap();
    load_cities(&mut ctx, &[city_row(1, "A"), city_row(2, "B")])
        .await
        .unwrap();

    let accounts = generate_accounts(&mut ctx, 3, TimeDelta::minutes(7200))
        .await
        .unwrap();

    assert_eq!(accounts.len(), 3);
    assert!(accounts[0].created_at.with_timezone(&Utc) >= chain_epoch());
    for pair in accounts.windows(2) {
        assert!(pair[1].created_at > pair[0].created_at);
    }
    for account in &accounts {
        assert!([1, 2].contains(&account.city_id));
        assert!(!account.name.is_empty());
        assert!(!account.phone_number.is_empty());
        assert!(!account.address.is_empty());
    }
}

#[tokio::test]
async fn account_generation_resumes_from_latest_account() {
    let mut ctx = setup_test_context().await.unwrap();
    load_cities(&mut ctx, &[city_row(1, "A")]).await.unwrap();
    let start = chain_epoch() + TimeDelta::days(365);
    let existing = insert_account(&ctx.db, 1, start).await.unwrap();

    let accounts = generate_accounts(&mut ctx, 2, TimeDelta::minutes(60))
        .await
        .unwrap();

    assert!(accounts[0].created_at > existing.created_at);
    assert!(accounts[0].created_at.with_timezone(&Utc) < start + TimeDelta::minutes(60));
    assert!(accounts[1].created_at > accounts[0].created_at);
    let latest = AccountRepository::new(ctx.db.clone())
        .latest()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, accounts[1].id);
}

#[tokio::test]
async fn accounts_without_cities_report_missing_reference() {
    let mut ctx = setup_test_context().await.unwrap();

    let err = generate_accounts(&mut ctx, 1, TimeDelta::minutes(7200))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SeedError::MissingReference {
            entity: EntityKind::City
        }
    ));
}

#[tokio::test]
async fn zero_accounts_needs_no_cities() {
    let mut ctx = setup_test_context().await.unwrap();
    let accounts = generate_accounts(&mut ctx, 0, TimeDelta::minutes(7200))
        .await
        .unwrap();
    assert!(accounts.is_empty());
}

#[tokio::test]
async fn products_are_listed_after_their_seller_joined() {
    let mut ctx = setup_test_context().await.unwrap();
    load_cities(&mut ctx, &[city_row(1, "A")]).await.unwrap();
    generate_accounts(&mut ctx, 5, TimeDelta::minutes(7200))
        .await
        .unwrap();

    let rows = vec![
        product_row(10, "Toyota", "Avanza", 150_000_000.0),
        product_row(11, "Toyota", "Avanza", 160_000_000.0),
        product_row(12, "Honda", "Jazz", 120_000_000.0),
    ];
    let products = load_products(&mut ctx, &rows).await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].model_id, products[1].model_id);
    assert_ne!(products[0].model_id, products[2].model_id);

    let accounts = AccountRepository::new(ctx.db.clone()).find_all().await.unwrap();
    for product in &products {
        let seller = accounts
            .iter()
            .find(|account| account.id == product.account_id)
            .unwrap();
        assert!(product.created_at >= seller.created_at);
        assert!(product.created_at.with_timezone(&Utc) <= ctx.now);
        assert!(product.deleted_at.is_none());
        assert_eq!(product.year, 2019);
    }
}

#[tokio::test]
async fn products_without_accounts_report_missing_reference() {
    let mut ctx = setup_test_context().await.unwrap();
    load_cities(&mut ctx, &[city_row(1, "A")]).await.unwrap();

    let err = load_products(&mut ctx, &[product_row(1, "Toyota", "Avanza", 1.0)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SeedError::MissingReference {
            entity: EntityKind::Account
        }
    ));
}

#[tokio::test]
async fn single_bid_stays_within_price_band() {
    let mut ctx = setup_test_context().await.unwrap();
    let city = insert_city(&ctx.db, 1, "A").await.unwrap();
    let listed_at = chain_epoch() + TimeDelta::days(10);
    let seller = insert_account(&ctx.db, city.id, chain_epoch()).await.unwrap();
    let product = insert_product(&ctx.db, 1, &seller, 1000.0, listed_at, None)
        .await
        .unwrap();

    let placed = place_bid(&mut ctx, &product, 0.05).await.unwrap();

    assert!((950.0..=1050.0).contains(&placed.price));
    assert_eq!(placed.price, placed.price.ceil());
    assert_eq!(placed.status, bid::STATUS_SENT);
    assert_eq!(placed.product_id, product.id);
    assert!(placed.created_at >= product.created_at);
    assert!(placed.created_at.with_timezone(&Utc) <= ctx.now);
}

#[tokio::test]
async fn bid_chain_continues_from_latest_bid() {
    let mut ctx = setup_test_context().await.unwrap();
    let city = insert_city(&ctx.db, 1, "A").await.unwrap();
    let seller = insert_account(&ctx.db, city.id, chain_epoch()).await.unwrap();
    let product = insert_product(&ctx.db, 1, &seller, 1000.0, chain_epoch(), None)
        .await
        .unwrap();

    let mut previous = place_bid(&mut ctx, &product, 0.05).await.unwrap();
    for _ in 0..10 {
        let next = place_bid(&mut ctx, &product, 0.05).await.unwrap();
        assert!(next.created_at >= previous.created_at);
        assert!(next.price >= (previous.price * 0.95).floor());
        assert!(next.price <= (previous.price * 1.05).ceil() + 1.0);
        previous = next;
    }

    let stored = BidRepository::new(ctx.db.clone())
        .find_by_product(product.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 11);
}

#[tokio::test]
async fn next_bid_walks_from_latest_bid_not_listing_price() {
    let mut ctx = setup_test_context().await.unwrap();
    let city = insert_city(&ctx.db, 1, "A").await.unwrap();
    let seller = insert_account(&ctx.db, city.id, chain_epoch()).await.unwrap();
    let product = insert_product(&ctx.db, 1, &seller, 1000.0, chain_epoch(), None)
        .await
        .unwrap();
    let prior_at = chain_epoch() + TimeDelta::days(200);
    let prior = bid::ActiveModel {
        account_id: Set(seller.id),
        product_id: Set(product.id),
        price: Set(5000.0),
        status: Set(bid::STATUS_SENT.to_string()),
        created_at: Set(prior_at.into()),
        ..Default::default()
    }
    .insert(ctx.db.as_ref())
    .await
    .unwrap();

    for _ in 0..5 {
        let latest = BidRepository::new(ctx.db.clone())
            .latest_for_product(product.id)
            .await
            .unwrap()
            .unwrap();
        let next = place_bid(&mut ctx, &product, 0.05).await.unwrap();
        assert!(next.id > latest.id);
        assert!(next.created_at >= latest.created_at);
        assert!(next.created_at >= prior.created_at);
        assert!(next.price >= (latest.price * 0.95).floor());
        assert!(next.price <= (latest.price * 1.05).ceil() + 1.0);
    }

    let first_after_prior = BidRepository::new(ctx.db.clone())
        .find_by_product(product.id)
        .await
        .unwrap()[1]
        .clone();
    assert!((4750.0..=5250.0).contains(&first_after_prior.price));
}

#[tokio::test]
async fn per_product_bid_count_respects_maximum() {
    let mut ctx = setup_test_context().await.unwrap();
    let city = insert_city(&ctx.db, 1, "A").await.unwrap();
    let seller = insert_account(&ctx.db, city.id, chain_epoch()).await.unwrap();
    let product = insert_product(&ctx.db, 1, &seller, 500.0, chain_epoch(), None)
        .await
        .unwrap();

    for _ in 0..5 {
        let placed = generate_bids_for_product(&mut ctx, &product, 3, 0.05)
            .await
            .unwrap();
        assert!(placed.len() <= 3);
    }

    let none = generate_bids_for_product(&mut ctx, &product, 0, 0.05)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn soft_deleted_products_receive_no_bids() {
    let mut ctx = setup_test_context().await.unwrap();
    let city = insert_city(&ctx.db, 1, "A").await.unwrap();
    let seller = insert_account(&ctx.db, city.id, chain_epoch()).await.unwrap();
    let active = insert_product(&ctx.db, 1, &seller, 1000.0, chain_epoch(), None)
        .await
        .unwrap();
    let deleted = insert_product(
        &ctx.db,
        2,
        &seller,
        1000.0,
        chain_epoch(),
        Some(chain_epoch() + TimeDelta::days(1)),
    )
    .await
    .unwrap();

    let total = generate_bids(&mut ctx, 15, 0.05).await.unwrap();

    let bids = BidRepository::new(ctx.db.clone());
    assert_eq!(bids.find_by_product(active.id).await.unwrap().len(), total);
    assert!(bids.find_by_product(deleted.id).await.unwrap().is_empty());

    let active_ids: Vec<i32> = ProductRepository::new(ctx.db.clone())
        .find_active()
        .await
        .unwrap()
        .iter()
        .map(|product| product.id)
        .collect();
    assert_eq!(active_ids, vec![active.id]);
}

#[tokio::test]
async fn pipeline_runs_account_and_bid_phases_in_order() {
    let mut ctx = setup_test_context().await.unwrap();
    let city = insert_city(&ctx.db, 1, "A").await.unwrap();
    let seller = insert_account(&ctx.db, city.id, chain_epoch()).await.unwrap();
    insert_product(&ctx.db, 1, &seller, 1000.0, chain_epoch(), None)
        .await
        .unwrap();

    // Cities and products already exist; declare them through a phase that
    // loads nothing so the pipeline accepts the ordering.
    struct Existing;

    #[async_trait::async_trait]
    impl SeedPhase for Existing {
        fn name(&self) -> &'static str {
            "existing"
        }
        fn requires(&self) -> &'static [EntityKind] {
            &[]
        }
        fn produces(&self) -> &'static [EntityKind] {
            &[EntityKind::City, EntityKind::Product]
        }
        async fn run(
            &self,
            _ctx: &mut marketplace_seeder::seeds::SeedContext,
        ) -> Result<marketplace_seeder::seeds::PhaseReport, SeedError> {
            Ok(marketplace_seeder::seeds::PhaseReport {
                phase: "existing",
                created: 0,
            })
        }
    }

    let pipeline = SeedPipeline::new(vec![
        Box::new(Existing),
        Box::new(GenerateAccounts {
            count: 4,
            window: TimeDelta::minutes(30),
        }),
        Box::new(GenerateBids {
            max_per_product: 15,
            precision: 0.05,
        }),
    ])
    .unwrap();

    let reports = pipeline.run(&mut ctx).await.unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[1].phase, "accounts");
    assert_eq!(reports[1].created, 4);
    assert_eq!(reports[2].phase, "bids");
    let stored = BidRepository::new(ctx.db.clone()).find_all().await.unwrap();
    assert_eq!(stored.len(), reports[2].created);
}

#[tokio::test]
async fn pipeline_rejects_bids_before_products() {
    let err = SeedPipeline::new(vec![
        Box::new(LoadCities {
            path: PathBuf::from("files/city.xlsx"),
            sheet: "city".to_string(),
        }),
        Box::new(GenerateAccounts {
            count: 1,
            window: TimeDelta::minutes(1),
        }),
        Box::new(GenerateBids {
            max_per_product: 1,
            precision: 0.05,
        }),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        PipelineError::UnsatisfiedRequirement {
            phase: "bids",
            entity: EntityKind::Product,
        }
    );
}

#[tokio::test]
async fn missing_city_workbook_aborts_the_phase() {
    let mut ctx = setup_test_context().await.unwrap();
    let phase = LoadCities {
        path: PathBuf::from("does/not/exist.xlsx"),
        sheet: "city".to_string(),
    };

    let err = phase.run(&mut ctx).await.unwrap_err();

    assert!(matches!(err, SeedError::Sheet(_)));
}
