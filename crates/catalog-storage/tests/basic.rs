use async_trait::async_trait;
use catalog_errors::codes;
use catalog_storage::prelude::*;
use catalog_types::sample::new_laptop;
use catalog_types::{CallSignal, Filter, Laptop, Memory};
use std::sync::Arc;

#[derive(Default)]
struct Collect {
    seen: Vec<Laptop>,
}

#[async_trait]
impl SearchVisitor for Collect {
    async fn visit(&mut self, laptop: Laptop) -> Result<(), StorageError> {
        self.seen.push(laptop);
        Ok(())
    }
}

struct FailAfter {
    remaining: usize,
    visited: usize,
}

#[async_trait]
impl SearchVisitor for FailAfter {
    async fn visit(&mut self, _laptop: Laptop) -> Result<(), StorageError> {
        if self.remaining == 0 {
            return Err(StorageError::internal("cannot send laptop"));
        }
        self.remaining -= 1;
        self.visited += 1;
        Ok(())
    }
}

/// Never returns from its first visit.
struct Stall;

#[async_trait]
impl SearchVisitor for Stall {
    async fn visit(&mut self, _laptop: Laptop) -> Result<(), StorageError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

fn priced(price: f64, cores: u32, ghz: f64, ram_gb: u64) -> Laptop {
    let mut laptop = new_laptop();
    laptop.id = String::new();
    laptop.price_usd = price;
    laptop.cpu.number_cores = cores;
    laptop.cpu.min_ghz = ghz;
    laptop.ram = Memory::gigabytes(ram_gb);
    laptop
}

fn documented_filter() -> Filter {
    Filter {
        max_price_usd: 3000.0,
        min_cpu_cores: 4,
        min_cpu_ghz: 2.5,
        min_ram: Memory::gigabytes(8),
    }
}

#[tokio::test]
async fn save_assigns_id_when_empty() {
    let store = InMemoryLaptopStore::new();
    let mut laptop = new_laptop();
    laptop.id.clear();

    let id = store.save(&laptop).await.unwrap();
    assert!(!id.is_empty());
    let found = store.find(&id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
}

#[tokio::test]
async fn save_rejects_non_uuid() {
    let store = InMemoryLaptopStore::new();
    let mut laptop = new_laptop();
    laptop.id = "invalid-uuid".into();

    let err = store.save(&laptop).await.unwrap_err();
    assert!(err.is(codes::SCHEMA_VALIDATION));
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_save_never_overwrites() {
    let store = InMemoryLaptopStore::new();
    let laptop = new_laptop();
    store.save(&laptop).await.unwrap();

    let mut other = laptop.clone();
    other.brand = "Changed".into();
    let err = store.save(&other).await.unwrap_err();
    assert!(err.is(codes::STORAGE_ALREADY_EXISTS));

    let kept = store.find(&laptop.id).await.unwrap().unwrap();
    assert_eq!(kept.brand, laptop.brand);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_of_same_id_admit_exactly_one() {
    let store = Arc::new(InMemoryLaptopStore::new());
    let laptop = new_laptop();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let laptop = laptop.clone();
            tokio::spawn(async move { store.save(&laptop).await })
        })
        .collect();

    let mut ok = 0;
    let mut exists = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(err) if err.is(codes::STORAGE_ALREADY_EXISTS) => exists += 1,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(exists, 15);
}

#[tokio::test]
async fn find_returns_independent_copy() {
    let store = InMemoryLaptopStore::new();
    let laptop = new_laptop();
    store.save(&laptop).await.unwrap();

    let mut copy = store.find(&laptop.id).await.unwrap().unwrap();
    assert_eq!(copy, laptop);
    copy.price_usd = 1.0;
    copy.gpus.clear();

    let again = store.find(&laptop.id).await.unwrap().unwrap();
    assert_eq!(again, laptop);
}

#[tokio::test]
async fn find_unknown_is_none() {
    let store = InMemoryLaptopStore::new();
    assert!(store.find("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn search_yields_only_qualified() {
    let store = InMemoryLaptopStore::new();
    let a = store.save(&priced(1000.0, 4, 3.0, 8)).await.unwrap();
    store.save(&priced(5000.0, 8, 4.0, 16)).await.unwrap();

    let mut collect = Collect::default();
    store
        .search(&CallSignal::new(), &documented_filter(), &mut collect)
        .await
        .unwrap();

    let ids: Vec<_> = collect.seen.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![a.as_str()]);
}

#[tokio::test]
async fn search_stops_on_visitor_error() {
    let store = InMemoryLaptopStore::new();
    for _ in 0..5 {
        store.save(&priced(1000.0, 4, 3.0, 8)).await.unwrap();
    }

    let mut visitor = FailAfter {
        remaining: 2,
        visited: 0,
    };
    let err = store
        .search(&CallSignal::new(), &documented_filter(), &mut visitor)
        .await
        .unwrap_err();
    assert!(err.is(codes::UNKNOWN_INTERNAL));
    assert_eq!(visitor.visited, 2);
}

#[tokio::test]
async fn cancelled_search_reports_canceled() {
    let store = InMemoryLaptopStore::new();
    store.save(&priced(1000.0, 4, 3.0, 8)).await.unwrap();

    let signal = CallSignal::new();
    signal.cancel();
    let mut collect = Collect::default();
    let err = store
        .search(&signal, &documented_filter(), &mut collect)
        .await
        .unwrap_err();
    assert!(err.is(codes::CALL_CANCELED));
    assert!(collect.seen.is_empty());
}

#[tokio::test(start_paused = true)]
async fn expired_search_reports_deadline() {
    let store = InMemoryLaptopStore::new();
    store.save(&priced(1000.0, 4, 3.0, 8)).await.unwrap();

    let signal = CallSignal::new().with_timeout(std::time::Duration::from_millis(10));
    tokio::time::advance(std::time::Duration::from_millis(20)).await;
    let mut collect = Collect::default();
    let err = store
        .search(&signal, &documented_filter(), &mut collect)
        .await
        .unwrap_err();
    assert!(err.is(codes::CALL_DEADLINE_EXCEEDED));
}

#[tokio::test]
async fn stalled_visitor_does_not_block_writers() {
    let store = Arc::new(InMemoryLaptopStore::new());
    for _ in 0..40 {
        store.save(&priced(1000.0, 4, 3.0, 8)).await.unwrap();
    }

    let searching = Arc::clone(&store);
    let search = tokio::spawn(async move {
        searching
            .search(&CallSignal::new(), &documented_filter(), &mut Stall)
            .await
    });
    tokio::task::yield_now().await;

    let saved = tokio::time::timeout(
        std::time::Duration::from_secs(2),
        store.save(&priced(1000.0, 4, 3.0, 8)),
    )
    .await
    .expect("save must not wait on the stalled search");
    assert!(saved.is_ok());
    assert_eq!(store.len().await.unwrap(), 41);
    assert!(!search.is_finished());
    search.abort();
}

#[tokio::test]
async fn persistent_store_is_unavailable() {
    let store = PersistentLaptopStore::new("postgres://localhost/catalog");
    let err = store.save(&new_laptop()).await.unwrap_err();
    assert!(err.is(codes::STORAGE_UNAVAILABLE));
    assert!(store.find("x").await.is_err());
}

#[test]
fn ratings_accumulate_per_laptop() {
    let store = InMemoryRatingStore::new();
    store.add("a", 10.0).unwrap();
    let b = store.add("b", 2.0).unwrap();
    assert_eq!(b.count, 1);
    assert_eq!(store.add("a", 6.0).unwrap().average(), 8.0);
}
