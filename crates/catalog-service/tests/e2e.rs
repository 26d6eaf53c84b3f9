use catalog_auth::prelude::*;
use catalog_blob::prelude::*;
use catalog_interceptors::prelude::*;
use catalog_service::client::connect;
use catalog_service::observe::CallObserver;
use catalog_service::prelude::*;
use catalog_storage::prelude::*;
use catalog_types::message::*;
use catalog_types::sample::new_laptop;
use catalog_types::{method, CallSignal, Filter, Laptop, Memory};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(String, Code)>>,
    uploaded: Mutex<u64>,
}

impl CallObserver for Recorder {
    fn call_finished(&self, method: &str, code: Code, _elapsed: Duration) {
        self.calls.lock().push((method.to_string(), code));
    }

    fn image_uploaded(&self, bytes: u64) {
        *self.uploaded.lock() += bytes;
    }
}

struct Fixture {
    server: Arc<CatalogServer>,
    store: Arc<InMemoryLaptopStore>,
    images: MemoryBlobSink,
    recorder: Arc<Recorder>,
}

impl Fixture {
    async fn new(max_image_bytes: u64) -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        seed_users(users.as_ref(), &UserSeed::defaults(), &PasswordHasher::light())
            .await
            .unwrap();

        let authority = Arc::new(TokenAuthority::new("secret", DEFAULT_TOKEN_TTL));
        let policy = Arc::new(AccessPolicy::laptop_service());
        let store = Arc::new(InMemoryLaptopStore::new());
        let images = MemoryBlobSink::new();
        let recorder = Arc::new(Recorder::default());

        let laptops = LaptopServer::new(
            store.clone(),
            Arc::new(images.clone()),
            Arc::new(InMemoryRatingStore::new()),
        )
        .with_max_image_bytes(max_image_bytes);
        let server = CatalogServer::new(
            ServerAuthGate::new(authority.clone(), policy),
            AuthServer::new(users, authority),
            laptops,
        )
        .with_observer(recorder.clone());

        Self {
            server: Arc::new(server),
            store,
            images,
            recorder,
        }
    }

    fn channel(&self) -> LocalChannel {
        LocalChannel::new(self.server.clone())
    }

    async fn client(&self, username: &str) -> (LaptopClient, Arc<ClientAuthGate>) {
        connect(
            self.channel(),
            username,
            "secret",
            AccessPolicy::laptop_service().protected_methods(),
            RefreshPolicy::default(),
        )
        .await
        .unwrap()
    }
}

fn laptop_with(price: f64, cores: u32, ghz: f64, ram_gb: u64) -> Laptop {
    let mut laptop = new_laptop();
    laptop.price_usd = price;
    laptop.cpu.number_cores = cores;
    laptop.cpu.min_ghz = ghz;
    laptop.ram = Memory::gigabytes(ram_gb);
    laptop
}

#[tokio::test]
async fn login_checks_credentials() {
    let fx = Fixture::new(1 << 20).await;
    let source = AuthClient::new(fx.channel(), "admin1", "secret");
    let token = source.login().await.unwrap();
    assert!(!token.is_empty());

    for (username, password) in [("admin1", "wrong"), ("ghost", "secret")] {
        let err = AuthClient::new(fx.channel(), username, password)
            .login()
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
        assert_eq!(err.message(), "incorrect username or password");
    }
}

#[tokio::test]
async fn create_requires_admin() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, _admin_gate) = fx.client("admin1").await;
    let (user, _user_gate) = fx.client("user1").await;
    let anonymous = LaptopClient::new(fx.channel());

    let id = admin.create_laptop(new_laptop()).await.unwrap();
    assert!(fx.store.find(&id).await.unwrap().is_some());

    let err = user.create_laptop(new_laptop()).await.unwrap_err();
    assert_eq!(err.code(), Code::PermissionDenied);

    let err = anonymous.create_laptop(new_laptop()).await.unwrap_err();
    assert_eq!(err.code(), Code::Unauthenticated);
    assert_eq!(fx.store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn create_validates_and_rejects_duplicates() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, _gate) = fx.client("admin1").await;

    let mut bad = new_laptop();
    bad.id = "invalid-uuid".into();
    assert_eq!(
        admin.create_laptop(bad).await.unwrap_err().code(),
        Code::InvalidArgument
    );

    let mut fresh = new_laptop();
    fresh.id.clear();
    let id = admin.create_laptop(fresh).await.unwrap();
    assert!(!id.is_empty());

    let laptop = new_laptop();
    admin.create_laptop(laptop.clone()).await.unwrap();
    assert_eq!(
        admin.create_laptop(laptop).await.unwrap_err().code(),
        Code::AlreadyExists
    );
}

#[tokio::test]
async fn search_streams_exactly_the_matches() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, _gate) = fx.client("admin1").await;
    let a = admin
        .create_laptop(laptop_with(1000.0, 4, 3.0, 8))
        .await
        .unwrap();
    admin
        .create_laptop(laptop_with(5000.0, 8, 4.0, 16))
        .await
        .unwrap();

    let anonymous = LaptopClient::new(fx.channel());
    let found = anonymous
        .search_laptop(Filter {
            max_price_usd: 3000.0,
            min_cpu_cores: 4,
            min_cpu_ghz: 2.5,
            min_ram: Memory::gigabytes(8),
        })
        .await
        .unwrap();

    let ids: Vec<_> = found.iter().map(|l| l.id.clone()).collect();
    assert_eq!(ids, vec![a]);
}

#[tokio::test]
async fn cancelled_search_ends_with_canceled() {
    let fx = Fixture::new(1 << 20).await;
    fx.store.save(&laptop_with(1000.0, 4, 3.0, 8)).await.unwrap();

    let signal = CallSignal::new();
    signal.cancel();
    let cx = fx
        .channel()
        .context_with_signal(method::SEARCH_LAPTOP, signal);
    let stream = fx
        .server
        .search_laptop(
            cx,
            SearchLaptopRequest {
                filter: Filter {
                    max_price_usd: 3000.0,
                    ..Filter::default()
                },
            },
        )
        .await
        .unwrap();

    let err = stream.collect().await.unwrap_err();
    assert_eq!(err.code(), Code::Canceled);
}

#[tokio::test]
async fn unread_cancelled_search_releases_writers() {
    let fx = Fixture::new(1 << 20).await;
    for _ in 0..40 {
        fx.store.save(&laptop_with(1000.0, 4, 3.0, 8)).await.unwrap();
    }

    let signal = CallSignal::new();
    let cx = fx
        .channel()
        .context_with_signal(method::SEARCH_LAPTOP, signal.clone());
    let _stream = fx
        .server
        .search_laptop(
            cx,
            SearchLaptopRequest {
                filter: Filter {
                    max_price_usd: 3000.0,
                    ..Filter::default()
                },
            },
        )
        .await
        .unwrap();

    // Nothing reads the stream, so the search fills the buffer and waits.
    tokio::time::sleep(Duration::from_millis(20)).await;
    signal.cancel();

    let saved = tokio::time::timeout(
        Duration::from_secs(2),
        fx.store.save(&laptop_with(1000.0, 4, 3.0, 8)),
    )
    .await
    .expect("writer must not wait on the cancelled search");
    assert!(saved.is_ok());

    let canceled = (method::SEARCH_LAPTOP.to_string(), Code::Canceled);
    tokio::time::timeout(Duration::from_secs(2), async {
        while !fx.recorder.calls.lock().contains(&canceled) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("search task must finish once cancelled");
}

#[tokio::test]
async fn create_observes_cancel_and_deadline() {
    let fx = Fixture::new(1 << 20).await;
    let (_admin, gate) = fx.client("admin1").await;
    let channel = fx.channel().with_gate(gate);

    let signal = CallSignal::new();
    signal.cancel();
    let cx = channel.context_with_signal(method::CREATE_LAPTOP, signal);
    let err = fx
        .server
        .create_laptop(cx, CreateLaptopRequest { laptop: new_laptop() })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Canceled);

    let expired = CallSignal::new().with_deadline(tokio::time::Instant::now());
    let cx = channel.context_with_signal(method::CREATE_LAPTOP, expired);
    let err = fx
        .server
        .create_laptop(cx, CreateLaptopRequest { laptop: new_laptop() })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);

    assert_eq!(fx.store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn upload_for_unknown_laptop_is_not_found() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, _gate) = fx.client("admin1").await;

    let err = admin
        .upload_image("936DA01F-9ABD-4D9D-80C7-02AF85C822A8", ".jpg", vec![1; 4096], 1024)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
    assert!(fx.images.is_empty());
}

#[tokio::test]
async fn unknown_laptop_upload_reads_no_chunk() {
    let fx = Fixture::new(1 << 20).await;
    let (_admin, gate) = fx.client("admin1").await;
    let cx = fx.channel().with_gate(gate).context(method::UPLOAD_IMAGE);

    // With room for one message, a send only succeeds once the previous one was read.
    let (sink, requests) = channel(1);
    let producer = tokio::spawn(async move {
        let mut messages = vec![UploadImageRequest::Info(UploadInfo {
            laptop_id: "936DA01F-9ABD-4D9D-80C7-02AF85C822A8".into(),
            image_type: ".jpg".into(),
        })];
        messages.extend((0..4).map(|_| UploadImageRequest::ChunkData(vec![1; 16])));

        let mut sent = 0;
        for message in messages {
            if sink.send(message).await.is_err() {
                break;
            }
            sent += 1;
        }
        sent
    });

    let err = fx.server.upload_image(cx, requests).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);

    let sent = producer.await.unwrap();
    assert!(sent <= 2, "server consumed image chunks: {sent} messages accepted");
    assert!(fx.images.is_empty());
}

#[tokio::test]
async fn stalled_upload_hits_its_deadline() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, gate) = fx.client("admin1").await;
    let id = admin.create_laptop(new_laptop()).await.unwrap();

    let signal = CallSignal::new().with_timeout(Duration::from_millis(50));
    let cx = fx
        .channel()
        .with_gate(gate)
        .context_with_signal(method::UPLOAD_IMAGE, signal);
    let (sink, requests) = channel(4);
    sink.send(UploadImageRequest::Info(UploadInfo {
        laptop_id: id,
        image_type: ".jpg".into(),
    }))
    .await
    .unwrap();
    sink.send(UploadImageRequest::ChunkData(vec![1; 16]))
        .await
        .unwrap();

    // The sender stays open without finishing the upload.
    let err = tokio::time::timeout(Duration::from_secs(2), fx.server.upload_image(cx, requests))
        .await
        .expect("upload must give up at its deadline")
        .unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);
    assert!(fx.images.is_empty());
    drop(sink);
}

#[tokio::test]
async fn upload_stores_chunks_in_order() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, _gate) = fx.client("admin1").await;
    let id = admin.create_laptop(new_laptop()).await.unwrap();

    let image: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let response = admin
        .upload_image(&id, ".jpg", image.clone(), 1024)
        .await
        .unwrap();

    assert_eq!(response.size, 5000);
    assert_eq!(&fx.images.get(&response.id).unwrap()[..], &image[..]);
    let info = fx.images.info(&response.id).unwrap();
    assert_eq!(info.laptop_id, id);
    assert_eq!(info.image_type, ".jpg");
    assert_eq!(*fx.recorder.uploaded.lock(), 5000);
}

#[tokio::test]
async fn upload_over_limit_is_invalid_argument() {
    let fx = Fixture::new(2048).await;
    let (admin, _gate) = fx.client("admin1").await;
    let id = admin.create_laptop(new_laptop()).await.unwrap();

    let err = admin
        .upload_image(&id, ".jpg", vec![0; 4096], 1024)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert!(fx.images.is_empty());
}

#[tokio::test]
async fn upload_requires_info_first() {
    let fx = Fixture::new(1 << 20).await;
    let (_admin, gate) = fx.client("admin1").await;
    let channel = fx.channel().with_gate(gate);

    let cx = channel.context(method::UPLOAD_IMAGE);
    let err = fx
        .server
        .upload_image(
            cx,
            Streaming::from_iter(vec![UploadImageRequest::ChunkData(vec![1, 2, 3])]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);

    let cx = channel.context(method::UPLOAD_IMAGE);
    let err = fx
        .server
        .upload_image(cx, Streaming::from_iter(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn user_cannot_upload() {
    let fx = Fixture::new(1 << 20).await;
    let (user, _gate) = fx.client("user1").await;
    let id = fx.store.save(&new_laptop()).await.unwrap();

    let err = user
        .upload_image(&id, ".jpg", vec![0; 10], 4)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::PermissionDenied);
}

#[tokio::test]
async fn ratings_report_running_average() {
    let fx = Fixture::new(1 << 20).await;
    let (user, _gate) = fx.client("user1").await;
    let id = fx.store.save(&new_laptop()).await.unwrap();

    let ids = vec![id.clone(), id.clone(), id.clone()];
    let responses = user.rate_laptop(&ids, &[4.0, 5.0, 3.0]).await.unwrap();

    let averages: Vec<f64> = responses.iter().map(|r| r.average_score).collect();
    assert_eq!(averages, vec![4.0, 4.5, 4.0]);
    let counts: Vec<u32> = responses.iter().map(|r| r.rated_count).collect();
    assert_eq!(counts, vec![1, 2, 3]);
    assert!(responses.iter().all(|r| r.laptop_id == id));
}

#[tokio::test]
async fn rating_unknown_laptop_ends_stream_with_not_found() {
    let fx = Fixture::new(1 << 20).await;
    let (admin, _gate) = fx.client("admin1").await;
    let id = fx.store.save(&new_laptop()).await.unwrap();

    let ids = vec![id, "missing".to_string()];
    let err = admin.rate_laptop(&ids, &[7.0, 8.0]).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[tokio::test]
async fn cancelled_rating_ends_while_client_is_idle() {
    let fx = Fixture::new(1 << 20).await;
    let (_user, gate) = fx.client("user1").await;
    let id = fx.store.save(&new_laptop()).await.unwrap();

    let signal = CallSignal::new();
    let cx = fx
        .channel()
        .with_gate(gate)
        .context_with_signal(method::RATE_LAPTOP, signal.clone());
    let (sink, requests) = channel(4);
    let mut responses = fx.server.rate_laptop(cx, requests).await.unwrap();

    sink.send(RateLaptopRequest {
        laptop_id: id,
        score: 5.0,
    })
    .await
    .unwrap();
    let first = responses.message().await.unwrap().unwrap();
    assert_eq!(first.rated_count, 1);

    signal.cancel();
    let err = tokio::time::timeout(Duration::from_secs(2), responses.message())
        .await
        .expect("rating must stop once cancelled")
        .unwrap_err();
    assert_eq!(err.code(), Code::Canceled);
    drop(sink);
}

#[tokio::test]
async fn anonymous_rating_is_unauthenticated() {
    let fx = Fixture::new(1 << 20).await;
    let anonymous = LaptopClient::new(fx.channel());
    let err = anonymous
        .rate_laptop(&["x".to_string()], &[1.0])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn observer_sees_every_call() {
    let fx = Fixture::new(1 << 20).await;
    let anonymous = LaptopClient::new(fx.channel());
    let _ = anonymous.create_laptop(new_laptop()).await;
    anonymous.search_laptop(Filter::default()).await.unwrap();

    // The search task reports after the stream ends; give it a moment.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let calls = fx.recorder.calls.lock().clone();
    assert!(calls.contains(&(method::CREATE_LAPTOP.to_string(), Code::Unauthenticated)));
    assert!(calls.contains(&(method::SEARCH_LAPTOP.to_string(), Code::Ok)));
}
