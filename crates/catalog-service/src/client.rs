use crate::channel::LocalChannel;
use async_trait::async_trait;
use catalog_interceptors::prelude::*;
use catalog_types::message::*;
use catalog_types::{method, Filter, Laptop};
use std::sync::Arc;

/// Logs in with fixed credentials. Used as the token source of a [`ClientAuthGate`].
pub struct AuthClient {
    channel: LocalChannel,
    username: String,
    password: String,
}

impl AuthClient {
    pub fn new(
        channel: LocalChannel,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl TokenSource for AuthClient {
    async fn login(&self) -> Result<String, Status> {
        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        let cx = self.channel.context(method::LOGIN);
        let response = self.channel.server().login(cx, request).await?;
        Ok(response.access_token)
    }
}

pub struct LaptopClient {
    channel: LocalChannel,
}

impl LaptopClient {
    pub fn new(channel: LocalChannel) -> Self {
        Self { channel }
    }

    pub async fn create_laptop(&self, laptop: Laptop) -> Result<String, Status> {
        let cx = self.channel.context(method::CREATE_LAPTOP);
        let response = self
            .channel
            .server()
            .create_laptop(cx, CreateLaptopRequest { laptop })
            .await?;
        tracing::info!(id = %response.id, "created laptop");
        Ok(response.id)
    }

    pub async fn search_laptop(&self, filter: Filter) -> Result<Vec<Laptop>, Status> {
        tracing::info!(?filter, "search laptop");
        let cx = self.channel.context(method::SEARCH_LAPTOP);
        let mut stream = self
            .channel
            .server()
            .search_laptop(cx, SearchLaptopRequest { filter })
            .await?;

        let mut found = Vec::new();
        while let Some(response) = stream.message().await? {
            let laptop = response.laptop;
            tracing::info!(
                id = %laptop.id,
                brand = %laptop.brand,
                name = %laptop.name,
                cpu_cores = laptop.cpu.number_cores,
                price_usd = laptop.price_usd,
                "found laptop"
            );
            found.push(laptop);
        }
        Ok(found)
    }

    /// Sends `image` as an info header followed by chunks of at most `chunk_size` bytes.
    pub async fn upload_image(
        &self,
        laptop_id: &str,
        image_type: &str,
        image: Vec<u8>,
        chunk_size: usize,
    ) -> Result<UploadImageResponse, Status> {
        let (sink, requests) = channel(16);
        let info = UploadImageRequest::info(laptop_id, image_type);
        let chunk_size = chunk_size.max(1);

        let producer = tokio::spawn(async move {
            sink.send(info).await?;
            for chunk in image.chunks(chunk_size) {
                sink.send(UploadImageRequest::ChunkData(chunk.to_vec()))
                    .await?;
            }
            Ok::<(), Status>(())
        });

        let cx = self.channel.context(method::UPLOAD_IMAGE);
        let result = self.channel.server().upload_image(cx, requests).await;
        if let Ok(Err(status)) = producer.await {
            // The server stopped reading; its verdict is in `result`.
            tracing::debug!(error = %status, "upload stream closed early");
        }

        let response = result?;
        tracing::info!(id = %response.id, size = response.size, "image uploaded");
        Ok(response)
    }

    /// Rates each laptop with the matching score and returns the server's replies in order.
    pub async fn rate_laptop(
        &self,
        laptop_ids: &[String],
        scores: &[f64],
    ) -> Result<Vec<RateLaptopResponse>, Status> {
        if laptop_ids.len() != scores.len() {
            return Err(Status::invalid_argument(
                "every laptop needs exactly one score",
            ));
        }

        let requests: Vec<RateLaptopRequest> = laptop_ids
            .iter()
            .zip(scores)
            .map(|(laptop_id, score)| RateLaptopRequest {
                laptop_id: laptop_id.clone(),
                score: *score,
            })
            .collect();
        let (sink, inbound) = channel(16);
        tokio::spawn(async move {
            for request in requests {
                if sink.send(request).await.is_err() {
                    break;
                }
            }
        });

        let cx = self.channel.context(method::RATE_LAPTOP);
        let mut responses = self.channel.server().rate_laptop(cx, inbound).await?;

        let mut out = Vec::with_capacity(laptop_ids.len());
        while let Some(response) = responses.message().await? {
            tracing::info!(
                laptop_id = %response.laptop_id,
                rated_count = response.rated_count,
                average_score = response.average_score,
                "received rating"
            );
            out.push(response);
        }
        Ok(out)
    }
}

/// Builds a gated laptop client: logs in through `channel` and keeps the token fresh.
pub async fn connect(
    channel: LocalChannel,
    username: &str,
    password: &str,
    protected_methods: impl IntoIterator<Item = String>,
    policy: RefreshPolicy,
) -> Result<(LaptopClient, Arc<ClientAuthGate>), Status> {
    let source = Arc::new(AuthClient::new(channel.clone(), username, password));
    let gate = Arc::new(ClientAuthGate::start(source, protected_methods, policy).await?);
    let client = LaptopClient::new(channel.with_gate(gate.clone()));
    Ok((client, gate))
}
