use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use catalog_blob::BlobSink;
use catalog_errors::codes;
use catalog_interceptors::stream::{StreamSink, Streaming};
use catalog_interceptors::{CallContext, Status};
use catalog_storage::{LaptopStore, RatingStore, SearchVisitor, StorageError};
use catalog_types::message::*;
use catalog_types::{resolve_laptop_id, CallSignal, Laptop};
use std::sync::Arc;

/// Largest accepted image upload.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 1 << 20;

/// Handlers of the laptop service. Authorization has already happened when these run.
pub struct LaptopServer {
    store: Arc<dyn LaptopStore>,
    images: Arc<dyn BlobSink>,
    ratings: Arc<dyn RatingStore>,
    max_image_bytes: u64,
}

impl LaptopServer {
    pub fn new(
        store: Arc<dyn LaptopStore>,
        images: Arc<dyn BlobSink>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            store,
            images,
            ratings,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: u64) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub fn store(&self) -> &Arc<dyn LaptopStore> {
        &self.store
    }

    pub async fn create_laptop(
        &self,
        cx: &CallContext,
        request: CreateLaptopRequest,
    ) -> Result<CreateLaptopResponse, Status> {
        let mut laptop = request.laptop;
        tracing::info!(id = %laptop.id, "receive a create-laptop request");

        laptop.id = resolve_laptop_id(&laptop.id)
            .map_err(|err| Status::invalid_argument(err.to_string()))?;

        cx.signal.check()?;

        let id = self.store.save(&laptop).await.map_err(|err| {
            if err.is(codes::STORAGE_ALREADY_EXISTS) {
                Status::already_exists(format!("laptop {} already exists", laptop.id))
            } else {
                Status::internal(format!("cannot save laptop to the store: {err}"))
            }
        })?;

        tracing::info!(%id, "saved laptop");
        Ok(CreateLaptopResponse { id })
    }

    pub async fn search_laptop(
        &self,
        cx: &CallContext,
        request: SearchLaptopRequest,
        sink: &StreamSink<SearchLaptopResponse>,
    ) -> Result<(), Status> {
        tracing::info!(filter = ?request.filter, "receive a search-laptop request");

        let mut visitor = SendMatches {
            signal: &cx.signal,
            sink,
            sent: 0,
        };
        match self
            .store
            .search(&cx.signal, &request.filter, &mut visitor)
            .await
        {
            Ok(()) => {
                tracing::info!(sent = visitor.sent, "search finished");
                Ok(())
            }
            Err(err) if err.is(codes::CALL_CANCELED) || err.is(codes::CALL_DEADLINE_EXCEEDED) => {
                Err(Status::from(err.into_inner()))
            }
            Err(err) => Err(Status::internal(format!("unexpected error: {err}"))),
        }
    }

    pub async fn upload_image(
        &self,
        cx: &CallContext,
        mut requests: Streaming<UploadImageRequest>,
    ) -> Result<UploadImageResponse, Status> {
        let info = match cx.signal.guard(requests.message()).await?? {
            Some(UploadImageRequest::Info(info)) => info,
            Some(UploadImageRequest::ChunkData(_)) => {
                return Err(Status::invalid_argument(
                    "first upload message must carry image info",
                ))
            }
            None => return Err(Status::invalid_argument("cannot receive image info")),
        };
        tracing::info!(
            laptop_id = %info.laptop_id,
            image_type = %info.image_type,
            "receive an upload-image request"
        );

        self.require_laptop(&info.laptop_id).await?;

        let mut data = BytesMut::new();
        let mut size: u64 = 0;
        loop {
            let chunk = match cx.signal.guard(requests.message()).await?? {
                Some(UploadImageRequest::ChunkData(chunk)) => chunk,
                Some(UploadImageRequest::Info(_)) => {
                    return Err(Status::invalid_argument(
                        "image info may only be sent once",
                    ))
                }
                None => break,
            };

            size += chunk.len() as u64;
            if size > self.max_image_bytes {
                return Err(Status::invalid_argument(format!(
                    "image is too large: {size} > {}",
                    self.max_image_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        let bytes: Bytes = data.freeze();
        let id = self
            .images
            .store(&info.laptop_id, &info.image_type, bytes)
            .await
            .map_err(|err| {
                Status::internal(format!("cannot save image to the store: {err}"))
            })?;

        tracing::info!(%id, size, "saved image");
        Ok(UploadImageResponse { id, size })
    }

    pub async fn rate_laptop(
        &self,
        cx: &CallContext,
        mut requests: Streaming<RateLaptopRequest>,
        sink: &StreamSink<RateLaptopResponse>,
    ) -> Result<(), Status> {
        loop {
            let Some(request) = cx.signal.guard(requests.message()).await?? else {
                tracing::debug!("no more rating requests");
                return Ok(());
            };
            tracing::info!(
                laptop_id = %request.laptop_id,
                score = request.score,
                "receive a rate-laptop request"
            );

            self.require_laptop(&request.laptop_id).await?;

            let rating = self
                .ratings
                .add(&request.laptop_id, request.score)
                .map_err(|err| {
                    Status::internal(format!("cannot add rating to the store: {err}"))
                })?;

            let response = RateLaptopResponse {
                laptop_id: request.laptop_id,
                rated_count: rating.count,
                average_score: rating.average(),
            };
            cx.signal.guard(sink.send(response)).await??;
        }
    }

    async fn require_laptop(&self, id: &str) -> Result<Laptop, Status> {
        match self.store.find(id).await {
            Ok(Some(laptop)) => Ok(laptop),
            Ok(None) => Err(Status::not_found(format!("laptop {id} doesn't exist"))),
            Err(err) => Err(Status::internal(format!("cannot find laptop: {err}"))),
        }
    }
}

struct SendMatches<'a> {
    signal: &'a CallSignal,
    sink: &'a StreamSink<SearchLaptopResponse>,
    sent: usize,
}

#[async_trait]
impl<'a> SearchVisitor for SendMatches<'a> {
    async fn visit(&mut self, laptop: Laptop) -> Result<(), StorageError> {
        let id = laptop.id.clone();
        self.signal
            .guard(self.sink.send(SearchLaptopResponse { laptop }))
            .await?
            .map_err(|status| StorageError::internal(status.message()))?;
        tracing::debug!(%id, "sent laptop");
        self.sent += 1;
        Ok(())
    }
}
