use crate::laptop::{Filter, Laptop};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateLaptopRequest {
    pub laptop: Laptop,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateLaptopResponse {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchLaptopRequest {
    pub filter: Filter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchLaptopResponse {
    pub laptop: Laptop,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInfo {
    pub laptop_id: String,
    pub image_type: String,
}

/// One message of an upload stream: a single `Info` header followed by data chunks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadImageRequest {
    Info(UploadInfo),
    ChunkData(Vec<u8>),
}

impl UploadImageRequest {
    pub fn info(laptop_id: impl Into<String>, image_type: impl Into<String>) -> Self {
        UploadImageRequest::Info(UploadInfo {
            laptop_id: laptop_id.into(),
            image_type: image_type.into(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub id: String,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateLaptopRequest {
    pub laptop_id: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateLaptopResponse {
    pub laptop_id: String,
    pub rated_count: u32,
    pub average_score: f64,
}
