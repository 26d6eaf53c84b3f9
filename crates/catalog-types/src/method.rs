//! Fully qualified RPC method names.

pub const LOGIN: &str = "/catalog.v1.AuthService/Login";
pub const CREATE_LAPTOP: &str = "/catalog.v1.LaptopService/CreateLaptop";
pub const SEARCH_LAPTOP: &str = "/catalog.v1.LaptopService/SearchLaptop";
pub const UPLOAD_IMAGE: &str = "/catalog.v1.LaptopService/UploadImage";
pub const RATE_LAPTOP: &str = "/catalog.v1.LaptopService/RateLaptop";
