/// What every image provider is asked to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

/// Bytes returned by the first provider that succeeded.
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    pub bytes: Vec<u8>,
    pub provider: String,
    pub width: u32,
    pub height: u32,
}
