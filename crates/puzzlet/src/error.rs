pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("canvas shorter side of {min_length}px cannot fit a jigsaw outline")]
    CanvasTooSmall { min_length: u32 },

    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("crop rectangle ({x},{y}) {width}x{height} extends outside the canvas")]
    CropOutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("outline produced no drawable path")]
    DegeneratePath,

    #[error("failed to encode PNG")]
    PngEncode,
}
