//! # 错误类型模块
//!
//! 库内所有操作都返回 [`StegoError`]，命令行层再用 `anyhow` 附加上下文。

use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// 隐写、提取、可视化以及图像 I/O 中可能出现的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Bits per channel must be between 1 and 8, got {0}")]
    InvalidConfig(u8),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Not enough space in the image: required {required} bits, available {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    #[error(
        "Corrupt header: decoded length of {length} bytes exceeds carrier capacity of {capacity} bits"
    )]
    CorruptHeader { length: usize, capacity: usize },

    #[error("Recovered bytes are not valid UTF-8: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),

    #[error("Malformed raster: {0}")]
    MalformedRaster(String),

    #[error("Invalid label: {0:?}")]
    InvalidLabel(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    IoFailure(#[from] io::Error),
}

impl From<image::ImageError> for StegoError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => StegoError::IoFailure(e),
            other => StegoError::UnsupportedFormat(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;
