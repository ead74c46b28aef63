//! # lsb_plane 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：容量规划、隐写与提取、位平面可视化，
//! 以及围绕它们的图像 I/O、耗时统计和命令行处理。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod operations;
pub mod pixel_buffer;
pub mod raster;
pub mod steganography;
pub mod timing;
pub mod visualize;

pub use error::StegoError;
pub use raster::{ChannelLayout, Raster};
