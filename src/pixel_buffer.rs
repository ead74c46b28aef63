//! # 像素缓冲适配模块
//!
//! 图像文件与 [`Raster`] 之间的边界。格式解析与编码全部交给 `image` 库，
//! 写出时固定使用无损的 PNG，以免有损压缩破坏低位数据。

use crate::error::Result;
use crate::raster::Raster;
use image::ImageFormat;
use log::debug;
use std::path::Path;

/// 读取并解码图像文件。
///
/// # Errors
///
/// * 文件无法读取时返回 `IoFailure`。
/// * 格式无法识别或解码失败时返回 `UnsupportedFormat`。
pub fn load(path: &Path) -> Result<Raster> {
    let image = image::open(path)?;
    let raster = Raster::from_image(image)?;
    debug!(
        "loaded {} ({}x{}, {} channels)",
        path.display(),
        raster.width(),
        raster.height(),
        raster.channels()
    );
    Ok(raster)
}

/// 以 PNG 格式写出光栅，忽略目标路径的扩展名。
pub fn save(raster: &Raster, path: &Path) -> Result<()> {
    image::save_buffer_with_format(
        path,
        raster.samples(),
        raster.width(),
        raster.height(),
        raster.layout().color_type(),
        ImageFormat::Png,
    )?;
    debug!("saved {} as PNG", path.display());
    Ok(())
}
