//! # 文件级操作模块
//!
//! 以图像路径为输入的四个对外操作：隐写、提取、生成位平面图以及另存为。
//!
//! 隐写和可视化的结果先写入暂存目录 (始终为 PNG)，由调用方通过 [`save_as`] 决定最终保存位置，
//! 因此失败或中断的隐写不会在目标位置留下写了一半的文件。
//! 每次调用都会在暂存目录中创建一个唯一的文件，并发或先后处理同名图像不会互相覆盖。

use crate::constants::{EMBEDDED_PREFIX, STAGING_DIR_NAME};
use crate::error::{Result, StegoError};
use crate::pixel_buffer;
use crate::raster::Raster;
use crate::steganography;
use crate::timing::{DurationListener, EXTRACT_DURATION_EVENT, HIDE_DURATION_EVENT, timed};
use crate::visualize::visualize;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 存放中间结果的暂存目录。
#[derive(Debug, Clone)]
pub struct Workspace {
    staging_dir: PathBuf,
}

impl Default for Workspace {
    /// 系统临时目录下的 `lsb_plane` 子目录。
    fn default() -> Self {
        Self::new(std::env::temp_dir().join(STAGING_DIR_NAME))
    }
}

impl Workspace {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// 将 `message` 隐藏到 `image_path` 指向的图像中，返回暂存的 PNG 路径。
    ///
    /// 无论成功与否，都会以 [`HIDE_DURATION_EVENT`] 报告耗时。
    pub fn embed(
        &self,
        image_path: &Path,
        message: &str,
        bits_per_channel: u8,
        listener: &dyn DurationListener,
    ) -> Result<PathBuf> {
        timed(HIDE_DURATION_EVENT, listener, || -> Result<PathBuf> {
            let raster = pixel_buffer::load(image_path)?;
            let encoded = steganography::embed(&raster, message.as_bytes(), bits_per_channel)?;

            self.stage(EMBEDDED_PREFIX, image_path, &encoded)
        })
    }

    /// 从 `image_path` 指向的图像中恢复隐藏的文本。
    ///
    /// 无论成功与否，都会以 [`EXTRACT_DURATION_EVENT`] 报告耗时。
    pub fn extract(
        &self,
        image_path: &Path,
        bits_per_channel: u8,
        listener: &dyn DurationListener,
    ) -> Result<String> {
        timed(EXTRACT_DURATION_EVENT, listener, || -> Result<String> {
            let raster = pixel_buffer::load(image_path)?;
            steganography::extract(&raster, bits_per_channel)
        })
    }

    /// 生成位平面图并写入暂存目录，文件名以 `<label>_<原文件名>.` 开头。
    ///
    /// # Errors
    ///
    /// `label` 为空或包含路径分隔符时返回 `InvalidLabel`。
    pub fn visualize(&self, image_path: &Path, bits_per_channel: u8, label: &str) -> Result<PathBuf> {
        let prefix = label_prefix(label)?;
        let raster = pixel_buffer::load(image_path)?;
        let map = visualize(&raster, bits_per_channel)?;

        self.stage(&prefix, image_path, &map)
    }

    /// 把光栅写入唯一的暂存文件；写入失败时删除该文件。
    fn stage(&self, prefix: &str, source: &Path, raster: &Raster) -> Result<PathBuf> {
        let output = self.staged_path(prefix, source)?;
        if let Err(e) = pixel_buffer::save(raster, &output) {
            let _ = fs::remove_file(&output);
            return Err(e);
        }
        Ok(output)
    }

    /// 在暂存目录中创建一个唯一的 `<prefix><stem>.<随机>.png` 文件并返回其路径。
    fn staged_path(&self, prefix: &str, source: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.staging_dir)?;
        let (_, path) = tempfile::Builder::new()
            .prefix(&format!("{prefix}{}.", file_stem(source)))
            .suffix(".png")
            .tempfile_in(&self.staging_dir)?
            .keep()
            .map_err(|e| e.error)?;
        Ok(path)
    }
}

/// 将 `source` 复制到 `destination`。
///
/// 两者指向同一个文件时不做任何操作，避免复制把文件截断为空。
pub fn save_as(source: &Path, destination: &Path) -> Result<()> {
    if same_file(source, destination)? {
        debug!("{} is already at its destination", source.display());
        return Ok(());
    }
    fs::copy(source, destination)?;
    debug!("copied {} to {}", source.display(), destination.display());
    Ok(())
}

/// 把暂存文件另存到 `destination`，成功后删除暂存文件。
pub fn persist(staged: &Path, destination: &Path) -> Result<()> {
    if same_file(staged, destination)? {
        return Ok(());
    }
    save_as(staged, destination)?;
    if let Err(e) = fs::remove_file(staged) {
        warn!("unable to remove staged file {}: {e}", staged.display());
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> Result<bool> {
    Ok(b.exists() && fs::canonicalize(a)? == fs::canonicalize(b)?)
}

/// `<prefix><stem>.png`，源路径没有文件名时以 `image` 代替。
pub fn png_name(prefix: &str, source: &Path) -> String {
    format!("{prefix}{}.png", file_stem(source))
}

fn file_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// 校验标签并生成文件名前缀。
pub fn label_prefix(label: &str) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(StegoError::InvalidLabel(label.to_string()));
    }
    Ok(format!("{trimmed}_"))
}
