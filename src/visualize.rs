//! # 位平面可视化模块
//!
//! 将每个通道样本的低位拉伸到完整的 `[0, 255]` 亮度范围，
//! 与原图的位平面图并排比较即可看出哪些低位被改写过。

use crate::capacity::EmbedConfig;
use crate::error::Result;
use crate::raster::Raster;

/// 生成位平面图：保留每个样本的低 `bits_per_channel` 位，并线性映射到 `[0, 255]`。
///
/// 所有通道 (包括 alpha) 都参与映射，因为 alpha 同样携带数据。
/// 因此完全不透明的 RGBA 图像在 1 bit 下 alpha 恒为 255，而 alpha 低位为 0 的像素
/// 在图中会变成透明，并排查看时这些像素不可见。
/// 结果只用于显示，不应再交给提取流程。
///
/// # Errors
///
/// `bits_per_channel` 不在 `[1, 8]` 内时返回 `InvalidConfig`。
pub fn visualize(raster: &Raster, bits_per_channel: u8) -> Result<Raster> {
    let config = EmbedConfig::new(bits_per_channel)?;
    let mask = config.mask();

    let samples = raster
        .samples()
        .iter()
        .map(|&sample| rescale(sample & mask, mask))
        .collect();

    Ok(raster.with_samples(samples))
}

/// 将 `[0, max]` 内的值映射到 `[0, 255]`，端点精确对应。
fn rescale(value: u8, max: u8) -> u8 {
    (value as u32 * 255 / max as u32) as u8
}
