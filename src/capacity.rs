//! # 容量规划模块
//!
//! 根据光栅尺寸、通道数和 bits-per-channel 计算可隐藏的最大载荷，并校验候选消息。
//! 本模块中的函数都是纯函数。

use crate::constants::{HEADER_BITS, MAX_BITS_PER_CHANNEL, MAX_MESSAGE_LEN, MIN_BITS_PER_CHANNEL};
use crate::error::{Result, StegoError};
use crate::raster::Raster;

/// 经过校验的隐写参数：每个通道样本用于载荷的低位数，保证位于 `[1, 8]`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedConfig {
    bits_per_channel: u8,
}

impl EmbedConfig {
    /// # Errors
    ///
    /// `bits_per_channel` 不在 `[1, 8]` 内时返回 [`StegoError::InvalidConfig`]。
    pub fn new(bits_per_channel: u8) -> Result<Self> {
        if !(MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL).contains(&bits_per_channel) {
            return Err(StegoError::InvalidConfig(bits_per_channel));
        }
        Ok(Self { bits_per_channel })
    }

    pub fn bits_per_channel(self) -> u8 {
        self.bits_per_channel
    }

    /// 低位掩码，例如 3 bits 对应 `0b111`。
    pub fn mask(self) -> u8 {
        (u16::MAX >> (16 - self.bits_per_channel)) as u8
    }
}

/// 载荷可用的比特数。
///
/// 头部占据前 [`HEADER_BITS`] 个通道样本，其余每个样本提供 `bits_per_channel` 位。
/// 样本数不足以容纳头部时容量为 0。
pub fn capacity_bits(raster: &Raster, config: EmbedConfig) -> usize {
    raster
        .sample_count()
        .saturating_sub(HEADER_BITS)
        .saturating_mul(config.bits_per_channel() as usize)
}

/// 可隐藏的完整字节数，同时受头部可表示的最大长度约束。
pub fn capacity_bytes(raster: &Raster, config: EmbedConfig) -> usize {
    (capacity_bits(raster, config) / 8).min(MAX_MESSAGE_LEN)
}

/// 校验一条长度为 `message_len` 字节的消息能否以给定参数写入光栅。
///
/// 空消息在此处是允许的，拒绝空消息由隐写引擎负责。
///
/// # Errors
///
/// * `bits_per_channel` 非法时返回 `InvalidConfig`。
/// * 消息比特数超过容量，或长度超出头部可表示范围时返回 `CapacityExceeded`。
pub fn validate(raster: &Raster, bits_per_channel: u8, message_len: usize) -> Result<EmbedConfig> {
    let config = EmbedConfig::new(bits_per_channel)?;
    let available = capacity_bits(raster, config);
    let required = message_len.saturating_mul(8);

    if required > available || message_len > MAX_MESSAGE_LEN {
        return Err(StegoError::CapacityExceeded {
            required,
            available: available.min(MAX_MESSAGE_LEN * 8),
        });
    }

    Ok(config)
}
